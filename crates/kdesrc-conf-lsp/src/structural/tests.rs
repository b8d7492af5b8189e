//! Tests for structural intelligence

use super::folding::FoldingAnalyzer;
use super::symbols::SymbolAnalyzer;
use tower_lsp::lsp_types::{FoldingRange, FoldingRangeKind, Position, SymbolKind};

const SAMPLE: &str = "\
# kdesrc-build configuration
# generated by the setup wizard
include ~/kde/src/kdesrc-build/kf6-qt6-build-include

global
    source-dir ~/kde/src
    num-cores 8
end global

module-set kde-workspace
    repository kde-projects
    use-modules plasma-workspace
end module-set

options kcalc
    cmake-options -DBUILD_TESTING=ON
end options
";

// ============================================================================
// FOLDING RANGE TESTS
// ============================================================================

#[test]
fn test_block_folding() {
    let ranges = FoldingAnalyzer::generate_ranges(SAMPLE);

    let regions: Vec<(u32, u32)> = ranges
        .iter()
        .filter(|r| r.kind == Some(FoldingRangeKind::Region))
        .map(|r| (r.start_line, r.end_line))
        .collect();

    assert_eq!(regions, vec![(4, 7), (9, 12), (14, 16)]);
}

#[test]
fn test_comment_run_folding() {
    let ranges = FoldingAnalyzer::generate_ranges(SAMPLE);

    let comments: Vec<&FoldingRange> = ranges
        .iter()
        .filter(|r| r.kind == Some(FoldingRangeKind::Comment))
        .collect();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].start_line, 0);
    assert_eq!(comments[0].end_line, 1);
}

#[test]
fn test_single_comment_no_fold() {
    let ranges = FoldingAnalyzer::generate_ranges("# one\nglobal\nend global");
    assert!(ranges
        .iter()
        .all(|r| r.kind != Some(FoldingRangeKind::Comment)));
}

#[test]
fn test_unterminated_block_folds_to_its_last_line() {
    let text = "module kcalc\n    branch master\n    run-tests true";
    let ranges = FoldingAnalyzer::generate_ranges(text);

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start_line, 0);
    assert_eq!(ranges[0].end_line, 2);
}

#[test]
fn test_empty_document() {
    assert!(FoldingAnalyzer::generate_ranges("").is_empty());
}

// ============================================================================
// DOCUMENT SYMBOL TESTS
// ============================================================================

#[test]
fn test_symbols_follow_document_order() {
    let symbols = SymbolAnalyzer::extract_symbols(SAMPLE);

    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "~/kde/src/kdesrc-build/kf6-qt6-build-include",
            "global",
            "module-set kde-workspace",
            "options kcalc",
        ]
    );

    let kinds: Vec<SymbolKind> = symbols.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SymbolKind::FILE,
            SymbolKind::NAMESPACE,
            SymbolKind::PACKAGE,
            SymbolKind::OBJECT,
        ]
    );
}

#[test]
fn test_block_children_are_options() {
    let symbols = SymbolAnalyzer::extract_symbols(SAMPLE);
    let global = &symbols[1];

    let children = global.children.as_ref().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name, "source-dir");
    assert_eq!(children[0].detail.as_deref(), Some("~/kde/src"));
    assert_eq!(children[0].kind, SymbolKind::PROPERTY);
    assert_eq!(children[1].name, "num-cores");
}

#[test]
fn test_block_ranges() {
    let symbols = SymbolAnalyzer::extract_symbols(SAMPLE);
    let module_set = &symbols[2];

    assert_eq!(module_set.range.start, Position::new(9, 0));
    assert_eq!(module_set.range.end, Position::new(12, 14));
    assert_eq!(module_set.selection_range.start, Position::new(9, 0));
    assert_eq!(module_set.selection_range.end, Position::new(9, 24));
    assert!(module_set.detail.is_none());
}

#[test]
fn test_unterminated_block_is_flagged() {
    let symbols = SymbolAnalyzer::extract_symbols("module kcalc\n  branch master\n");
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].kind, SymbolKind::MODULE);
    assert_eq!(symbols[0].detail.as_deref(), Some("not terminated"));
}

#[test]
fn test_empty_document_has_no_symbols() {
    assert!(SymbolAnalyzer::extract_symbols("  \n\n").is_empty());
}

#[test]
fn test_many_blocks_each_keep_their_options() {
    let text: String = (0..2000)
        .map(|i| format!("module m{i}\n    branch master\n    repository kde:m{i}\nend module\n"))
        .collect();
    let symbols = SymbolAnalyzer::extract_symbols(&text);

    assert_eq!(symbols.len(), 2000);
    for (i, symbol) in symbols.iter().enumerate() {
        let children = symbol.children.as_ref().unwrap();
        assert_eq!(children.len(), 2, "module m{i}");
        assert_eq!(children[1].detail, Some(format!("kde:m{i}")));
    }
}
