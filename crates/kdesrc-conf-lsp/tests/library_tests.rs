//! Library integration tests for kdesrc-conf-lsp
//!
//! These tests use the crate the way the CLI does: through its public API.

use std::fs;
use std::sync::Arc;

use kdesrc_conf_core::{ConfDocument, ModuleList, OptionRegistry};
use kdesrc_conf_lsp::config::{DiagnosticSettings, RuleSeverity};
use kdesrc_conf_lsp::structural::{FoldingAnalyzer, SymbolAnalyzer};
use kdesrc_conf_lsp::{ConfEngine, PathNavigator, Settings};
use tower_lsp::lsp_types::{DiagnosticSeverity, Position};

const RC: &str = "\
# kdesrc-build configuration
include ~/kde/src/kdesrc-build/kf6-qt6-build-include

global
    branch-group kf6-qt6
    kdedir ~/kde/usr
    source-dir ~/kde/src
end global

module-set frameworks
    repository kde-projects
    use-modules frameworks
end module-set

options kcoreaddons
    cmake-options -DBUILD_TESTING=OFF
end options
";

#[test]
fn test_engine_over_custom_parts() {
    let modules = ModuleList::new();
    modules.replace(vec!["kcoreaddons".to_string(), "ki18n".to_string()]);
    let engine = ConfEngine::with_parts(Arc::new(OptionRegistry::builtin()), modules.clone());

    let text = "module-set frameworks\n    ignore-modules k\nend module-set\n";
    let items = engine.get_completions(text, Position::new(1, 20), None);
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["kcoreaddons", "ki18n"]);

    // Clones share the module list
    modules.replace(vec!["kate".to_string()]);
    assert_eq!(engine.modules().snapshot(), vec!["kate"]);
}

#[test]
fn test_realistic_config_is_clean() {
    let engine = ConfEngine::new();
    let diagnostics = engine.validate_document(RC, &DiagnosticSettings::default());
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
}

#[test]
fn test_settings_file_drives_validation() {
    let settings = Settings::from_toml_str(
        r#"
[diagnostics]
unknown_option = "error"
"#,
    )
    .unwrap();
    assert_eq!(settings.diagnostics.unknown_option, RuleSeverity::Error);

    let engine = ConfEngine::new();
    let diagnostics = engine.validate_document(
        "global\n    no-such-option 1\nend global\n",
        &settings.diagnostics,
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
}

#[test]
fn test_structure_views() {
    let folds = FoldingAnalyzer::generate_ranges(RC);
    assert_eq!(folds.len(), 3);

    let symbols = SymbolAnalyzer::extract_symbols(RC);
    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "~/kde/src/kdesrc-build/kf6-qt6-build-include",
            "global",
            "module-set frameworks",
            "options kcoreaddons",
        ]
    );
}

#[test]
fn test_navigation_relative_to_document() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("qt6.ksb"), "global\nend global\n").unwrap();
    let rc = dir.path().join("kdesrc-buildrc");

    let registry = OptionRegistry::builtin();
    let document = ConfDocument::parse("include qt6.ksb\n");
    let navigator = PathNavigator::new(&document, &registry, Some(&rc));

    assert_eq!(navigator.document_links().len(), 1);
    assert!(navigator.definition(Position::new(0, 10)).is_some());
}
