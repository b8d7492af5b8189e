//! Integration tests for configuration documents
//!
//! Exercise the public API the way the language server does: parse a whole
//! configuration, resolve scopes and look options up in the registry.

use std::fs;

use kdesrc_conf_core::modules::fetch_module_list;
use kdesrc_conf_core::paths::{include_dirs, list_dir, resolve_path, EntryKind};
use kdesrc_conf_core::{BlockKind, ConfDocument, ConfError, LineKind, OptionRegistry, StructureProblem};

const RC: &str = "\
# Sample configuration
include ${source-dir}/kdesrc-build/kf6-qt6-build-include

global
    source-dir ~/kde/src
    num-cores 8 # all of them
    async false
end global

module-set workspace
    repository kde-projects
    use-modules plasma-workspace plasma-desktop
    ignore-modules kwin
end module-set

options plasma-desktop
    cmake-options -DBUILD_TESTING=OFF
end options

module kcalc
    repository kde:kcalc
end module
";

#[test]
fn test_every_option_is_allowed_where_it_is_set() {
    let registry = OptionRegistry::builtin();
    let doc = ConfDocument::parse(RC);

    assert!(doc.problems().is_empty());
    assert_eq!(doc.blocks().len(), 4);

    for line in doc.option_lines() {
        let block = line.block.map(|idx| doc.blocks()[idx].kind).unwrap();
        let option = registry.get(&line.key.text).unwrap();
        assert!(
            block.may_contain(option.restriction),
            "{} in {}",
            option.name,
            block
        );
    }
}

#[test]
fn test_module_selection_options_stay_out_of_global() {
    let registry = OptionRegistry::builtin();
    let ignore = registry.get("ignore-modules").unwrap();
    let use_modules = registry.get("use-modules").unwrap();

    assert!(!BlockKind::Global.may_contain(ignore.restriction));
    assert!(BlockKind::ModuleSet.may_contain(ignore.restriction));
    assert!(BlockKind::Options.may_contain(ignore.restriction));
    assert!(!BlockKind::Options.may_contain(use_modules.restriction));

    let global: Vec<&str> = registry
        .candidates(BlockKind::Global, "")
        .iter()
        .map(|o| o.name)
        .collect();
    assert!(!global.contains(&"ignore-modules"));
    let options: Vec<&str> = registry
        .candidates(BlockKind::Options, "")
        .iter()
        .map(|o| o.name)
        .collect();
    assert!(options.contains(&"ignore-modules"));
    assert!(!options.contains(&"use-modules"));
}

#[test]
fn test_scopes_by_line() {
    let doc = ConfDocument::parse(RC);

    assert_eq!(doc.scope_at(1), None);
    assert_eq!(doc.scope_at(3), None, "block header is not inside the block");
    assert_eq!(doc.scope_at(4), Some(BlockKind::Global));
    assert_eq!(doc.scope_at(7), None, "end line closes the block");
    assert_eq!(doc.scope_at(11), Some(BlockKind::ModuleSet));
    assert_eq!(doc.scope_at(16), Some(BlockKind::Options));
    assert_eq!(doc.scope_at(20), Some(BlockKind::Module));
}

#[test]
fn test_comments_and_values() {
    let doc = ConfDocument::parse(RC);

    match doc.line_kind(5) {
        Some(LineKind::Option { key, value }) => {
            assert_eq!(key.text, "num-cores");
            assert_eq!(value.as_ref().map(|v| v.text.as_str()), Some("8"));
        }
        other => panic!("unexpected line {other:?}"),
    }
    assert!(doc.is_comment_at(5, 18));
    assert!(!doc.is_comment_at(5, 6));
    assert!(doc.is_comment_at(0, 3));
}

#[test]
fn test_global_values_feed_include_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("kdesrc-build")).unwrap();
    fs::write(src.join("kdesrc-build/kf6-qt6-build-include"), "").unwrap();

    let text = RC.replace("~/kde/src", &src.display().to_string());
    let doc = ConfDocument::parse(&text);
    let vars = doc.global_values();
    assert_eq!(vars.get("num-cores").map(String::as_str), Some("8"));

    let include = &doc.includes()[0];
    let raw = include.path.as_ref().unwrap();
    let resolved = resolve_path(&raw.text, None, &vars);
    assert!(resolved.is_file(), "{}", resolved.display());

    let entries = list_dir(&src.join("kdesrc-build"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::File);
}

#[test]
fn test_include_dirs_skip_the_current_line() {
    let doc = ConfDocument::parse("include a/one.ksb\ninclude b/two.ksb\ninclude two.ksb\n");

    let (mine, others) = include_dirs(&doc, 1);
    assert_eq!(mine.as_deref(), Some("b/two.ksb"));
    assert_eq!(others, vec!["a"]);
}

#[test]
fn test_structure_problems() {
    let doc = ConfDocument::parse("global\nmodule kcalc\nend options\nend\n");

    assert!(matches!(
        doc.problems(),
        [
            StructureProblem::Unterminated { block: 0 },
            StructureProblem::MismatchedEnd {
                line: 2,
                expected: BlockKind::Module,
                ..
            },
            StructureProblem::StrayEnd { line: 3, .. },
        ]
    ));
}

#[test]
fn test_module_listing_command_failure() {
    let command = vec!["kdesrc-conf-no-such-program".to_string()];
    assert!(matches!(
        fetch_module_list(&command),
        Err(ConfError::ModuleListing(_))
    ));
}
