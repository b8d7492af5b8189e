//! Filesystem navigation
//!
//! Include paths and values of path-typed options point at files and
//! directories. They become document links and targets of go-to-definition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kdesrc_conf_core::paths::resolve_path;
use kdesrc_conf_core::{ConfDocument, OptionRegistry, OptionType, Token};
use tower_lsp::lsp_types::{DocumentLink, Location, Position, Range, Url};

use crate::position::{span_to_range, to_byte_position};

/// Resolves path-like tokens of a document
pub struct PathNavigator<'a> {
    document: &'a ConfDocument,
    registry: &'a OptionRegistry,
    document_path: Option<&'a Path>,
    vars: HashMap<String, String>,
}

impl<'a> PathNavigator<'a> {
    pub fn new(
        document: &'a ConfDocument,
        registry: &'a OptionRegistry,
        document_path: Option<&'a Path>,
    ) -> Self {
        Self {
            document,
            registry,
            document_path,
            vars: document.global_values(),
        }
    }

    /// Include paths and values of `Path` options, in document order.
    ///
    /// Quoted values are not paths kdesrc-build would expand, so they are
    /// skipped.
    pub fn path_tokens(&self) -> Vec<Token> {
        let includes = self
            .document
            .includes()
            .into_iter()
            .filter_map(|include| include.path);

        let values = self.document.option_lines().into_iter().filter_map(|line| {
            let option = self.registry.get(&line.key.text)?;
            if option.ty == OptionType::Path {
                line.value
            } else {
                None
            }
        });

        let mut tokens: Vec<Token> = includes
            .chain(values)
            .filter(|token| !token.text.starts_with(['"', '\'']))
            .collect();
        tokens.sort_by_key(|token| (token.span.line, token.span.start));
        tokens
    }

    /// Filesystem path a token refers to
    pub fn resolve(&self, token: &Token) -> PathBuf {
        resolve_path(&token.text, self.document_path, &self.vars)
    }

    /// Existing file or directory referenced under the cursor
    pub fn definition(&self, position: Position) -> Option<Location> {
        let (line, column) = to_byte_position(self.document, position)?;
        let token = self
            .path_tokens()
            .into_iter()
            .find(|token| token.span.touches(line, column))?;

        let path = self.resolve(&token);
        if !path.exists() {
            return None;
        }
        let uri = Url::from_file_path(&path).ok()?;
        Some(Location {
            uri,
            range: Range::default(),
        })
    }

    /// Links for every path token that exists on disk
    pub fn document_links(&self) -> Vec<DocumentLink> {
        self.path_tokens()
            .into_iter()
            .filter_map(|token| {
                let path = self.resolve(&token);
                if !path.exists() {
                    return None;
                }
                Some(DocumentLink {
                    range: span_to_range(self.document, token.span),
                    target: Url::from_file_path(&path).ok(),
                    tooltip: Some(path.display().to_string()),
                    data: None,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("includes")).unwrap();
        fs::write(dir.path().join("includes/qt6.ksb"), "").unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        let rc = dir.path().join("kdesrc-buildrc");
        (dir, rc)
    }

    #[test]
    fn test_path_tokens() {
        let registry = OptionRegistry::builtin();
        let doc = ConfDocument::parse(
            "include a.ksb\nglobal\n  source-dir ~/src\n  branch master\n  log-dir \"x\"\nend global\n",
        );
        let nav = PathNavigator::new(&doc, &registry, None);
        let texts: Vec<String> = nav.path_tokens().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["a.ksb", "~/src"]);
    }

    #[test]
    fn test_definition_on_existing_include() {
        let (dir, rc) = fixture();
        let registry = OptionRegistry::builtin();
        let doc = ConfDocument::parse("include includes/qt6.ksb\n");
        let nav = PathNavigator::new(&doc, &registry, Some(&rc));

        let location = nav.definition(Position::new(0, 12)).unwrap();
        assert_eq!(
            location.uri,
            Url::from_file_path(dir.path().join("includes/qt6.ksb")).unwrap()
        );
        assert_eq!(location.range, Range::default());

        assert!(nav.definition(Position::new(0, 2)).is_none(), "keyword is not a path");
    }

    #[test]
    fn test_definition_on_directory_and_missing_path() {
        let (dir, rc) = fixture();
        let registry = OptionRegistry::builtin();
        let doc = ConfDocument::parse("global\n  source-dir src\n  log-dir nowhere\nend global\n");
        let nav = PathNavigator::new(&doc, &registry, Some(&rc));

        let location = nav.definition(Position::new(1, 14)).unwrap();
        assert_eq!(location.uri, Url::from_file_path(dir.path().join("src")).unwrap());
        assert!(nav.definition(Position::new(2, 12)).is_none());
    }

    #[test]
    fn test_document_links() {
        let (dir, rc) = fixture();
        let registry = OptionRegistry::builtin();
        let doc = ConfDocument::parse(
            "include includes/qt6.ksb\ninclude missing.ksb\nglobal\n  source-dir src\nend global\n",
        );
        let nav = PathNavigator::new(&doc, &registry, Some(&rc));

        let links = nav.document_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].range.start, Position::new(0, 8));
        assert_eq!(links[0].range.end, Position::new(0, 24));
        assert_eq!(
            links[1].target,
            Some(Url::from_file_path(dir.path().join("src")).unwrap())
        );
    }

    #[test]
    fn test_option_reference_is_expanded() {
        let (dir, rc) = fixture();
        let registry = OptionRegistry::builtin();
        let text = format!(
            "global\n  source-dir {}\nend global\ninclude ${{source-dir}}/../includes/qt6.ksb\n",
            dir.path().join("src").display()
        );
        let doc = ConfDocument::parse(&text);
        let nav = PathNavigator::new(&doc, &registry, Some(&rc));
        assert!(nav.definition(Position::new(3, 10)).is_some());
    }
}
