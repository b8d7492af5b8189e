//! Completion outside of blocks
//!
//! Provides completion for:
//! - `include` paths: directories used by other includes, or entries of the
//!   directory being typed
//! - The `include` keyword and block snippets

use std::collections::BTreeSet;
use std::path::Path;

use kdesrc_conf_core::paths::{include_dirs, list_dir, resolve_path, EntryKind};
use kdesrc_conf_core::{BlockKind, Token};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, InsertTextFormat, TextEdit,
};

use super::{sort_key, Cursor};

/// Completer for include directives and block headers
pub struct IncludeCompleter;

impl IncludeCompleter {
    pub fn new() -> Self {
        Self
    }

    /// Complete the path of the `include` on the cursor line
    pub(crate) fn complete_path(
        &self,
        cursor: &Cursor<'_>,
        path: Option<&Token>,
        document_path: Option<&Path>,
    ) -> Vec<CompletionItem> {
        let (_, others) = include_dirs(cursor.document, cursor.line);

        match path {
            None => self.complete_sibling_dirs(cursor, others),
            Some(path) => self.complete_entries(cursor, path, document_path),
        }
    }

    /// Directories other includes point into
    fn complete_sibling_dirs(&self, cursor: &Cursor<'_>, others: Vec<String>) -> Vec<CompletionItem> {
        let dirs: BTreeSet<String> = others.into_iter().collect();
        let range = cursor.here();

        dirs.into_iter()
            .enumerate()
            .map(|(index, dir)| CompletionItem {
                kind: Some(CompletionItemKind::FOLDER),
                sort_text: Some(sort_key(index)),
                text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                    range,
                    new_text: format!("{dir}/"),
                })),
                label: dir,
                ..Default::default()
            })
            .collect()
    }

    /// Entries of the directory part of the typed path.
    ///
    /// The segment after the last `/` is the partial name being typed and is
    /// replaced by the chosen entry.
    fn complete_entries(
        &self,
        cursor: &Cursor<'_>,
        path: &Token,
        document_path: Option<&Path>,
    ) -> Vec<CompletionItem> {
        let typed_end = cursor.column.clamp(path.span.start, path.span.end);
        let typed = &cursor.text()[path.span.start..typed_end];
        let dir_len = typed.rfind('/').map(|idx| idx + 1).unwrap_or(0);
        let folder = &typed[..dir_len];

        let vars = cursor.document.global_values();
        let resolved = resolve_path(folder, document_path, &vars);
        let range = cursor.range(path.span.start + dir_len, path.span.end);

        list_dir(&resolved)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let (kind, new_text) = match entry.kind {
                    EntryKind::Directory => (CompletionItemKind::FOLDER, format!("{}/", entry.name)),
                    EntryKind::File => (CompletionItemKind::FILE, entry.name.clone()),
                    EntryKind::Other => (CompletionItemKind::TEXT, entry.name.clone()),
                };
                CompletionItem {
                    label: entry.name,
                    kind: Some(kind),
                    sort_text: Some(sort_key(index)),
                    text_edit: Some(CompletionTextEdit::Edit(TextEdit { range, new_text })),
                    ..Default::default()
                }
            })
            .collect()
    }

    /// The `include` keyword and a snippet for every block kind
    pub(crate) fn complete_top_level(&self) -> Vec<CompletionItem> {
        let mut items = vec![CompletionItem {
            label: "include".to_string(),
            kind: Some(CompletionItemKind::KEYWORD),
            detail: Some("Include other configuration file".to_string()),
            insert_text: Some("include ".to_string()),
            sort_text: Some(sort_key(0)),
            ..Default::default()
        }];

        for (index, kind) in BlockKind::ALL.into_iter().enumerate() {
            items.push(CompletionItem {
                label: kind.keyword().to_string(),
                kind: Some(CompletionItemKind::SNIPPET),
                detail: Some(format!("{kind} block")),
                insert_text: Some(Self::block_snippet(kind)),
                insert_text_format: Some(InsertTextFormat::SNIPPET),
                sort_text: Some(sort_key(index + 1)),
                ..Default::default()
            });
        }

        items
    }

    fn block_snippet(kind: BlockKind) -> String {
        if kind.takes_name() {
            format!("{kind} ${{1:name}}\n\t$0\nend {kind}")
        } else {
            format!("{kind}\n\t$0\nend {kind}")
        }
    }
}

impl Default for IncludeCompleter {
    fn default() -> Self {
        Self::new()
    }
}
