//! Code actions
//!
//! "Close block": replaces the cursor line with the `end` line of the
//! enclosing block.

use std::collections::HashMap;

use kdesrc_conf_core::{BlockKind, ConfDocument, LineKind};
use tower_lsp::lsp_types::{CodeAction, CodeActionKind, TextEdit, Url, WorkspaceEdit};

use crate::position::line_range;

/// Block that a close action on `line` would terminate.
///
/// Offered inside a block body, outside comments and not in the value part
/// of an option line. A bare or mismatched `end` line also offers to name
/// the block it closes.
pub fn closable_block(document: &ConfDocument, line: usize, column: usize) -> Option<BlockKind> {
    if document.is_comment_at(line, column) {
        return None;
    }

    match document.line_kind(line)? {
        LineKind::Option { key, .. } if column > key.span.end => None,
        end @ LineKind::BlockEnd { .. } => {
            let block = document
                .blocks()
                .iter()
                .find(|block| block.end_line == Some(line))?;
            (end.end_target() != Some(block.kind)).then_some(block.kind)
        }
        _ => document.scope_at(line),
    }
}

/// Edit replacing `line` with `end <kind>` and a line break
pub fn close_block_edit(document: &ConfDocument, line: usize, kind: BlockKind) -> TextEdit {
    TextEdit {
        range: line_range(document, line),
        new_text: format!("end {kind}\n"),
    }
}

/// Code action closing the block around the cursor
pub fn close_block_action(
    document: &ConfDocument,
    uri: &Url,
    line: usize,
    column: usize,
) -> Option<CodeAction> {
    let kind = closable_block(document, line, column)?;

    let mut changes = HashMap::new();
    changes.insert(uri.clone(), vec![close_block_edit(document, line, kind)]);

    Some(CodeAction {
        title: format!("Close `{kind}` block"),
        kind: Some(CodeActionKind::REFACTOR_REWRITE),
        edit: Some(WorkspaceEdit {
            changes: Some(changes),
            document_changes: None,
            change_annotations: None,
        }),
        ..Default::default()
    })
}
