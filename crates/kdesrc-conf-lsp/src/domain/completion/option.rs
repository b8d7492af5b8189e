//! Option name completion
//!
//! Offers the options the enclosing block may contain, e.g. `num-cores` in
//! `global` but not in `module`.

use kdesrc_conf_core::{BlockKind, OptionRegistry, Token};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemLabelDetails, CompletionItemTag,
    CompletionTextEdit, TextEdit,
};

use super::{option_data, sort_key, Cursor};

/// Option name completer
pub struct OptionCompleter;

impl OptionCompleter {
    pub fn new() -> Self {
        Self
    }

    /// Complete the option name being typed at the cursor.
    ///
    /// `key` is the word already on the line; it is replaced by the chosen
    /// name. A trailing space is inserted unless the line already has a value.
    pub(crate) fn complete(
        &self,
        registry: &OptionRegistry,
        cursor: &Cursor<'_>,
        block: BlockKind,
        key: Option<&Token>,
        has_value: bool,
    ) -> Vec<CompletionItem> {
        let (prefix, range) = match key {
            Some(key) => {
                let end = cursor.column.min(key.span.end);
                (
                    &cursor.text()[key.span.start..end],
                    cursor.range(key.span.start, key.span.end),
                )
            }
            None => ("", cursor.here()),
        };

        registry
            .candidates(block, prefix)
            .into_iter()
            .enumerate()
            .map(|(index, option)| {
                let new_text = if has_value {
                    option.name.to_string()
                } else {
                    format!("{} ", option.name)
                };

                CompletionItem {
                    label: option.name.to_string(),
                    label_details: option.annotation_for(option.name).map(|annotation| {
                        CompletionItemLabelDetails {
                            detail: None,
                            description: Some(annotation.to_string()),
                        }
                    }),
                    kind: Some(CompletionItemKind::PROPERTY),
                    detail: Some(option.ty.to_string()),
                    tags: option.deprecated.then(|| vec![CompletionItemTag::DEPRECATED]),
                    sort_text: Some(sort_key(index)),
                    filter_text: Some(option.name.to_string()),
                    text_edit: Some(CompletionTextEdit::Edit(TextEdit { range, new_text })),
                    data: Some(option_data(option.name)),
                    ..Default::default()
                }
            })
            .collect()
    }
}

impl Default for OptionCompleter {
    fn default() -> Self {
        Self::new()
    }
}
