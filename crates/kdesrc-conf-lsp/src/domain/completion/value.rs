//! Option value completion
//!
//! Provides completion for values like `cmake-generator Ninja`

use kdesrc_conf_core::options::Choices;
use kdesrc_conf_core::{ModuleList, OptionDescriptor, OptionType, Token, Value};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionItemLabelDetails, CompletionTextEdit, Range,
    TextEdit,
};

use super::{option_data, sort_key, Cursor};

/// Option value completer
pub struct ValueCompleter;

impl ValueCompleter {
    pub fn new() -> Self {
        Self
    }

    /// Complete the value of `option` at the cursor
    pub(crate) fn complete(
        &self,
        option: &OptionDescriptor,
        modules: &ModuleList,
        cursor: &Cursor<'_>,
        value: Option<&Token>,
    ) -> Vec<CompletionItem> {
        let values = self.values_for(option, modules);
        let range = self.replace_range(option, cursor, value);

        values
            .iter()
            .enumerate()
            .map(|(index, value)| self.value_to_completion(option, value, index, range))
            .collect()
    }

    /// Values offered for an option: `true`/`false` for booleans, otherwise
    /// the sorted union of choices and default.
    fn values_for(&self, option: &OptionDescriptor, modules: &ModuleList) -> Vec<Value> {
        match option.ty {
            OptionType::Bool => vec![Value::Bool(true), Value::Bool(false)],
            OptionType::Int | OptionType::Str | OptionType::Path => {
                option.candidate_values(modules)
            }
        }
    }

    /// Range replaced by the chosen value.
    ///
    /// Module lists hold several names, so only the word under the cursor is
    /// replaced for them; other values are replaced as a whole.
    fn replace_range(
        &self,
        option: &OptionDescriptor,
        cursor: &Cursor<'_>,
        value: Option<&Token>,
    ) -> Range {
        let Some(value) = value else {
            return cursor.here();
        };
        if cursor.column < value.span.start || cursor.column > value.span.end {
            return cursor.here();
        }

        if matches!(option.choices, Choices::Modules) {
            let text = cursor.text();
            let before = &text[value.span.start..cursor.column];
            let after = &text[cursor.column..value.span.end];
            let start = before
                .rfind(char::is_whitespace)
                .map(|idx| value.span.start + idx + 1)
                .unwrap_or(value.span.start);
            let end = after
                .find(char::is_whitespace)
                .map(|idx| cursor.column + idx)
                .unwrap_or(value.span.end);
            return cursor.range(start, end);
        }

        cursor.range(value.span.start, value.span.end)
    }

    /// Convert a value to a completion item
    fn value_to_completion(
        &self,
        option: &OptionDescriptor,
        value: &Value,
        index: usize,
        range: Range,
    ) -> CompletionItem {
        let label = value.to_string();
        CompletionItem {
            label_details: option.annotation_for(&label).map(|annotation| {
                CompletionItemLabelDetails {
                    detail: None,
                    description: Some(annotation.to_string()),
                }
            }),
            kind: Some(CompletionItemKind::VALUE),
            detail: Some(format!("{} {}", option.name, label)),
            sort_text: Some(sort_key(index)),
            filter_text: Some(label.clone()),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: label.clone(),
            })),
            data: Some(option_data(option.name)),
            label,
            ..Default::default()
        }
    }
}

impl Default for ValueCompleter {
    fn default() -> Self {
        Self::new()
    }
}
