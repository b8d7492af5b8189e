//! Completion engine for kdesrc-build configuration files
//!
//! Provides completions for:
//! - Option names inside blocks, filtered by the block's scope
//! - Option values: booleans, choices and defaults
//! - Include paths and block snippets outside blocks

mod include;
mod option;
mod value;

pub use include::IncludeCompleter;
pub use option::OptionCompleter;
pub use value::ValueCompleter;

use std::path::Path;

use kdesrc_conf_core::{BlockKind, ConfDocument, LineKind, ModuleList, OptionRegistry, Token};
use serde_json::{json, Value};
use tower_lsp::lsp_types::{
    CompletionItem, Documentation, MarkupContent, MarkupKind, Position, Range,
};

use crate::position::{to_byte_position, to_position};

/// Key of the option name in `CompletionItem::data`
pub const OPTION_DATA_KEY: &str = "option";

/// Context detected for completion
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionContext {
    /// Outside any block, on an `include` line
    IncludePath { path: Option<Token> },
    /// Outside any block, anywhere else
    TopLevel,
    /// Inside a block where an option name is expected
    OptionName {
        block: BlockKind,
        key: Option<Token>,
        has_value: bool,
    },
    /// After an option key
    OptionValue { option: String, value: Option<Token> },
    /// No completion context detected
    None,
}

/// Main completion engine
pub struct CompletionEngine<'a> {
    registry: &'a OptionRegistry,
    modules: &'a ModuleList,
    option_completer: OptionCompleter,
    value_completer: ValueCompleter,
    include_completer: IncludeCompleter,
}

impl<'a> CompletionEngine<'a> {
    pub fn new(registry: &'a OptionRegistry, modules: &'a ModuleList) -> Self {
        Self {
            registry,
            modules,
            option_completer: OptionCompleter::new(),
            value_completer: ValueCompleter::new(),
            include_completer: IncludeCompleter::new(),
        }
    }

    /// Get completions at the given position
    pub fn get_completions(
        &self,
        document: &ConfDocument,
        position: Position,
        document_path: Option<&Path>,
    ) -> Vec<CompletionItem> {
        let Some((line, column)) = to_byte_position(document, position) else {
            return Vec::new();
        };
        let cursor = Cursor {
            document,
            line,
            column,
        };

        match Self::detect_context(document, line, column) {
            CompletionContext::IncludePath { path } => {
                self.include_completer
                    .complete_path(&cursor, path.as_ref(), document_path)
            }
            CompletionContext::TopLevel => self.include_completer.complete_top_level(),
            CompletionContext::OptionName {
                block,
                key,
                has_value,
            } => self.option_completer.complete(
                self.registry,
                &cursor,
                block,
                key.as_ref(),
                has_value,
            ),
            CompletionContext::OptionValue { option, value } => {
                let descriptor = self.registry.get_or_fallback(&option);
                self.value_completer
                    .complete(descriptor, self.modules, &cursor, value.as_ref())
            }
            CompletionContext::None => Vec::new(),
        }
    }

    /// Fill in the documentation of an item produced by this engine
    pub fn resolve(&self, mut item: CompletionItem) -> CompletionItem {
        let option = item
            .data
            .as_ref()
            .and_then(|data| data.get(OPTION_DATA_KEY))
            .and_then(Value::as_str)
            .and_then(|name| self.registry.get(name));

        if let Some(option) = option {
            item.documentation = Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: option.render_markdown(),
            }));
        }
        item
    }

    /// Detect the completion context at a byte column
    pub fn detect_context(document: &ConfDocument, line: usize, column: usize) -> CompletionContext {
        let Some(text) = document.line(line) else {
            return CompletionContext::None;
        };

        if document.is_comment_at(line, column) {
            return CompletionContext::None;
        }

        let kind = document.line_kind(line);
        if matches!(
            kind,
            Some(LineKind::BlockEnd { .. }) | Some(LineKind::BlockStart { name: Some(_), .. })
        ) {
            return CompletionContext::None;
        }

        let Some(block) = document.scope_at(line) else {
            return match kind {
                // The keyword must be followed by whitespace (space or tab)
                Some(LineKind::Include { keyword, path })
                    if text[keyword.span.end..].starts_with(char::is_whitespace) =>
                {
                    CompletionContext::IncludePath { path: path.clone() }
                }
                _ => CompletionContext::TopLevel,
            };
        };

        match kind {
            Some(LineKind::Option { key, value }) if column > key.span.end => {
                CompletionContext::OptionValue {
                    option: key.text.clone(),
                    value: value.clone(),
                }
            }
            Some(LineKind::Option { key, value }) if column >= key.span.start => {
                CompletionContext::OptionName {
                    block,
                    key: Some(key.clone()),
                    has_value: value.is_some(),
                }
            }
            Some(LineKind::Include { .. }) => CompletionContext::None,
            _ => CompletionContext::OptionName {
                block,
                key: None,
                has_value: false,
            },
        }
    }
}

/// Cursor location shared with the completers
pub(crate) struct Cursor<'a> {
    pub document: &'a ConfDocument,
    pub line: usize,
    pub column: usize,
}

impl Cursor<'_> {
    pub fn text(&self) -> &str {
        self.document.line(self.line).unwrap_or_default()
    }

    /// LSP range between two byte columns of the cursor line
    pub fn range(&self, start: usize, end: usize) -> Range {
        Range::new(
            to_position(self.document, self.line, start),
            to_position(self.document, self.line, end),
        )
    }

    /// Empty range at the cursor
    pub fn here(&self) -> Range {
        self.range(self.column, self.column)
    }
}

/// Data attached to items so that `completionItem/resolve` can find the option
pub(crate) fn option_data(name: &str) -> Value {
    json!({ OPTION_DATA_KEY: name })
}

/// Sort key preserving the order in which items were produced
pub(crate) fn sort_key(index: usize) -> String {
    format!("{index:04}")
}
