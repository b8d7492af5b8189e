//! Hover documentation for option keys

use kdesrc_conf_core::{ConfDocument, OptionRegistry};
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};

use crate::position::{span_to_range, to_byte_position};

/// Provides option documentation on hover
pub struct HoverProvider<'a> {
    registry: &'a OptionRegistry,
}

impl<'a> HoverProvider<'a> {
    pub fn new(registry: &'a OptionRegistry) -> Self {
        Self { registry }
    }

    /// Documentation of the known option key under the cursor
    pub fn hover(&self, document: &ConfDocument, position: Position) -> Option<Hover> {
        let (line, column) = to_byte_position(document, position)?;
        let key = document.option_key_at_line(line)?;
        if !key.span.touches(line, column) {
            return None;
        }

        let option = self.registry.get(&key.text)?;
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: option.render_markdown(),
            }),
            range: Some(span_to_range(document, key.span)),
        })
    }
}
