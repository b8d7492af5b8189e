//! Document symbol generation for configuration documents
//!
//! Generates the LSP DocumentSymbol hierarchy for the outline view:
//! - Blocks → NAMESPACE (global), PACKAGE (module-set), MODULE (module),
//!   OBJECT (options), with their options as PROPERTY children
//! - Includes → FILE

use kdesrc_conf_core::{Block, BlockKind, ConfDocument, OptionLine};
use tower_lsp::lsp_types::{DocumentSymbol, Range, SymbolKind};

use crate::position::{line_range, span_to_range, to_position};

/// Main analyzer for extracting document symbols
pub struct SymbolAnalyzer;

impl SymbolAnalyzer {
    /// Extract symbols from document text
    pub fn extract_symbols(text: &str) -> Vec<DocumentSymbol> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let document = ConfDocument::parse(text);
        let mut symbols: Vec<(usize, DocumentSymbol)> = Vec::new();

        for include in document.includes() {
            let Some(path) = include.path else {
                continue;
            };
            #[allow(deprecated)]
            let symbol = DocumentSymbol {
                name: path.text,
                detail: Some("include".to_string()),
                kind: SymbolKind::FILE,
                tags: None,
                deprecated: None,
                range: line_range(&document, include.line),
                selection_range: span_to_range(&document, path.span),
                children: None,
            };
            symbols.push((include.line, symbol));
        }

        for (index, block) in document.blocks().iter().enumerate() {
            let children: Vec<DocumentSymbol> = document
                .options_in_block(index)
                .iter()
                .map(|option| Self::option_symbol(&document, option))
                .collect();
            symbols.push((
                block.start_line,
                Self::block_symbol(&document, block, children),
            ));
        }

        symbols.sort_by_key(|(line, _)| *line);
        symbols.into_iter().map(|(_, symbol)| symbol).collect()
    }

    fn block_symbol(
        document: &ConfDocument,
        block: &Block,
        children: Vec<DocumentSymbol>,
    ) -> DocumentSymbol {
        let last_line_end = document
            .line(block.last_line)
            .map(|line| line.len())
            .unwrap_or(0);
        let range = Range::new(
            to_position(document, block.start_line, 0),
            to_position(document, block.last_line, last_line_end),
        );
        let selection_end = block
            .name
            .as_ref()
            .map(|name| name.span.end)
            .unwrap_or(block.keyword.end);

        #[allow(deprecated)]
        DocumentSymbol {
            name: block.title(),
            detail: block.end_line.is_none().then(|| "not terminated".to_string()),
            kind: Self::block_kind(block.kind),
            tags: None,
            deprecated: None,
            range,
            selection_range: Range::new(
                to_position(document, block.start_line, block.keyword.start),
                to_position(document, block.start_line, selection_end),
            ),
            children: Some(children),
        }
    }

    fn option_symbol(document: &ConfDocument, option: &OptionLine) -> DocumentSymbol {
        #[allow(deprecated)]
        DocumentSymbol {
            name: option.key.text.clone(),
            detail: option.value.as_ref().map(|value| value.text.clone()),
            kind: SymbolKind::PROPERTY,
            tags: None,
            deprecated: None,
            range: line_range(document, option.key.span.line),
            selection_range: span_to_range(document, option.key.span),
            children: None,
        }
    }

    /// Map block kinds to symbol kinds
    fn block_kind(kind: BlockKind) -> SymbolKind {
        match kind {
            BlockKind::Global => SymbolKind::NAMESPACE,
            BlockKind::ModuleSet => SymbolKind::PACKAGE,
            BlockKind::Module => SymbolKind::MODULE,
            BlockKind::Options => SymbolKind::OBJECT,
        }
    }
}
