//! Domain Intelligence Engine for kdesrc-conf LSP
//!
//! Provides context-aware assistance:
//! - Completion (option names, values, include paths, block snippets)
//! - Hover documentation for option keys
//! - Validation (unknown, misplaced and deprecated options, block structure)
//! - Code actions (closing the enclosing block)

pub mod actions;
pub mod completion;
pub mod hover;
pub mod validation;


pub use completion::{CompletionContext, CompletionEngine};
pub use hover::HoverProvider;
pub use validation::ConfValidator;

use std::path::Path;
use std::sync::Arc;

use kdesrc_conf_core::{ConfDocument, ModuleList, OptionRegistry};
use tower_lsp::lsp_types::{
    CodeAction, CodeActionParams, CompletionItem, Diagnostic, Hover, Position,
};

use crate::config::DiagnosticSettings;
use crate::position::to_byte_position;

/// Main domain engine coordinating all domain intelligence.
///
/// Cheap to create: the registry and the module list are shared.
#[derive(Clone)]
pub struct ConfEngine {
    registry: Arc<OptionRegistry>,
    modules: ModuleList,
}

impl ConfEngine {
    /// Create an engine with the built-in registry and no known modules
    pub fn new() -> Self {
        Self::with_parts(Arc::new(OptionRegistry::builtin()), ModuleList::new())
    }

    pub fn with_parts(registry: Arc<OptionRegistry>, modules: ModuleList) -> Self {
        Self { registry, modules }
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn modules(&self) -> &ModuleList {
        &self.modules
    }

    /// Get completions at the given position
    pub fn get_completions(
        &self,
        text: &str,
        position: Position,
        document_path: Option<&Path>,
    ) -> Vec<CompletionItem> {
        let document = ConfDocument::parse(text);
        CompletionEngine::new(&self.registry, &self.modules).get_completions(
            &document,
            position,
            document_path,
        )
    }

    /// Add documentation to a completion item
    pub fn resolve_completion(&self, item: CompletionItem) -> CompletionItem {
        CompletionEngine::new(&self.registry, &self.modules).resolve(item)
    }

    /// Get hover documentation at the given position
    pub fn get_hover(&self, text: &str, position: Position) -> Option<Hover> {
        let document = ConfDocument::parse(text);
        HoverProvider::new(&self.registry).hover(&document, position)
    }

    /// Validate the document
    pub fn validate_document(&self, text: &str, settings: &DiagnosticSettings) -> Vec<Diagnostic> {
        let document = ConfDocument::parse(text);
        ConfValidator::new(&self.registry, settings).validate(&document)
    }

    /// Get code actions for the given context
    pub fn get_code_actions(&self, text: &str, params: &CodeActionParams) -> Vec<CodeAction> {
        let document = ConfDocument::parse(text);
        let Some((line, column)) = to_byte_position(&document, params.range.start) else {
            return Vec::new();
        };

        actions::close_block_action(&document, &params.text_document.uri, line, column)
            .into_iter()
            .collect()
    }
}

impl Default for ConfEngine {
    fn default() -> Self {
        Self::new()
    }
}
