//! Language server backend
//!
//! Keeps the text of open documents and answers requests with the domain
//! engine. Documents are synchronized in full.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kdesrc_conf_core::{ConfDocument, ModuleList, OptionRegistry};
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionOrCommand, CodeActionParams, CodeActionProviderCapability, CompletionItem,
    CompletionOptions, CompletionParams, CompletionResponse, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    DocumentLink, DocumentLinkOptions, DocumentLinkParams, DocumentSymbolParams,
    DocumentSymbolResponse, FoldingRange, FoldingRangeParams, FoldingRangeProviderCapability,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverParams, HoverProviderCapability,
    InitializeParams, InitializeResult, InitializedParams, MessageType, OneOf, SaveOptions,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions, TextDocumentSyncSaveOptions, Url, WorkDoneProgressOptions,
};
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::domain::ConfEngine;
use crate::navigation::PathNavigator;
use crate::structural::{FoldingAnalyzer, SymbolAnalyzer};

/// LSP Backend state
pub struct Backend {
    /// LSP client for sending notifications
    client: Client,
    /// Document store for open documents
    documents: Arc<RwLock<HashMap<Url, String>>>,
    /// Settings from initialization options or the workspace settings file
    settings: Arc<RwLock<Settings>>,
    /// Option registry, replaced when an external catalog is configured
    registry: Arc<RwLock<Arc<OptionRegistry>>>,
    /// Module names, filled in the background after initialization
    modules: ModuleList,
}

impl Backend {
    /// Create a new backend instance
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(RwLock::new(Settings::default())),
            registry: Arc::new(RwLock::new(Arc::new(OptionRegistry::builtin()))),
            modules: ModuleList::new(),
        }
    }

    /// Engine over the current registry and module list
    async fn engine(&self) -> ConfEngine {
        let registry = self.registry.read().await.clone();
        ConfEngine::with_parts(registry, self.modules.clone())
    }

    /// Get document text by URI
    async fn get_document(&self, uri: &Url) -> Option<String> {
        let docs = self.documents.read().await;
        docs.get(uri).cloned()
    }

    /// Store document text
    async fn store_document(&self, uri: Url, text: String) {
        let mut docs = self.documents.write().await;
        docs.insert(uri, text);
    }

    /// Remove document from store
    async fn remove_document(&self, uri: &Url) {
        let mut docs = self.documents.write().await;
        docs.remove(uri);
    }

    /// Validate a document and publish diagnostics
    async fn validate(&self, uri: Url, text: String) {
        debug!("Validating document: {}", uri);

        let engine = self.engine().await;
        let diagnostics = {
            let settings = self.settings.read().await;
            engine.validate_document(&text, &settings.diagnostics)
        };

        debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// Settings for this session: initialization options first, then the
    /// settings file of the workspace root.
    fn select_settings(options: Option<Value>, root: Option<&Path>) -> Settings {
        if let Some(options) = options {
            match Settings::from_json_value(options) {
                Ok(settings) => return settings,
                Err(e) => warn!("Ignoring invalid initialization options: {}", e),
            }
        }
        root.and_then(Settings::load_from_dir).unwrap_or_default()
    }

    /// Workspace root announced by the client
    #[allow(deprecated)]
    fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
        let folder = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| &folder.uri);
        folder
            .or(params.root_uri.as_ref())
            .and_then(|uri| uri.to_file_path().ok())
    }

    /// Load the configured catalog, keeping the built-in one on failure
    async fn load_catalog(&self, settings: &Settings, root: Option<&Path>) {
        let Some(path) = settings.catalog_path(root) else {
            return;
        };

        match OptionRegistry::with_catalog_file(&path) {
            Ok(registry) => {
                let report = registry.report();
                if !report.is_clean() {
                    warn!(
                        "Catalog {} is inconsistent: {} undocumented, {} unknown entries",
                        path.display(),
                        report.undocumented.len(),
                        report.missing.len()
                    );
                }
                info!("Using option catalog {}", path.display());
                *self.registry.write().await = Arc::new(registry);
            }
            Err(e) => {
                warn!("Keeping the bundled catalog: {}", e);
                self.client
                    .show_message(
                        MessageType::WARNING,
                        format!("kdesrc-build: Cannot load option catalog: {e}"),
                    )
                    .await;
            }
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("kdesrc-conf LSP server initializing");

        let root = Self::workspace_root(&params);
        let settings = Self::select_settings(params.initialization_options, root.as_deref());
        self.load_catalog(&settings, root.as_deref()).await;
        *self.settings.write().await = settings;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: Some(vec![
                        " ".to_string(), // After an option key
                        "/".to_string(), // Include path segments
                    ]),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                document_link_provider: Some(DocumentLinkOptions {
                    resolve_provider: Some(false),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                }),
                document_symbol_provider: Some(OneOf::Left(true)),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "kdesrc-conf-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("kdesrc-conf LSP server initialized");

        let settings = self.settings.read().await.modules.clone();
        if !settings.fetch {
            debug!("Module list fetching is disabled");
            return;
        }

        let client = self.client.clone();
        let modules = self.modules.clone();
        tokio::spawn(async move {
            let command = settings.command;
            let fetched = tokio::task::spawn_blocking(move || modules.populate(&command)).await;
            match fetched {
                Ok(Ok(count)) => {
                    debug!("Module list holds {} names", count);
                    client
                        .log_message(MessageType::INFO, "kdesrc-build: Loaded list of modules")
                        .await;
                }
                Ok(Err(e)) => {
                    warn!("Module list unavailable: {}", e);
                    client
                        .log_message(
                            MessageType::WARNING,
                            "kdesrc-build: Failed to fetch list of modules",
                        )
                        .await;
                }
                Err(e) => warn!("Module list task failed: {}", e),
            }
        });
    }

    async fn shutdown(&self) -> Result<()> {
        info!("kdesrc-conf LSP server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        self.store_document(uri.clone(), text.clone()).await;
        self.validate(uri, text).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);
        // FULL sync: the whole content is in the last change
        if let Some(change) = params.content_changes.into_iter().last() {
            let uri = params.text_document.uri;
            self.store_document(uri.clone(), change.text.clone()).await;
            self.validate(uri, change.text).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);
        let uri = params.text_document.uri;
        let text = match params.text {
            Some(text) => {
                self.store_document(uri.clone(), text.clone()).await;
                Some(text)
            }
            None => self.get_document(&uri).await,
        };
        if let Some(text) = text {
            self.validate(uri, text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);
        self.remove_document(&params.text_document.uri).await;
        // Clear diagnostics for closed document
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        debug!("Completion request for: {}", uri);

        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for completion: {}", uri);
            return Ok(None);
        };

        let path = uri.to_file_path().ok();
        let position = params.text_document_position.position;
        let items = self
            .engine()
            .await
            .get_completions(&text, position, path.as_deref());

        if items.is_empty() {
            Ok(None)
        } else {
            debug!("Generated {} completions for {}", items.len(), uri);
            Ok(Some(CompletionResponse::Array(items)))
        }
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        Ok(self.engine().await.resolve_completion(item))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for hover: {}", uri);
            return Ok(None);
        };

        let position = params.text_document_position_params.position;
        Ok(self.engine().await.get_hover(&text, position))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for definition: {}", uri);
            return Ok(None);
        };

        let path = uri.to_file_path().ok();
        let registry = self.registry.read().await.clone();
        let document = ConfDocument::parse(&text);
        let navigator = PathNavigator::new(&document, &registry, path.as_deref());

        Ok(navigator
            .definition(params.text_document_position_params.position)
            .map(GotoDefinitionResponse::Scalar))
    }

    async fn document_link(&self, params: DocumentLinkParams) -> Result<Option<Vec<DocumentLink>>> {
        let uri = params.text_document.uri;
        debug!("Document link request for: {}", uri);

        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for links: {}", uri);
            return Ok(None);
        };

        let path = uri.to_file_path().ok();
        let registry = self.registry.read().await.clone();
        let document = ConfDocument::parse(&text);
        let links = PathNavigator::new(&document, &registry, path.as_deref()).document_links();

        debug!("Generated {} document links for {}", links.len(), uri);
        Ok(Some(links))
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        debug!("Document symbol request for: {}", uri);

        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for symbols: {}", uri);
            return Ok(None);
        };

        let symbols = SymbolAnalyzer::extract_symbols(&text);
        debug!("Generated {} document symbols for {}", symbols.len(), uri);

        Ok(Some(DocumentSymbolResponse::Nested(symbols)))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let uri = params.text_document.uri;
        debug!("Folding range request for: {}", uri);

        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for folding: {}", uri);
            return Ok(None);
        };

        let ranges = FoldingAnalyzer::generate_ranges(&text);
        debug!("Generated {} folding ranges for {}", ranges.len(), uri);

        Ok(Some(ranges))
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<Vec<CodeActionOrCommand>>> {
        let uri = params.text_document.uri.clone();
        debug!("Code action request for: {}", uri);

        let Some(text) = self.get_document(&uri).await else {
            warn!("Document not found for code action: {}", uri);
            return Ok(None);
        };

        let actions = self.engine().await.get_code_actions(&text, &params);
        if actions.is_empty() {
            Ok(None)
        } else {
            debug!("Generated {} code actions for {}", actions.len(), uri);
            Ok(Some(
                actions
                    .into_iter()
                    .map(CodeActionOrCommand::CodeAction)
                    .collect(),
            ))
        }
    }
}

/// Filter built from `RUST_LOG` directives, `info` when none are given
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Run the language server on stdin/stdout
pub async fn run_server() {
    // Logs go to stderr, stdout carries the protocol
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .try_init();

    info!(
        "Starting kdesrc-conf Language Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_initialization_options_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("kdesrc-conf.toml"),
            "[modules]\nfetch = false\n",
        )
        .unwrap();

        let options = serde_json::json!({ "diagnostics": { "unknown_option": "error" } });
        let settings = Backend::select_settings(Some(options), Some(dir.path()));
        assert!(settings.modules.fetch);

        let settings = Backend::select_settings(None, Some(dir.path()));
        assert!(!settings.modules.fetch);
    }

    #[test]
    fn test_invalid_options_fall_back_to_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".kdesrc-conf.toml"), "[modules]\nfetch = false\n").unwrap();

        let settings = Backend::select_settings(Some(serde_json::json!(42)), Some(dir.path()));
        assert!(!settings.modules.fetch);

        let settings = Backend::select_settings(None, None);
        assert!(settings.modules.fetch);
    }

    #[test]
    fn test_log_filter_honors_directives() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("")).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    #[allow(deprecated)]
    fn test_workspace_root() {
        let mut params = InitializeParams::default();
        assert!(Backend::workspace_root(&params).is_none());

        params.root_uri = Some(Url::parse("file:///home/user/kde").unwrap());
        assert_eq!(
            Backend::workspace_root(&params),
            Some(PathBuf::from("/home/user/kde"))
        );
    }
}
