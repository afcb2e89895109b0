//! Buglang LSP Server implementation

use std::collections::HashMap;
use std::sync::Arc;

use buglang_config::Settings;
use tokio::sync::{mpsc, Mutex};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use crate::completion::{completion_items, resolve_completion};
use crate::document::DocumentState;
use crate::hover::{generate_hover, HoverOptions};
use crate::symbols::SymbolTables;

/// A diagnostics notification waiting to be sent
struct Publication {
    uri: Url,
    diagnostics: Vec<Diagnostic>,
    version: Option<i32>,
}

/// Buglang Language Server
pub struct BuglangLspServer {
    client: Client,
    documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    publications: mpsc::UnboundedSender<Publication>,
    tables: Arc<SymbolTables>,
    settings: Arc<Settings>,
}

/// Send queued diagnostics to the client one at a time, in queue order
fn spawn_publisher(client: Client) -> mpsc::UnboundedSender<Publication> {
    let (publications_tx, mut publications_rx) = mpsc::unbounded_channel::<Publication>();
    tokio::spawn(async move {
        while let Some(publication) = publications_rx.recv().await {
            client
                .publish_diagnostics(
                    publication.uri,
                    publication.diagnostics,
                    publication.version,
                )
                .await;
        }
    });
    publications_tx
}

impl BuglangLspServer {
    /// Create a server with the Buglang tables and default settings
    pub fn new(client: Client) -> Self {
        Self::with_settings(
            client,
            Arc::new(SymbolTables::buglang()),
            Arc::new(Settings::default()),
        )
    }

    /// Create a server with explicit tables and settings
    ///
    /// Must be called inside a Tokio runtime; diagnostics are sent from a
    /// background task.
    pub fn with_settings(
        client: Client,
        tables: Arc<SymbolTables>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            publications: spawn_publisher(client.clone()),
            client,
            documents: Arc::new(Mutex::new(HashMap::new())),
            tables,
            settings,
        }
    }

    /// Capabilities advertised in the initialize response
    pub fn capabilities(&self) -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::INCREMENTAL,
            )),
            completion_provider: self.settings.completion_enabled().then(|| CompletionOptions {
                resolve_provider: Some(true),
                ..Default::default()
            }),
            hover_provider: self
                .settings
                .hover_enabled()
                .then_some(HoverProviderCapability::Simple(true)),
            ..Default::default()
        }
    }

    /// Diagnostics last computed for a document
    pub async fn diagnostics(&self, uri: &Url) -> Option<Vec<Diagnostic>> {
        let documents = self.documents.lock().await;
        documents.get(uri).map(|doc| self.to_lsp_diagnostics(doc))
    }

    fn to_lsp_diagnostics(&self, doc: &DocumentState) -> Vec<Diagnostic> {
        if !self.settings.diagnostics_enabled() {
            return Vec::new();
        }
        doc.diagnostics
            .iter()
            .map(|diag| crate::convert::diagnostic_to_lsp(diag, self.settings.source()))
            .collect()
    }

    /// Queue diagnostics for the client.
    ///
    /// Callers hold the documents lock, so the queue follows the order in
    /// which documents changed and no handler waits on the client.
    fn publish(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        debug!(%uri, count = diagnostics.len(), "publishing diagnostics");
        let publication = Publication {
            uri,
            diagnostics,
            version,
        };
        if let Err(mpsc::error::SendError(publication)) = self.publications.send(publication) {
            warn!(uri = %publication.uri, "diagnostics publisher stopped");
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for BuglangLspServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: self.capabilities(),
            server_info: Some(ServerInfo {
                name: "buglang-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Buglang LSP server initialized");
        self.client
            .log_message(MessageType::INFO, "Buglang LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutdown requested");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(%uri, "document opened");

        let mut documents = self.documents.lock().await;
        let doc = DocumentState::new(
            uri.clone(),
            params.text_document.text,
            params.text_document.version,
            self.settings.diagnostic_report(),
        );
        let diagnostics = self.to_lsp_diagnostics(&doc);
        let version = doc.version;
        documents.insert(uri.clone(), doc);
        self.publish(uri, diagnostics, Some(version));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        let mut documents = self.documents.lock().await;
        match documents.get_mut(&uri) {
            Some(doc) => {
                doc.update(
                    params.content_changes,
                    params.text_document.version,
                    self.settings.diagnostic_report(),
                );
                let diagnostics = self.to_lsp_diagnostics(doc);
                self.publish(uri, diagnostics, Some(doc.version));
            }
            None => debug!(%uri, "change for unknown document ignored"),
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!(%uri, "document closed");

        let mut documents = self.documents.lock().await;
        documents.remove(&uri);

        // Clear diagnostics
        self.publish(uri, Vec::new(), None);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        if !self.settings.completion_enabled() {
            return Ok(None);
        }
        debug!(
            uri = %params.text_document_position.text_document.uri,
            "received completion request"
        );
        Ok(Some(CompletionResponse::Array(completion_items(
            &self.tables,
        ))))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        debug!(label = %item.label, "resolving completion item");
        Ok(resolve_completion(&self.tables, item))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        if !self.settings.hover_enabled() {
            return Ok(None);
        }
        let TextDocumentPositionParams {
            text_document,
            position,
        } = params.text_document_position_params;

        let documents = self.documents.lock().await;
        let Some(doc) = documents.get(&text_document.uri) else {
            debug!(uri = %text_document.uri, "hover on unknown document");
            return Ok(None);
        };
        let Some(line) = doc.line_text(position.line) else {
            return Ok(None);
        };

        let options = HoverOptions {
            language_id: self.settings.language_id(),
            span: self.settings.hover_span(),
        };
        Ok(generate_hover(&self.tables, line, position.character, options))
    }
}
