//
// backend.rs
//
// Copyright (C) 2022-2026 Posit Software, PBC. All rights reserved.
// Modifications copyright (C) 2026 Jonathan Marc Bearak
//

use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tower_lsp::LanguageServer;
use tower_lsp::LspService;
use tower_lsp::Server;

use crate::config::{log_settings, parse_settings};
use crate::handlers;
use crate::state::WorldState;

pub struct Backend {
    client: Client,
    state: Arc<RwLock<WorldState>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(WorldState::new())),
        }
    }

    /// Analyze `uri` off the async runtime and publish what it reports.
    async fn publish_diagnostics(&self, uri: &Url) {
        let (snapshot, version) = {
            let state = self.state.read().await;
            let version = state.get_document(uri).and_then(|d| d.version);
            match state.snapshot(uri) {
                Some(snapshot) => (snapshot, version),
                None => {
                    log::trace!("Skipping diagnostics for {}: not open", uri);
                    return;
                }
            }
        };

        let diagnostics =
            match tokio::task::spawn_blocking(move || handlers::diagnostics(&snapshot)).await {
                Ok(diagnostics) => diagnostics,
                Err(e) => {
                    log::error!("Diagnostics task for {} failed: {}", uri, e);
                    return;
                }
            };

        // Drop results computed for a version that has since changed
        {
            let state = self.state.read().await;
            let current_version = state.get_document(uri).and_then(|d| d.version);
            if current_version != version {
                log::trace!(
                    "Skipping diagnostics for {}: version changed (was {:?}, now {:?})",
                    uri,
                    version,
                    current_version
                );
                return;
            }
        }

        self.client
            .publish_diagnostics(uri.clone(), diagnostics, version)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        log::info!("Initializing proto-lang");

        let mut state = self.state.write().await;

        if let Some(folders) = params.workspace_folders {
            for folder in folders {
                log::info!("Adding workspace folder: {}", folder.uri);
                state.workspace_folders.push(folder.uri);
            }
        } else if let Some(root_uri) = params.root_uri {
            log::info!("Adding root URI as workspace folder: {}", root_uri);
            state.workspace_folders.push(root_uri);
        }

        if let Some(settings) = params.initialization_options.as_ref().and_then(parse_settings) {
            state.apply_settings(settings);
            log_settings(&state.settings);
        }

        drop(state);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                document_symbol_provider: Some(OneOf::Left(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![String::from(".")]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: String::from("proto-lang"),
                version: Some(String::from(env!("CARGO_PKG_VERSION"))),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("proto-lang initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        log::info!("proto-lang shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut state = self.state.write().await;
            state.open_document(
                uri.clone(),
                &params.text_document.text,
                Some(params.text_document.version),
            );
        }
        self.publish_diagnostics(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut state = self.state.write().await;
            let Some(doc) = state.documents.get_mut(&uri) else {
                log::warn!("Change for unopened document {}", uri);
                return;
            };
            for change in params.content_changes {
                doc.apply_change(change);
            }
            doc.version = Some(params.text_document.version);
        }
        self.publish_diagnostics(&uri).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        self.publish_diagnostics(&params.text_document.uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        {
            let mut state = self.state.write().await;
            state.close_document(&uri);
        }
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        log::trace!("Configuration changed, revalidating open documents");

        let Some(settings) = parse_settings(&params.settings) else {
            log::warn!("Failed to parse settings, keeping the existing configuration");
            return;
        };

        let open_uris: Vec<Url> = {
            let mut state = self.state.write().await;
            state.apply_settings(settings);
            log_settings(&state.settings);
            state.documents.keys().cloned().collect()
        };

        for uri in open_uris {
            self.publish_diagnostics(&uri).await;
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        let uri = params.text_document.uri;
        let text = {
            let state = self.state.read().await;
            match state.get_document(&uri) {
                Some(doc) => doc.text(),
                None => return Ok(None),
            }
        };
        Ok(handlers::document_symbol(&uri, &text))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let (snapshot, version) = {
            let state = self.state.read().await;
            let version = state.get_document(&uri).and_then(|d| d.version);
            match state.snapshot(&uri) {
                Some(snapshot) => (snapshot, version),
                None => return Ok(None),
            }
        };

        let outcome =
            match tokio::task::spawn_blocking(move || handlers::completion(&snapshot, position))
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Completion task for {} failed: {}", uri, e);
                    return Ok(Some(CompletionResponse::Array(Vec::new())));
                }
            };

        self.client
            .publish_diagnostics(uri, outcome.diagnostics, version)
            .await;

        Ok(Some(CompletionResponse::Array(outcome.items)))
    }
}

pub async fn start_lsp() -> anyhow::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::build(Backend::new).finish();
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
