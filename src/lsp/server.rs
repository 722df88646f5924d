//! LSP server implementation using lsp-server (synchronous).
//!
//! Requests are handled one at a time on the thread that owns the document
//! cache, so every query sees the most recent edit.

use std::collections::{HashMap, HashSet};

use abnf_lsp::AbnfDatabase;
use abnf_lsp::DocumentIndex;
use abnf_lsp::features::{self, CompletionKind};
use abnf_syntax::Span;
use lsp_server::{Connection, ErrorCode, Message, Notification, Request, RequestId, Response};
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionOptions, CompletionParams, CompletionResponse,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse, Documentation,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverContents, HoverParams,
    HoverProviderCapability, InitializeParams, Location, MarkupContent, MarkupKind,
    PrepareRenameResponse, ReferenceParams, RenameOptions, RenameParams, ServerCapabilities,
    SymbolKind, TextDocumentPositionParams, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions, TextEdit, Uri, WorkspaceEdit,
    notification::{
        DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, Exit,
        Notification as _,
    },
    request::{
        Completion, DocumentSymbolRequest, GotoDefinition, HoverRequest, PrepareRenameRequest,
        References, Rename, Request as _,
    },
};
use ropey::Rope;

use super::config::ServerConfig;
use super::error::ServerError;
use super::pretty::hover_markdown;
use super::tracing_layer::LspLayerHandle;

/// Main LSP server state.
struct LspServer {
    connection: Connection,
    db: AbnfDatabase,
    config: ServerConfig,
    /// Documents accepted on open, tracked until they are closed.
    open_documents: HashSet<String>,
}

impl LspServer {
    fn new(connection: Connection, config: ServerConfig) -> Self {
        Self {
            connection,
            db: AbnfDatabase::default(),
            config,
            open_documents: HashSet::new(),
        }
    }

    fn run(&mut self) -> Result<(), ServerError> {
        loop {
            let msg = self.connection.receiver.recv()?;
            if self.process_message(msg)? {
                return Ok(());
            }
        }
    }

    /// Process a single message. Returns `Ok(true)` once the server should stop.
    fn process_message(&mut self, msg: Message) -> Result<bool, ServerError> {
        match msg {
            Message::Request(req) => {
                if self.connection.handle_shutdown(&req)? {
                    self.db.dispose_all();
                    return Ok(true);
                }
                self.handle_request(req)?;
            }
            Message::Response(_) => {
                // We don't send requests, so we shouldn't get responses
            }
            Message::Notification(notif) => {
                if notif.method == Exit::METHOD {
                    tracing::warn!("Exit received without shutdown");
                    self.db.dispose_all();
                    return Ok(true);
                }
                self.handle_notification(notif);
            }
        }
        Ok(false)
    }

    fn handle_request(&mut self, req: Request) -> Result<(), ServerError> {
        tracing::debug!(method = %req.method, "Received request");

        let method = req.method.clone();
        let response = if method == HoverRequest::METHOD {
            self.dispatch::<HoverRequest>(req, Self::hover)
        } else if method == GotoDefinition::METHOD {
            self.dispatch::<GotoDefinition>(req, Self::goto_definition)
        } else if method == References::METHOD {
            self.dispatch::<References>(req, Self::find_references)
        } else if method == DocumentSymbolRequest::METHOD {
            self.dispatch::<DocumentSymbolRequest>(req, Self::document_symbols)
        } else if method == PrepareRenameRequest::METHOD {
            self.dispatch::<PrepareRenameRequest>(req, Self::prepare_rename)
        } else if method == Rename::METHOD {
            self.dispatch::<Rename>(req, Self::rename)
        } else if method == Completion::METHOD {
            self.dispatch::<Completion>(req, Self::completion)
        } else {
            tracing::warn!(method = %method, "Unknown request");
            Response::new_err(
                req.id,
                ErrorCode::MethodNotFound as i32,
                format!("unknown request: {method}"),
            )
        };

        self.connection.sender.send(Message::Response(response))?;
        Ok(())
    }

    /// Decode the params of `req` and answer it with `handler`.
    fn dispatch<R: lsp_types::request::Request>(
        &self,
        req: Request,
        handler: fn(&Self, R::Params) -> R::Result,
    ) -> Response {
        match cast_request::<R>(req) {
            Ok((id, params)) => Response::new_ok(id, handler(self, params)),
            Err((id, error)) => {
                tracing::warn!(method = R::METHOD, %error, "Invalid request params");
                Response::new_err(id, ErrorCode::InvalidParams as i32, error.to_string())
            }
        }
    }

    fn handle_notification(&mut self, notif: Notification) {
        if let Some(params) = cast_notification::<DidOpenTextDocument>(notif.clone()) {
            self.did_open(params);
        } else if let Some(params) = cast_notification::<DidChangeTextDocument>(notif.clone()) {
            self.did_change(params);
        } else if let Some(params) = cast_notification::<DidCloseTextDocument>(notif.clone()) {
            self.did_close(params);
        } else {
            tracing::debug!(method = %notif.method, "Ignored notification");
        }
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        let uri = document.uri.as_str();

        if !self.config.accepts(&document.language_id) {
            tracing::debug!(uri, language_id = %document.language_id, "Ignoring document");
            return;
        }

        tracing::info!(uri, "Document opened");
        self.open_documents.insert(uri.to_owned());
        self.db.upsert(uri, &document.text);
    }

    fn did_change(&mut self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.as_str();
        if !self.open_documents.contains(uri) {
            return;
        }

        // Full sync: every change carries the whole text and the last one wins.
        let Some(change) = params
            .content_changes
            .into_iter()
            .rev()
            .find(|change| change.range.is_none())
        else {
            tracing::warn!(uri, "Change without the full document text");
            return;
        };

        tracing::debug!(uri, version = params.text_document.version, "Document changed");
        self.db.upsert(uri, &change.text);
    }

    fn did_close(&mut self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.as_str();
        if self.open_documents.remove(uri) {
            tracing::info!(uri, "Document closed");
        }
        self.db.invalidate(uri);
    }

    /// The index of the document and the byte offset of the position in it.
    fn locate(&self, params: &TextDocumentPositionParams) -> Option<(&DocumentIndex, usize)> {
        let index = self.db.get(params.text_document.uri.as_str())?;
        let position = params.position;
        let offset = offset_from_position(index.text(), position.line, position.character)?;
        Some((index, offset))
    }

    fn hover(&self, params: HoverParams) -> Option<Hover> {
        let position = &params.text_document_position_params;
        tracing::debug!(
            line = position.position.line,
            character = position.position.character,
            "Hover request"
        );

        let (index, offset) = self.locate(position)?;
        let info = features::hover(index, offset)?;
        Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: hover_markdown(&info.content),
            }),
            range: Some(span_to_range(index.text(), info.span)),
        })
    }

    fn goto_definition(&self, params: GotoDefinitionParams) -> Option<GotoDefinitionResponse> {
        let position = &params.text_document_position_params;
        tracing::debug!(
            line = position.position.line,
            character = position.position.character,
            "Goto definition request"
        );

        let (index, offset) = self.locate(position)?;
        let location = features::goto_definition(index, offset)?;
        to_lsp_location(index, &location).map(GotoDefinitionResponse::Scalar)
    }

    fn find_references(&self, params: ReferenceParams) -> Option<Vec<Location>> {
        let position = &params.text_document_position;
        tracing::debug!(
            line = position.position.line,
            character = position.position.character,
            include_declaration = params.context.include_declaration,
            "References request"
        );

        let (index, offset) = self.locate(position)?;
        let locations =
            features::find_references(index, offset, params.context.include_declaration);
        if locations.is_empty() {
            return None;
        }
        Some(
            locations
                .iter()
                .filter_map(|location| to_lsp_location(index, location))
                .collect(),
        )
    }

    fn document_symbols(&self, params: DocumentSymbolParams) -> Option<DocumentSymbolResponse> {
        let index = self.db.get(params.text_document.uri.as_str())?;
        let rope = index.text();

        #[allow(deprecated)]
        let symbols = features::document_symbols(index)
            .into_iter()
            .map(|symbol| DocumentSymbol {
                name: symbol.name,
                detail: None,
                kind: SymbolKind::FUNCTION,
                tags: None,
                deprecated: None,
                range: span_to_range(rope, symbol.range),
                selection_range: span_to_range(rope, symbol.selection_range),
                children: None,
            })
            .collect::<Vec<_>>();

        tracing::debug!(symbols = symbols.len(), "Document symbols response");
        Some(DocumentSymbolResponse::Nested(symbols))
    }

    fn prepare_rename(&self, params: TextDocumentPositionParams) -> Option<PrepareRenameResponse> {
        let (index, offset) = self.locate(&params)?;
        let (span, placeholder) = features::prepare_rename(index, offset)?;
        Some(PrepareRenameResponse::RangeWithPlaceholder {
            range: span_to_range(index.text(), span),
            placeholder,
        })
    }

    fn rename(&self, params: RenameParams) -> Option<WorkspaceEdit> {
        let position = &params.text_document_position;
        let (index, offset) = self.locate(position)?;

        let edits = match features::rename(index, offset, &params.new_name) {
            Ok(edits) => edits?,
            Err(error) => {
                tracing::warn!(new_name = %params.new_name, %error, "Rejected rename");
                return None;
            }
        };

        let text_edits = edits
            .into_iter()
            .map(|edit| TextEdit {
                range: span_to_range(index.text(), edit.span),
                new_text: edit.new_text,
            })
            .collect();

        let mut changes = HashMap::new();
        changes.insert(position.text_document.uri.clone(), text_edits);
        Some(WorkspaceEdit {
            changes: Some(changes),
            ..Default::default()
        })
    }

    fn completion(&self, params: CompletionParams) -> Option<CompletionResponse> {
        let uri = &params.text_document_position.text_document.uri;
        let index = self.db.get(uri.as_str())?;

        let items = features::completions(index)
            .into_iter()
            .map(|entry| CompletionItem {
                label: entry.label,
                kind: Some(match entry.kind {
                    CompletionKind::Rule => CompletionItemKind::FUNCTION,
                    CompletionKind::CoreRule => CompletionItemKind::CONSTANT,
                }),
                detail: Some(entry.detail.to_string()),
                documentation: entry
                    .documentation
                    .map(|text| Documentation::String(text.to_string())),
                ..Default::default()
            })
            .collect();

        Some(CompletionResponse::Array(items))
    }
}

/// Get the server capabilities for the ABNF language server.
fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                ..Default::default()
            },
        )),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        document_symbol_provider: Some(lsp_types::OneOf::Left(true)),
        definition_provider: Some(lsp_types::OneOf::Left(true)),
        references_provider: Some(lsp_types::OneOf::Left(true)),
        rename_provider: Some(lsp_types::OneOf::Right(RenameOptions {
            prepare_provider: Some(true),
            work_done_progress_options: Default::default(),
        })),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(false),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Initialize the LSP server with the given connection.
///
/// This performs the LSP initialize handshake and returns a ready-to-run server.
fn initialize_server(connection: Connection) -> Result<LspServer, ServerError> {
    let capabilities = server_capabilities();
    let server_capabilities = serde_json::to_value(&capabilities)?;
    let init_params = connection.initialize(server_capabilities)?;
    let params: InitializeParams = serde_json::from_value(init_params)?;
    let config = ServerConfig::from_initialization_options(params.initialization_options);
    Ok(LspServer::new(connection, config))
}

/// Start the LSP server on stdio.
pub fn serve(log: LspLayerHandle) -> Result<(), ServerError> {
    let (connection, io_threads) = Connection::stdio();

    let mut server = initialize_server(connection)?;
    if server.config.log_to_client {
        log.attach(&server.connection);
    }
    tracing::info!(language_ids = ?server.config.language_ids, "ABNF language server started");

    let result = server.run();

    // The writer thread only finishes once every sender is gone.
    log.detach();
    drop(server);
    result?;
    io_threads.join()?;
    Ok(())
}

fn span_to_range(rope: &Rope, span: Span) -> lsp_types::Range {
    let start = position_from_offset(rope, span.start);
    let end = position_from_offset(rope, span.end);
    lsp_types::Range {
        start: lsp_types::Position {
            line: start.0,
            character: start.1,
        },
        end: lsp_types::Position {
            line: end.0,
            character: end.1,
        },
    }
}

fn to_lsp_location(index: &DocumentIndex, location: &features::Location) -> Option<Location> {
    let uri = location.document.parse::<Uri>().ok()?;
    Some(Location {
        uri,
        range: span_to_range(index.text(), location.span),
    })
}

/// Convert a byte offset to an LSP (line, UTF-16 column) pair.
fn position_from_offset(rope: &Rope, offset: usize) -> (u32, u32) {
    let offset = offset.min(rope.len_bytes());
    let char_index = rope.byte_to_char(offset);
    let line = rope.char_to_line(char_index);
    let line_start_char = rope.line_to_char(line);
    let slice = line_without_newline(rope, line);
    let char_in_line = char_index.saturating_sub(line_start_char);
    let utf16 = slice.char_to_utf16_cu(char_in_line.min(slice.len_chars()));
    (line as u32, utf16 as u32)
}

/// Convert an LSP position to a byte offset, clamping the column to the line.
fn offset_from_position(rope: &Rope, line: u32, character: u32) -> Option<usize> {
    let line = line as usize;
    if line >= rope.len_lines() {
        return None;
    }
    let line_start_char = rope.line_to_char(line);
    let slice = line_without_newline(rope, line);
    let utf16_offset = (character as usize).min(slice.len_utf16_cu());
    let char_offset = slice.utf16_cu_to_char(utf16_offset);
    Some(rope.char_to_byte(line_start_char + char_offset))
}

fn line_without_newline(rope: &Rope, line: usize) -> ropey::RopeSlice<'_> {
    let line_slice = rope.line(line);
    let mut end = line_slice.len_chars();
    if end > 0 && line_slice.char(end - 1) == '\n' {
        end -= 1;
    }
    line_slice.slice(..end)
}

/// Decode a request's params, keeping the id for the error response.
fn cast_request<R: lsp_types::request::Request>(
    req: Request,
) -> Result<(RequestId, R::Params), (RequestId, serde_json::Error)> {
    match serde_json::from_value(req.params) {
        Ok(params) => Ok((req.id, params)),
        Err(error) => Err((req.id, error)),
    }
}

/// Cast a notification to a specific type.
fn cast_notification<N: lsp_types::notification::Notification>(
    notif: Notification,
) -> Option<N::Params> {
    if notif.method == N::METHOD {
        serde_json::from_value(notif.params).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use lsp_types::notification::Notification as _;
    use lsp_types::request::Request as _;

    use super::*;

    #[test]
    fn test_position_from_offset_simple() {
        let rope = Rope::from_str("hello\nworld");
        // 'h' is at offset 0
        assert_eq!(position_from_offset(&rope, 0), (0, 0));
        // 'w' is at offset 6 (after "hello\n")
        assert_eq!(position_from_offset(&rope, 6), (1, 0));
        assert_eq!(position_from_offset(&rope, 10), (1, 4));
    }

    #[test]
    fn test_position_from_offset_clamped() {
        let rope = Rope::from_str("hello");
        assert_eq!(position_from_offset(&rope, 100), (0, 5));
    }

    #[test]
    fn test_position_counts_utf16_units() {
        // `é` is two bytes and one UTF-16 unit; `𝄞` is four bytes and two units.
        let rope = Rope::from_str("a = \"é𝄞\" b\n");
        assert_eq!(position_from_offset(&rope, 12), (0, 9));
        assert_eq!(offset_from_position(&rope, 0, 9), Some(12));
    }

    #[test]
    fn test_offset_from_position_simple() {
        let rope = Rope::from_str("hello\nworld");
        assert_eq!(offset_from_position(&rope, 0, 0), Some(0));
        assert_eq!(offset_from_position(&rope, 1, 0), Some(6));
        assert_eq!(offset_from_position(&rope, 1, 4), Some(10));
    }

    #[test]
    fn test_offset_from_position_invalid_line() {
        let rope = Rope::from_str("hello");
        assert_eq!(offset_from_position(&rope, 5, 0), None);
    }

    #[test]
    fn test_offset_from_position_clamped_column() {
        let rope = Rope::from_str("hi\nworld");
        assert_eq!(offset_from_position(&rope, 0, 100), Some(2));
    }

    #[test]
    fn test_span_to_range_crlf() {
        let rope = Rope::from_str("rule1 = \"a\" rule2\r\nrule2 = \"b\"\r\n");
        let range = span_to_range(&rope, Span::new(19, 24));
        assert_eq!(range.start, lsp_types::Position::new(1, 0));
        assert_eq!(range.end, lsp_types::Position::new(1, 5));
    }

    // =========================================================================
    // LSP Server Integration Tests (Message-based)
    // =========================================================================

    use std::sync::atomic::{AtomicI32, Ordering};

    static REQUEST_ID: AtomicI32 = AtomicI32::new(1);

    fn next_request_id() -> RequestId {
        RequestId::from(REQUEST_ID.fetch_add(1, Ordering::SeqCst))
    }

    const SCENARIO: &str = "rule1 = \"a\" rule2\r\nrule2 = \"b\"\r\n";

    /// Test harness that creates a server and client connection pair.
    struct TestHarness {
        server: LspServer,
        client: Connection,
    }

    impl TestHarness {
        fn new() -> Self {
            Self::with_options(None)
        }

        fn with_options(initialization_options: Option<serde_json::Value>) -> Self {
            use lsp_types::request::Initialize;

            let (server_conn, client_conn) = Connection::memory();

            let init_params = InitializeParams {
                initialization_options,
                ..Default::default()
            };
            let init_request = lsp_server::Request::new(
                RequestId::from(0),
                Initialize::METHOD.to_string(),
                init_params,
            );
            client_conn
                .sender
                .send(Message::Request(init_request))
                .unwrap();

            // Must be queued before initialize_server, which waits for it.
            let initialized = Notification::new("initialized".to_string(), serde_json::json!({}));
            client_conn
                .sender
                .send(Message::Notification(initialized))
                .unwrap();

            let server = initialize_server(server_conn).unwrap();

            // Client receives initialize response
            let _response = client_conn.receiver.recv().unwrap();

            Self {
                server,
                client: client_conn,
            }
        }

        fn notify<N: lsp_types::notification::Notification>(&mut self, params: N::Params)
        where
            N::Params: serde::Serialize,
        {
            let notif = Notification::new(N::METHOD.to_string(), params);
            self.client
                .sender
                .send(Message::Notification(notif))
                .unwrap();

            let msg = self.server.connection.receiver.recv().unwrap();
            assert!(!self.server.process_message(msg).unwrap());
        }

        fn open_document(&mut self, uri: &Uri, language_id: &str, text: &str) {
            self.notify::<DidOpenTextDocument>(DidOpenTextDocumentParams {
                text_document: lsp_types::TextDocumentItem {
                    uri: uri.clone(),
                    language_id: language_id.to_string(),
                    version: 1,
                    text: text.to_string(),
                },
            });
        }

        fn change_document(&mut self, uri: &Uri, version: i32, text: &str) {
            self.notify::<DidChangeTextDocument>(DidChangeTextDocumentParams {
                text_document: lsp_types::VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version,
                },
                content_changes: vec![lsp_types::TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: text.to_string(),
                }],
            });
        }

        fn close_document(&mut self, uri: &Uri) {
            self.notify::<DidCloseTextDocument>(DidCloseTextDocumentParams {
                text_document: lsp_types::TextDocumentIdentifier { uri: uri.clone() },
            });
        }

        /// Send a raw request and return the server's response.
        fn raw_request(&mut self, method: &str, params: serde_json::Value) -> Response {
            let id = next_request_id();
            let req = Request::new(id.clone(), method.to_string(), params);
            self.client.sender.send(Message::Request(req)).unwrap();

            let msg = self.server.connection.receiver.recv().unwrap();
            self.server.process_message(msg).unwrap();

            match self.client.receiver.recv().unwrap() {
                Message::Response(resp) => {
                    assert_eq!(resp.id, id);
                    resp
                }
                other => panic!("Expected response message, got {:?}", other),
            }
        }

        /// Send a request and get the response.
        fn request<R: lsp_types::request::Request>(&mut self, params: R::Params) -> R::Result
        where
            R::Params: serde::Serialize,
            R::Result: serde::de::DeserializeOwned,
        {
            let params = serde_json::to_value(params).unwrap();
            let resp = self.raw_request(R::METHOD, params);
            assert!(resp.error.is_none(), "Request failed: {:?}", resp.error);
            serde_json::from_value(resp.result.unwrap()).unwrap()
        }
    }

    fn test_uri(name: &str) -> Uri {
        format!("file:///test/{}.abnf", name).parse().unwrap()
    }

    fn position_params(uri: &Uri, line: u32, character: u32) -> TextDocumentPositionParams {
        TextDocumentPositionParams {
            text_document: lsp_types::TextDocumentIdentifier { uri: uri.clone() },
            position: lsp_types::Position { line, character },
        }
    }

    fn goto(harness: &mut TestHarness, uri: &Uri, line: u32, character: u32) -> Option<Location> {
        let result = harness.request::<GotoDefinition>(GotoDefinitionParams {
            text_document_position_params: position_params(uri, line, character),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        });
        match result {
            Some(GotoDefinitionResponse::Scalar(location)) => Some(location),
            None => None,
            other => panic!("unexpected definition response {other:?}"),
        }
    }

    fn range(start: (u32, u32), end: (u32, u32)) -> lsp_types::Range {
        lsp_types::Range::new(
            lsp_types::Position::new(start.0, start.1),
            lsp_types::Position::new(end.0, end.1),
        )
    }

    #[test]
    fn test_goto_definition_via_message() {
        let mut harness = TestHarness::new();
        let uri = test_uri("definition");
        harness.open_document(&uri, "abnf", SCENARIO);

        let location = goto(&mut harness, &uri, 0, 14).unwrap();
        assert_eq!(location.uri, uri);
        assert_eq!(location.range, range((1, 0), (1, 5)));

        // Right after the reference nothing resolves.
        assert!(goto(&mut harness, &uri, 0, 17).is_none());
    }

    #[test]
    fn test_references_via_message() {
        let mut harness = TestHarness::new();
        let uri = test_uri("references");
        harness.open_document(&uri, "abnf", SCENARIO);

        let result = harness.request::<References>(ReferenceParams {
            text_document_position: position_params(&uri, 1, 2),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: lsp_types::ReferenceContext {
                include_declaration: true,
            },
        });
        let ranges: Vec<_> = result.unwrap().into_iter().map(|l| l.range).collect();
        assert_eq!(ranges, vec![range((1, 0), (1, 5)), range((0, 12), (0, 17))]);
    }

    #[test]
    fn test_document_symbols_via_message() {
        let mut harness = TestHarness::new();
        let uri = test_uri("symbols");
        harness.open_document(&uri, "abnf", SCENARIO);

        let result = harness.request::<DocumentSymbolRequest>(DocumentSymbolParams {
            text_document: lsp_types::TextDocumentIdentifier { uri },
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        });

        let Some(DocumentSymbolResponse::Nested(symbols)) = result else {
            panic!("expected nested symbols, got {result:?}");
        };
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["rule1", "rule2"]);
        assert_eq!(symbols[0].kind, SymbolKind::FUNCTION);
        assert_eq!(symbols[0].range, range((0, 0), (0, 17)));
        assert_eq!(symbols[0].selection_range, range((0, 0), (0, 5)));
    }

    #[test]
    fn test_hover_via_message() {
        let mut harness = TestHarness::new();
        let uri = test_uri("hover");
        harness.open_document(&uri, "abnf", "ALPHA = %x41\r\nword = 1*ALPHA rule\r\n");

        let result = harness.request::<HoverRequest>(HoverParams {
            text_document_position_params: position_params(&uri, 1, 10),
            work_done_progress_params: Default::default(),
        });
        let hover = result.unwrap();
        let HoverContents::Markup(markup) = hover.contents else {
            panic!("expected markup hover");
        };
        assert_eq!(markup.kind, MarkupKind::Markdown);
        assert!(markup.value.contains("ASCII alphabetic characters (A-Z, a-z)"));
        assert_eq!(hover.range, Some(range((1, 9), (1, 14))));

        // An undefined rule has nothing to show.
        let result = harness.request::<HoverRequest>(HoverParams {
            text_document_position_params: position_params(&uri, 1, 16),
            work_done_progress_params: Default::default(),
        });
        assert!(result.is_none());
    }

    #[test]
    fn test_rename_via_message() {
        let mut harness = TestHarness::new();
        let uri = test_uri("rename");
        harness.open_document(&uri, "abnf", SCENARIO);

        let prepared = harness.request::<PrepareRenameRequest>(position_params(&uri, 0, 13));
        assert_eq!(
            prepared,
            Some(PrepareRenameResponse::RangeWithPlaceholder {
                range: range((0, 12), (0, 17)),
                placeholder: "rule2".to_string(),
            })
        );

        let edit = harness
            .request::<Rename>(RenameParams {
                text_document_position: position_params(&uri, 0, 13),
                new_name: "ruleX".to_string(),
                work_done_progress_params: Default::default(),
            })
            .unwrap();
        let edits = &edit.changes.unwrap()[&uri];
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|edit| edit.new_text == "ruleX"));
        assert_eq!(edits[0].range, range((0, 12), (0, 17)));
        assert_eq!(edits[1].range, range((1, 0), (1, 5)));

        let rejected = harness.request::<Rename>(RenameParams {
            text_document_position: position_params(&uri, 0, 13),
            new_name: "not valid".to_string(),
            work_done_progress_params: Default::default(),
        });
        assert!(rejected.is_none());
    }

    #[test]
    fn test_completion_via_message() {
        let mut harness = TestHarness::new();
        let uri = test_uri("completion");
        harness.open_document(&uri, "abnf", SCENARIO);

        let result = harness.request::<Completion>(CompletionParams {
            text_document_position: position_params(&uri, 2, 0),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: None,
        });
        let Some(CompletionResponse::Array(items)) = result else {
            panic!("expected completion items");
        };
        assert_eq!(items.len(), 18);
        assert_eq!(items[0].label, "rule1");
        assert_eq!(items[0].kind, Some(CompletionItemKind::FUNCTION));
        assert_eq!(items[2].label, "ALPHA");
        assert_eq!(items[2].detail.as_deref(), Some("Core rule (RFC 5234)"));
    }

    #[test]
    fn test_change_reindexes_document() {
        let mut harness = TestHarness::new();
        let uri = test_uri("change");
        harness.open_document(&uri, "abnf", SCENARIO);

        harness.change_document(&uri, 2, "other = \"c\"\r\nrule1 = other\r\n");
        let location = goto(&mut harness, &uri, 1, 9).unwrap();
        assert_eq!(location.range, range((0, 0), (0, 5)));
        assert!(harness.server.db.get(uri.as_str()).unwrap().definition_of("rule2").is_none());
    }

    #[test]
    fn test_close_invalidates_document() {
        let mut harness = TestHarness::new();
        let uri = test_uri("close");
        harness.open_document(&uri, "abnf", SCENARIO);
        harness.close_document(&uri);

        assert!(harness.server.db.get(uri.as_str()).is_none());
        assert!(goto(&mut harness, &uri, 0, 14).is_none());

        // Changes to a closed document are ignored.
        harness.change_document(&uri, 3, SCENARIO);
        assert!(harness.server.db.get(uri.as_str()).is_none());
    }

    #[test]
    fn test_other_languages_are_ignored() {
        let mut harness = TestHarness::new();
        let uri = test_uri("plain");
        harness.open_document(&uri, "plaintext", SCENARIO);
        assert!(harness.server.db.get(uri.as_str()).is_none());
        assert!(goto(&mut harness, &uri, 0, 14).is_none());
    }

    #[test]
    fn test_configured_language_ids() {
        let mut harness =
            TestHarness::with_options(Some(serde_json::json!({ "languageIds": ["grammar"] })));
        let uri = test_uri("configured");
        harness.open_document(&uri, "grammar", SCENARIO);
        assert!(goto(&mut harness, &uri, 0, 14).is_some());
    }

    #[test]
    fn test_unknown_request_is_method_not_found() {
        let mut harness = TestHarness::new();
        let resp = harness.raw_request("textDocument/formatting", serde_json::json!({}));
        let error = resp.error.unwrap();
        assert_eq!(error.code, ErrorCode::MethodNotFound as i32);
    }

    #[test]
    fn test_malformed_params_are_invalid_params() {
        let mut harness = TestHarness::new();
        let resp = harness.raw_request(HoverRequest::METHOD, serde_json::json!({ "line": 1 }));
        let error = resp.error.unwrap();
        assert_eq!(error.code, ErrorCode::InvalidParams as i32);
    }

    #[test]
    fn test_shutdown_disposes_cache() {
        let mut harness = TestHarness::new();
        let uri = test_uri("shutdown");
        harness.open_document(&uri, "abnf", SCENARIO);

        // handle_shutdown waits for the exit notification after answering.
        let shutdown = Request::new(
            next_request_id(),
            lsp_types::request::Shutdown::METHOD.to_string(),
            serde_json::Value::Null,
        );
        harness
            .client
            .sender
            .send(Message::Request(shutdown))
            .unwrap();
        let exit = Notification::new(Exit::METHOD.to_string(), serde_json::Value::Null);
        harness
            .client
            .sender
            .send(Message::Notification(exit))
            .unwrap();

        let msg = harness.server.connection.receiver.recv().unwrap();
        assert!(harness.server.process_message(msg).unwrap());
        assert!(harness.server.db.is_empty());
    }
}
