//! The session facade: wire buffers, lifecycle state, and correlation table
//! tied to one public operation per client-to-server LSP method.

use lsp_types::{
    CompletionContext, FormattingOptions, Range, TextDocumentContentChangeEvent,
    TextDocumentIdentifier, TextDocumentItem, TextDocumentPositionParams,
    TextDocumentSaveReason, VersionedTextDocumentIdentifier, WorkspaceFolder,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog;
use crate::codec::{self, Frame};
use crate::config::SessionConfig;
use crate::correlation::CorrelationTable;
use crate::event::Event;
use crate::error::{FeedError, LspError};
use crate::lifecycle::LifecycleState;
use crate::msg::{self, Notification, Request, RequestId, Response};

/// A sans-I/O Language Server Protocol client session.
///
/// Owns no socket, thread, or process. The embedder is responsible for all
/// I/O: bytes read from the server are handed to [`Session::feed`], and
/// bytes to write are drained with [`Session::drain`] after any operation
/// that appends to the send buffer.
pub struct Session {
    state: LifecycleState,
    recv_buf: Vec<u8>,
    send_buf: Vec<u8>,
    correlation: CorrelationTable,
}

impl Session {
    /// Creates a new session. If `config.auto_initialize` is set (the
    /// default), an `initialize` request is appended to the send buffer
    /// immediately and the session starts in `WaitingForInitialized`;
    /// otherwise it starts in `NotInitialized` and the embedder must send
    /// `initialize` itself through [`Session::request`].
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Session {
            state: LifecycleState::NotInitialized,
            recv_buf: Vec::new(),
            send_buf: Vec::new(),
            correlation: CorrelationTable::default(),
        };

        if config.auto_initialize {
            let mut params = json!({
                "processId": config.process_id,
                "rootUri": config.root_uri,
                "workspaceFolders": config.workspace_folders,
                "trace": trace_value_str(&config.trace),
                "capabilities": config.capabilities,
            });
            if let Some(extra) = config.initialization_options {
                if let (Value::Object(base), Value::Object(extra)) = (&mut params, extra) {
                    base.extend(extra);
                }
            }
            session.request("initialize", params);
            log::debug!(
                "lifecycle transition: {:?} -> {:?}",
                session.state,
                LifecycleState::WaitingForInitialized
            );
            session.state = LifecycleState::WaitingForInitialized;
        }

        session
    }

    /// The session's current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the session is past the initialize handshake.
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Takes and clears the accumulated outbound bytes. The embedder should
    /// call this after every operation that might have queued a message and
    /// write the result to the server.
    pub fn drain(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.send_buf)
    }

    /// Feeds bytes received from the server. Returns every event decoded
    /// from the newly-complete frames.
    ///
    /// On a fatal framing error, the error carries the events decoded from
    /// frames *before* the bad one, so a single corrupt message does not
    /// discard everything that arrived before it. The session's receive
    /// buffer is left holding the undecoded remainder in either case, but a
    /// fatal error means the byte stream is desynchronized and the session
    /// should be torn down rather than fed further.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Event>, FeedError> {
        self.recv_buf.extend_from_slice(bytes);
        let mut events = Vec::new();
        let mut offset = 0;

        loop {
            match codec::decode_one(&self.recv_buf[offset..]) {
                Ok(Some((frame, consumed))) => {
                    log::trace!("decoded inbound frame ({consumed} bytes)");
                    offset += consumed;
                    match self.dispatch(frame) {
                        Ok(event) => events.push(event),
                        Err(error) => {
                            log::error!("fatal error dispatching inbound frame: {error}");
                            self.recv_buf.drain(..offset);
                            return Err(FeedError { events, error });
                        }
                    }
                }
                Ok(None) => break,
                Err(error) => {
                    log::error!("framing error: {error}");
                    self.recv_buf.drain(..offset);
                    return Err(FeedError { events, error });
                }
            }
        }

        self.recv_buf.drain(..offset);
        Ok(events)
    }

    fn dispatch(&mut self, frame: Frame) -> Result<Event, LspError> {
        match frame {
            Frame::Response(resp) => self.dispatch_response(resp),
            Frame::Request(req) => Ok(catalog::decode_request(req.id, &req.method, req.params)),
            Frame::Notification(notif) => Ok(catalog::decode_notification(
                &notif.method,
                notif.params,
            )),
        }
    }

    fn dispatch_response(&mut self, resp: Response) -> Result<Event, LspError> {
        let Response { id, result, error } = resp;

        let pending = match self.correlation.complete(&id) {
            Some(pending) => pending,
            None => {
                log::error!("response for unknown request id {id}");
                return Err(LspError::UnknownResponseId(id));
            }
        };

        if let Some(err) = error {
            return Ok(Event::ResponseError {
                message_id: id,
                code: err.code,
                message: err.message,
                data: err.data,
            });
        }

        let event = match pending.method.as_str() {
            "initialize" => {
                let decoded =
                    result.map(|v| serde_json::from_value::<lsp_types::InitializeResult>(v));
                let init_result = match decoded.transpose() {
                    Ok(r) => r.unwrap_or_default(),
                    Err(source) => {
                        return Ok(Event::DecodeError {
                            message_id: id,
                            method: pending.method,
                            message: source.to_string(),
                        })
                    }
                };
                self.notify("initialized", json!({}));
                log::debug!("lifecycle transition: {:?} -> {:?}", self.state, LifecycleState::Normal);
                self.state = LifecycleState::Normal;
                Event::Initialized(init_result)
            }
            "shutdown" => {
                log::debug!("lifecycle transition: {:?} -> {:?}", self.state, LifecycleState::Shutdown);
                self.state = LifecycleState::Shutdown;
                Event::Shutdown
            }
            method => catalog::decode_response(id, method, result),
        };
        Ok(event)
    }

    // --- Low-level escape hatch ---

    /// Sends an arbitrary request, bypassing the typed operation surface.
    /// Returns the allocated id. No lifecycle gating is applied; the
    /// embedder is responsible for only calling this when the operation is
    /// legal in the current state.
    pub fn request(&mut self, method: impl Into<String>, params: impl Serialize) -> RequestId {
        let method = method.into();
        let id = RequestId::from(self.correlation.alloc_id());
        let params_value = serde_json::to_value(&params).unwrap_or(Value::Null);
        let req = Request::new(id.clone(), method.clone(), &params_value);
        log::trace!("encoding outbound request `{method}` (id {id})");
        codec::encode_frame(&mut self.send_buf, &msg::to_body(&req));
        self.correlation
            .register(id.clone(), method, Some(params_value));
        id
    }

    /// Sends an arbitrary notification, bypassing the typed operation
    /// surface.
    pub fn notify(&mut self, method: impl Into<String>, params: impl Serialize) {
        let notif = Notification::new(method, params);
        log::trace!("encoding outbound notification `{}`", notif.method);
        codec::encode_frame(&mut self.send_buf, &msg::to_body(&notif));
    }

    pub(crate) fn send_response(
        &mut self,
        id: RequestId,
        result: impl Serialize,
    ) -> Result<(), LspError> {
        let resp = Response::ok(id, result);
        codec::encode_frame(&mut self.send_buf, &msg::to_body(&resp));
        Ok(())
    }

    pub(crate) fn send_error_response(
        &mut self,
        id: RequestId,
        code: i32,
        message: impl Into<String>,
    ) -> Result<(), LspError> {
        let resp = Response::err(id, code, message);
        codec::encode_frame(&mut self.send_buf, &msg::to_body(&resp));
        Ok(())
    }

    /// Sends `$/cancelRequest` for the most recently allocated id.
    pub fn cancel_last_request(&mut self) {
        let id = self.correlation.last_allocated_id();
        self.notify("$/cancelRequest", json!({ "id": id }));
    }

    // --- Lifecycle operations ---

    /// Sends `shutdown`. Legal only in `Normal`.
    pub fn shutdown(&mut self) -> Result<RequestId, LspError> {
        self.require_state(LifecycleState::Normal, "shutdown")?;
        let id = self.request("shutdown", Value::Null);
        log::debug!(
            "lifecycle transition: {:?} -> {:?}",
            self.state,
            LifecycleState::WaitingForShutdown
        );
        self.state = LifecycleState::WaitingForShutdown;
        Ok(id)
    }

    /// Sends `exit`. Legal only in `Shutdown`.
    pub fn exit(&mut self) -> Result<(), LspError> {
        self.require_state(LifecycleState::Shutdown, "exit")?;
        self.notify("exit", json!({}));
        log::debug!(
            "lifecycle transition: {:?} -> {:?}",
            self.state,
            LifecycleState::Exited
        );
        self.state = LifecycleState::Exited;
        Ok(())
    }

    fn require_state(
        &self,
        expected: LifecycleState,
        operation: &'static str,
    ) -> Result<(), LspError> {
        if self.state != expected {
            return Err(LspError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    fn require_normal(&self, operation: &'static str) -> Result<(), LspError> {
        self.require_state(LifecycleState::Normal, operation)
    }

    // --- Text document synchronization ---

    pub fn did_open(&mut self, text_document: TextDocumentItem) -> Result<(), LspError> {
        self.require_normal("didOpen")?;
        self.notify(
            "textDocument/didOpen",
            json!({ "textDocument": text_document }),
        );
        Ok(())
    }

    pub fn did_change(
        &mut self,
        text_document: VersionedTextDocumentIdentifier,
        content_changes: Vec<TextDocumentContentChangeEvent>,
    ) -> Result<(), LspError> {
        self.require_normal("didChange")?;
        self.notify(
            "textDocument/didChange",
            json!({
                "textDocument": text_document,
                "contentChanges": content_changes,
            }),
        );
        Ok(())
    }

    pub fn will_save(
        &mut self,
        text_document: TextDocumentIdentifier,
        reason: TextDocumentSaveReason,
    ) -> Result<(), LspError> {
        self.require_normal("willSave")?;
        self.notify(
            "textDocument/willSave",
            json!({ "textDocument": text_document, "reason": reason }),
        );
        Ok(())
    }

    pub fn will_save_wait_until(
        &mut self,
        text_document: TextDocumentIdentifier,
        reason: TextDocumentSaveReason,
    ) -> Result<RequestId, LspError> {
        self.require_normal("willSaveWaitUntil")?;
        Ok(self.request(
            "textDocument/willSaveWaitUntil",
            json!({ "textDocument": text_document, "reason": reason }),
        ))
    }

    pub fn did_save(
        &mut self,
        text_document: TextDocumentIdentifier,
        text: Option<String>,
    ) -> Result<(), LspError> {
        self.require_normal("didSave")?;
        let mut params = json!({ "textDocument": text_document });
        if let (Some(text), Value::Object(obj)) = (text, &mut params) {
            obj.insert("text".into(), Value::String(text));
        }
        self.notify("textDocument/didSave", params);
        Ok(())
    }

    pub fn did_close(&mut self, text_document: TextDocumentIdentifier) -> Result<(), LspError> {
        self.require_normal("didClose")?;
        self.notify(
            "textDocument/didClose",
            json!({ "textDocument": text_document }),
        );
        Ok(())
    }

    pub fn did_change_configuration(&mut self, settings: Value) -> Result<(), LspError> {
        self.require_normal("didChangeConfiguration")?;
        self.notify("workspace/didChangeConfiguration", json!({ "settings": settings }));
        Ok(())
    }

    pub fn did_change_workspace_folders(
        &mut self,
        added: Vec<WorkspaceFolder>,
        removed: Vec<WorkspaceFolder>,
    ) -> Result<(), LspError> {
        self.require_normal("didChangeWorkspaceFolders")?;
        self.notify(
            "workspace/didChangeWorkspaceFolders",
            json!({ "event": { "added": added, "removed": removed } }),
        );
        Ok(())
    }

    // --- Language queries ---

    pub fn completion(
        &mut self,
        position: TextDocumentPositionParams,
        context: Option<CompletionContext>,
    ) -> Result<RequestId, LspError> {
        self.require_normal("completion")?;
        let mut params = serde_json::to_value(&position).unwrap_or(Value::Null);
        if let (Some(context), Value::Object(obj)) = (context, &mut params) {
            if let Value::Object(ctx) = serde_json::to_value(context).unwrap_or(Value::Null) {
                obj.extend(ctx);
            }
        }
        Ok(self.request("textDocument/completion", params))
    }

    pub fn rename(
        &mut self,
        position: TextDocumentPositionParams,
        new_name: impl Into<String>,
    ) -> Result<RequestId, LspError> {
        self.require_normal("rename")?;
        let mut params = serde_json::to_value(&position).unwrap_or(Value::Null);
        if let Value::Object(obj) = &mut params {
            obj.insert("newName".into(), Value::String(new_name.into()));
        }
        Ok(self.request("textDocument/rename", params))
    }

    pub fn hover(&mut self, position: TextDocumentPositionParams) -> Result<RequestId, LspError> {
        self.require_normal("hover")?;
        Ok(self.request("textDocument/hover", position))
    }

    pub fn signature_help(
        &mut self,
        position: TextDocumentPositionParams,
    ) -> Result<RequestId, LspError> {
        self.require_normal("signatureHelp")?;
        Ok(self.request("textDocument/signatureHelp", position))
    }

    pub fn definition(
        &mut self,
        position: TextDocumentPositionParams,
    ) -> Result<RequestId, LspError> {
        self.require_normal("definition")?;
        Ok(self.request("textDocument/definition", position))
    }

    pub fn declaration(
        &mut self,
        position: TextDocumentPositionParams,
    ) -> Result<RequestId, LspError> {
        self.require_normal("declaration")?;
        Ok(self.request("textDocument/declaration", position))
    }

    pub fn type_definition(
        &mut self,
        position: TextDocumentPositionParams,
    ) -> Result<RequestId, LspError> {
        self.require_normal("typeDefinition")?;
        Ok(self.request("textDocument/typeDefinition", position))
    }

    pub fn implementation(
        &mut self,
        position: TextDocumentPositionParams,
    ) -> Result<RequestId, LspError> {
        self.require_normal("implementation")?;
        Ok(self.request("textDocument/implementation", position))
    }

    pub fn references(
        &mut self,
        position: TextDocumentPositionParams,
        include_declaration: bool,
    ) -> Result<RequestId, LspError> {
        self.require_normal("references")?;
        let mut params = serde_json::to_value(&position).unwrap_or(Value::Null);
        if let Value::Object(obj) = &mut params {
            obj.insert(
                "context".into(),
                json!({ "includeDeclaration": include_declaration }),
            );
        }
        Ok(self.request("textDocument/references", params))
    }

    pub fn prepare_call_hierarchy(
        &mut self,
        position: TextDocumentPositionParams,
    ) -> Result<RequestId, LspError> {
        self.require_normal("prepareCallHierarchy")?;
        Ok(self.request("textDocument/prepareCallHierarchy", position))
    }

    pub fn folding_range(
        &mut self,
        text_document: TextDocumentIdentifier,
    ) -> Result<RequestId, LspError> {
        self.require_normal("foldingRange")?;
        Ok(self.request(
            "textDocument/foldingRange",
            json!({ "textDocument": text_document }),
        ))
    }

    pub fn inlay_hint(
        &mut self,
        text_document: TextDocumentIdentifier,
        range: Range,
    ) -> Result<RequestId, LspError> {
        self.require_normal("inlayHint")?;
        Ok(self.request(
            "textDocument/inlayHint",
            json!({ "textDocument": text_document, "range": range }),
        ))
    }

    pub fn workspace_symbol(&mut self, query: impl Into<String>) -> Result<RequestId, LspError> {
        self.require_normal("workspaceSymbol")?;
        Ok(self.request("workspace/symbol", json!({ "query": query.into() })))
    }

    pub fn document_symbol(
        &mut self,
        text_document: TextDocumentIdentifier,
    ) -> Result<RequestId, LspError> {
        self.require_normal("documentSymbol")?;
        Ok(self.request(
            "textDocument/documentSymbol",
            json!({ "textDocument": text_document }),
        ))
    }

    pub fn formatting(
        &mut self,
        text_document: TextDocumentIdentifier,
        options: FormattingOptions,
    ) -> Result<RequestId, LspError> {
        self.require_normal("formatting")?;
        Ok(self.request(
            "textDocument/formatting",
            json!({ "textDocument": text_document, "options": options }),
        ))
    }

    pub fn range_formatting(
        &mut self,
        text_document: TextDocumentIdentifier,
        range: Range,
        options: FormattingOptions,
    ) -> Result<RequestId, LspError> {
        self.require_normal("rangeFormatting")?;
        Ok(self.request(
            "textDocument/rangeFormatting",
            json!({ "textDocument": text_document, "range": range, "options": options }),
        ))
    }
}

fn trace_value_str(trace: &lsp_types::TraceValue) -> &'static str {
    match *trace {
        lsp_types::TraceValue::Off => "off",
        lsp_types::TraceValue::Messages => "messages",
        lsp_types::TraceValue::Verbose => "verbose",
    }
}
