//! The typed values yielded to the embedder by the receive path.

use lsp_types::{
    CallHierarchyItem, CompletionList, ConfigurationItem, Diagnostic, DocumentSymbolResponse,
    FoldingRange, GotoDefinitionResponse, HoverContents, InlayHint, LogMessageParams,
    MessageActionItem, MessageType, NumberOrString, Range, Registration, ShowMessageParams,
    SignatureInformation, SymbolInformation, TextEdit, Url, WorkDoneProgressBegin,
    WorkDoneProgressEnd, WorkDoneProgressReport,
};
use serde::Serialize;
use serde_json::Value;

use crate::msg::RequestId;
use crate::session::Session;
use crate::LspError;

/// A server-originated request paired with its payload, returned as plain
/// data inside an [`Event`] rather than coupling the event to the session.
/// Call [`AnswerableRequest::reply`] or
/// [`AnswerableRequest::reply_error`] — each consumes the wrapper, so a
/// second reply attempt is a compile error rather than a runtime one.
#[derive(Debug)]
pub struct AnswerableRequest<P> {
    pub(crate) id: RequestId,
    /// The request's deserialized parameters.
    pub params: P,
}

impl<P> AnswerableRequest<P> {
    /// Appends a successful JSON-RPC response echoing this request's id to
    /// the session's send buffer.
    pub fn reply(self, session: &mut Session, result: impl Serialize) -> Result<(), LspError> {
        session.send_response(self.id, result)
    }

    /// Appends an error JSON-RPC response echoing this request's id.
    pub fn reply_error(
        self,
        session: &mut Session,
        code: i32,
        message: impl Into<String>,
    ) -> Result<(), LspError> {
        session.send_error_response(self.id, code, message)
    }
}

/// The kind of work-done-progress notification: `$/progress` dispatches
/// further on `value.kind`.
#[derive(Debug, Clone)]
pub enum WorkDoneProgressEvent {
    /// `kind: "begin"`.
    Begin(WorkDoneProgressBegin),
    /// `kind: "report"`.
    Report(WorkDoneProgressReport),
    /// `kind: "end"`.
    End(WorkDoneProgressEnd),
}

/// A request or notification method the catalog did not recognize.
#[derive(Debug, Clone)]
pub struct UnrecognizedMessage {
    /// The unrecognized method name.
    pub method: String,
    /// The raw, undecoded params.
    pub params: Value,
}

/// The typed value yielded by [`Session::feed`].
#[derive(Debug)]
pub enum Event {
    // --- Responses to requests this core sent ---
    /// Successful response to `initialize`. The `initialized` notification
    /// has already been queued on the send buffer by the time this is
    /// yielded.
    Initialized(lsp_types::InitializeResult),
    /// Successful response to `shutdown`.
    Shutdown,
    /// Response to `textDocument/completion`.
    Completion {
        message_id: RequestId,
        completion_list: Option<CompletionList>,
    },
    /// Response to `textDocument/willSaveWaitUntil`.
    WillSaveWaitUntilEdits {
        message_id: RequestId,
        edits: Option<Vec<TextEdit>>,
    },
    /// Response to `textDocument/hover`.
    Hover {
        message_id: RequestId,
        contents: HoverContents,
        range: Option<Range>,
    },
    /// Response to `textDocument/signatureHelp`.
    SignatureHelp {
        message_id: RequestId,
        signatures: Vec<SignatureInformation>,
        active_signature: Option<u32>,
        active_parameter: Option<u32>,
    },
    /// Response to `textDocument/definition`.
    Definition {
        message_id: RequestId,
        result: Option<GotoDefinitionResponse>,
    },
    /// Response to `textDocument/declaration`.
    Declaration {
        message_id: RequestId,
        result: Option<GotoDefinitionResponse>,
    },
    /// Response to `textDocument/typeDefinition`.
    TypeDefinition {
        message_id: RequestId,
        result: Option<GotoDefinitionResponse>,
    },
    /// Response to `textDocument/implementation`.
    Implementation {
        message_id: RequestId,
        result: Option<GotoDefinitionResponse>,
    },
    /// Response to `textDocument/references`.
    References {
        message_id: RequestId,
        result: Option<Vec<lsp_types::Location>>,
    },
    /// Response to `textDocument/prepareCallHierarchy`.
    CallHierarchyItems {
        message_id: RequestId,
        result: Option<Vec<CallHierarchyItem>>,
    },
    /// Response to `workspace/symbol`.
    WorkspaceSymbols {
        message_id: RequestId,
        result: Option<Vec<SymbolInformation>>,
    },
    /// Response to `textDocument/foldingRange`.
    FoldingRanges {
        message_id: RequestId,
        result: Option<Vec<FoldingRange>>,
    },
    /// Response to `textDocument/inlayHint`.
    InlayHints {
        message_id: RequestId,
        result: Option<Vec<InlayHint>>,
    },
    /// Response to `textDocument/documentSymbol`.
    DocumentSymbols {
        message_id: RequestId,
        result: Option<DocumentSymbolResponse>,
    },
    /// Response to `textDocument/rename`.
    Rename {
        message_id: RequestId,
        edit: lsp_types::WorkspaceEdit,
    },
    /// Response to `textDocument/formatting` or `textDocument/rangeFormatting`.
    DocumentFormatting {
        message_id: RequestId,
        result: Option<Vec<TextEdit>>,
    },
    /// Response to a request sent through the low-level escape hatch for a
    /// method the catalog does not recognize.
    RawResponse {
        message_id: RequestId,
        method: String,
        result: Option<Value>,
    },

    // --- Response-level errors ---
    /// A JSON-RPC error object from the server, for the request with the
    /// given id.
    ResponseError {
        message_id: RequestId,
        code: i32,
        message: String,
        data: Option<Value>,
    },
    /// A well-framed response for a recognized method whose payload failed
    /// structural decoding, with no salvage rule available. Not fatal: the
    /// correlation entry has already been removed.
    DecodeError {
        message_id: RequestId,
        method: String,
        message: String,
    },

    // --- Server-originated notifications ---
    ShowMessage(ShowMessageParams),
    LogMessage(LogMessageParams),
    PublishDiagnostics {
        uri: Url,
        version: Option<i32>,
        diagnostics: Vec<Diagnostic>,
    },
    WorkDoneProgress {
        token: NumberOrString,
        value: WorkDoneProgressEvent,
    },
    /// A notification whose method the catalog does not recognize.
    UnrecognizedNotification(UnrecognizedMessage),

    // --- Server-originated requests (answerable) ---
    WorkspaceFolders(AnswerableRequest<()>),
    Configuration(AnswerableRequest<Vec<ConfigurationItem>>),
    ShowMessageRequest(AnswerableRequest<ShowMessageRequestPayload>),
    WorkDoneProgressCreate(AnswerableRequest<NumberOrString>),
    RegisterCapability(AnswerableRequest<Vec<Registration>>),
    /// A request whose method the catalog does not recognize. The embedder
    /// may reply with a `MethodNotFound` error via [`AnswerableRequest::reply_error`].
    UnrecognizedRequest(AnswerableRequest<UnrecognizedMessage>),
}

/// Parameters of a `window/showMessageRequest`.
#[derive(Debug, Clone)]
pub struct ShowMessageRequestPayload {
    pub typ: MessageType,
    pub message: String,
    pub actions: Option<Vec<MessageActionItem>>,
}

impl Event {
    /// The request id this event answers, for response-shaped events.
    /// `None` for notifications and server-originated requests (which carry
    /// their id in an [`AnswerableRequest`] instead).
    pub fn message_id(&self) -> Option<&RequestId> {
        match self {
            Event::Completion { message_id, .. }
            | Event::WillSaveWaitUntilEdits { message_id, .. }
            | Event::Hover { message_id, .. }
            | Event::SignatureHelp { message_id, .. }
            | Event::Definition { message_id, .. }
            | Event::Declaration { message_id, .. }
            | Event::TypeDefinition { message_id, .. }
            | Event::Implementation { message_id, .. }
            | Event::References { message_id, .. }
            | Event::CallHierarchyItems { message_id, .. }
            | Event::WorkspaceSymbols { message_id, .. }
            | Event::FoldingRanges { message_id, .. }
            | Event::InlayHints { message_id, .. }
            | Event::DocumentSymbols { message_id, .. }
            | Event::Rename { message_id, .. }
            | Event::DocumentFormatting { message_id, .. }
            | Event::RawResponse { message_id, .. }
            | Event::ResponseError { message_id, .. }
            | Event::DecodeError { message_id, .. } => Some(message_id),
            _ => None,
        }
    }

    /// For a `SignatureHelp` event, the label of the active signature
    /// (defaulting to the first signature when `active_signature` is
    /// unset). `None` for every other event or when there are no
    /// signatures at all.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Event::SignatureHelp {
                signatures,
                active_signature,
                ..
            } => {
                let index = active_signature.unwrap_or(0) as usize;
                signatures
                    .get(index)
                    .or_else(|| signatures.first())
                    .map(|sig| sig.label.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_is_present_on_response_events_only() {
        let e = Event::Shutdown;
        assert!(e.message_id().is_none());
        let e = Event::ResponseError {
            message_id: RequestId::from(3),
            code: -32803,
            message: "nope".into(),
            data: None,
        };
        assert_eq!(e.message_id(), Some(&RequestId::from(3)));
    }

    #[test]
    fn hint_defaults_to_the_first_signature() {
        let e = Event::SignatureHelp {
            message_id: RequestId::from(1),
            signatures: vec![
                SignatureInformation {
                    label: "fn foo()".into(),
                    documentation: None,
                    parameters: None,
                    active_parameter: None,
                },
                SignatureInformation {
                    label: "fn bar()".into(),
                    documentation: None,
                    parameters: None,
                    active_parameter: None,
                },
            ],
            active_signature: None,
            active_parameter: None,
        };
        assert_eq!(e.hint(), Some("fn foo()"));
    }

    #[test]
    fn hint_follows_active_signature() {
        let e = Event::SignatureHelp {
            message_id: RequestId::from(1),
            signatures: vec![
                SignatureInformation {
                    label: "fn foo()".into(),
                    documentation: None,
                    parameters: None,
                    active_parameter: None,
                },
                SignatureInformation {
                    label: "fn bar()".into(),
                    documentation: None,
                    parameters: None,
                    active_parameter: None,
                },
            ],
            active_signature: Some(1),
            active_parameter: None,
        };
        assert_eq!(e.hint(), Some("fn bar()"));
    }

    #[test]
    fn hint_is_none_without_any_signatures() {
        let e = Event::SignatureHelp {
            message_id: RequestId::from(1),
            signatures: vec![],
            active_signature: None,
            active_parameter: None,
        };
        assert_eq!(e.hint(), None);
    }
}
