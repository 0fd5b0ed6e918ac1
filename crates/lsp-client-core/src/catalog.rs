//! The message catalog: the closed set of LSP methods this core recognizes,
//! and how to decode their payloads into typed [`Event`]s.
//!
//! Dispatch is a static match on the method string rather than a runtime
//! table built at startup. `initialize` and `shutdown` are handled by
//! [`crate::session::Session`] directly rather than here, since their
//! dispatch has session-level side effects; every other recognized
//! method's payload decoding is pure and lives in this module.

use lsp_types::{
    CallHierarchyItem, CompletionItem, CompletionList, ConfigurationParams, FoldingRange,
    GotoDefinitionResponse, Hover, HoverContents, InlayHint, Location, LogMessageParams,
    ProgressParams, ProgressParamsValue, PublishDiagnosticsParams, RegistrationParams,
    ShowMessageParams, ShowMessageRequestParams, SignatureHelp, SymbolInformation, TextEdit,
    WorkDoneProgress, WorkDoneProgressCreateParams, WorkspaceEdit,
};
use serde_json::Value;

use crate::event::{
    AnswerableRequest, Event, ShowMessageRequestPayload, UnrecognizedMessage,
    WorkDoneProgressEvent,
};
use crate::msg::RequestId;

/// Decodes a response payload for `method` into the matching typed event.
///
/// `initialize`/`shutdown` are intercepted by the session before reaching
/// here. An unrecognized method reaches here only via the low-level escape
/// hatch; its response is surfaced as [`Event::RawResponse`].
pub(crate) fn decode_response(id: RequestId, method: &str, result: Option<Value>) -> Event {
    match decode_response_inner(&id, method, result.clone()) {
        Ok(event) => event,
        Err(source) => {
            log::error!("failed to decode response for `{method}`: {source}");
            Event::DecodeError {
                message_id: id,
                method: method.to_string(),
                message: source.to_string(),
            }
        }
    }
}

fn decode_response_inner(
    id: &RequestId,
    method: &str,
    result: Option<Value>,
) -> Result<Event, serde_json::Error> {
    let message_id = id.clone();
    match method {
        "textDocument/completion" => {
            let completion_list = match is_present(&result) {
                false => None,
                true => {
                    let value = result.unwrap();
                    match serde_json::from_value::<CompletionList>(value.clone()) {
                        Ok(list) => Some(list),
                        Err(_) => {
                            // A bare array of completion items with no
                            // envelope is treated as a non-incomplete list.
                            let items: Vec<CompletionItem> = serde_json::from_value(value)?;
                            log::warn!(
                                "completion response was a bare item array; salvaging as isIncomplete=false"
                            );
                            Some(CompletionList {
                                is_incomplete: false,
                                items,
                                ..Default::default()
                            })
                        }
                    }
                }
            };
            Ok(Event::Completion {
                message_id,
                completion_list,
            })
        }
        "textDocument/willSaveWaitUntil" => {
            let edits = decode_optional::<Vec<TextEdit>>(result)?;
            Ok(Event::WillSaveWaitUntilEdits { message_id, edits })
        }
        "textDocument/hover" => {
            let (contents, range) = match is_present(&result) {
                false => (HoverContents::Array(Vec::new()), None),
                true => {
                    let hover: Hover = serde_json::from_value(result.unwrap())?;
                    (hover.contents, hover.range)
                }
            };
            Ok(Event::Hover {
                message_id,
                contents,
                range,
            })
        }
        "textDocument/signatureHelp" => {
            let (signatures, active_signature, active_parameter) = match is_present(&result) {
                false => (Vec::new(), None, None),
                true => {
                    let sig: SignatureHelp = serde_json::from_value(result.unwrap())?;
                    (sig.signatures, sig.active_signature, sig.active_parameter)
                }
            };
            Ok(Event::SignatureHelp {
                message_id,
                signatures,
                active_signature,
                active_parameter,
            })
        }
        "textDocument/definition" => Ok(Event::Definition {
            message_id,
            result: decode_optional::<GotoDefinitionResponse>(result)?,
        }),
        "textDocument/declaration" => Ok(Event::Declaration {
            message_id,
            result: decode_optional::<GotoDefinitionResponse>(result)?,
        }),
        "textDocument/typeDefinition" => Ok(Event::TypeDefinition {
            message_id,
            result: decode_optional::<GotoDefinitionResponse>(result)?,
        }),
        "textDocument/implementation" => Ok(Event::Implementation {
            message_id,
            result: decode_optional::<GotoDefinitionResponse>(result)?,
        }),
        "textDocument/references" => Ok(Event::References {
            message_id,
            result: decode_optional::<Vec<Location>>(result)?,
        }),
        "textDocument/prepareCallHierarchy" => Ok(Event::CallHierarchyItems {
            message_id,
            result: decode_optional::<Vec<CallHierarchyItem>>(result)?,
        }),
        "workspace/symbol" => Ok(Event::WorkspaceSymbols {
            message_id,
            result: decode_optional::<Vec<SymbolInformation>>(result)?,
        }),
        "textDocument/foldingRange" => Ok(Event::FoldingRanges {
            message_id,
            result: decode_optional::<Vec<FoldingRange>>(result)?,
        }),
        "textDocument/inlayHint" => Ok(Event::InlayHints {
            message_id,
            result: decode_optional::<Vec<InlayHint>>(result)?,
        }),
        "textDocument/documentSymbol" => Ok(Event::DocumentSymbols {
            message_id,
            result: decode_optional::<lsp_types::DocumentSymbolResponse>(result)?,
        }),
        "textDocument/rename" => {
            // `WorkspaceEdit` carries `changes` and `documentChanges` as
            // independent optional fields, so a plain deserialize already
            // respects whichever one the server actually sent.
            let edit = match is_present(&result) {
                false => WorkspaceEdit::default(),
                true => serde_json::from_value(result.unwrap())?,
            };
            Ok(Event::Rename { message_id, edit })
        }
        "textDocument/formatting" | "textDocument/rangeFormatting" => {
            Ok(Event::DocumentFormatting {
                message_id,
                result: decode_optional::<Vec<TextEdit>>(result)?,
            })
        }
        other => Ok(Event::RawResponse {
            message_id,
            method: other.to_string(),
            result,
        }),
    }
}

/// Decodes a server-originated request into its typed, answerable event.
/// Malformed params for a recognized method fall back to
/// [`Event::UnrecognizedRequest`] so the embedder can still reply with an
/// error rather than the session losing track of the id.
pub(crate) fn decode_request(id: RequestId, method: &str, params: Value) -> Event {
    match method {
        "workspace/workspaceFolders" => Event::WorkspaceFolders(AnswerableRequest {
            id,
            params: (),
        }),
        "workspace/configuration" => match serde_json::from_value::<ConfigurationParams>(
            params.clone(),
        ) {
            Ok(p) => Event::Configuration(AnswerableRequest {
                id,
                params: p.items,
            }),
            Err(source) => unrecognized_request(id, method, params, &source),
        },
        "window/showMessageRequest" => {
            match serde_json::from_value::<ShowMessageRequestParams>(params.clone()) {
                Ok(p) => Event::ShowMessageRequest(AnswerableRequest {
                    id,
                    params: ShowMessageRequestPayload {
                        typ: p.typ,
                        message: p.message,
                        actions: p.actions,
                    },
                }),
                Err(source) => unrecognized_request(id, method, params, &source),
            }
        }
        "window/workDoneProgress/create" => {
            match serde_json::from_value::<WorkDoneProgressCreateParams>(params.clone()) {
                Ok(p) => Event::WorkDoneProgressCreate(AnswerableRequest {
                    id,
                    params: p.token,
                }),
                Err(source) => unrecognized_request(id, method, params, &source),
            }
        }
        "client/registerCapability" => {
            match serde_json::from_value::<RegistrationParams>(params.clone()) {
                Ok(p) => Event::RegisterCapability(AnswerableRequest {
                    id,
                    params: p.registrations,
                }),
                Err(source) => unrecognized_request(id, method, params, &source),
            }
        }
        other => Event::UnrecognizedRequest(AnswerableRequest {
            id,
            params: UnrecognizedMessage {
                method: other.to_string(),
                params,
            },
        }),
    }
}

fn unrecognized_request(
    id: RequestId,
    method: &str,
    params: Value,
    source: &serde_json::Error,
) -> Event {
    log::error!("failed to decode request params for `{method}`: {source}");
    Event::UnrecognizedRequest(AnswerableRequest {
        id,
        params: UnrecognizedMessage {
            method: method.to_string(),
            params,
        },
    })
}

/// Decodes a server-originated notification. Malformed params for a
/// recognized method, like an unrecognized method, surface as
/// [`Event::UnrecognizedNotification`] rather than being dropped silently.
pub(crate) fn decode_notification(method: &str, params: Value) -> Event {
    match method {
        "window/showMessage" => match serde_json::from_value::<ShowMessageParams>(params.clone())
        {
            Ok(p) => Event::ShowMessage(p),
            Err(source) => unrecognized_notification(method, params, &source),
        },
        "window/logMessage" => match serde_json::from_value::<LogMessageParams>(params.clone()) {
            Ok(p) => Event::LogMessage(p),
            Err(source) => unrecognized_notification(method, params, &source),
        },
        "textDocument/publishDiagnostics" => {
            match serde_json::from_value::<PublishDiagnosticsParams>(params.clone()) {
                Ok(p) => Event::PublishDiagnostics {
                    uri: p.uri,
                    version: p.version,
                    diagnostics: p.diagnostics,
                },
                Err(source) => unrecognized_notification(method, params, &source),
            }
        }
        "$/progress" => match serde_json::from_value::<ProgressParams>(params.clone()) {
            Ok(p) => {
                let value = match p.value {
                    ProgressParamsValue::WorkDone(WorkDoneProgress::Begin(b)) => {
                        WorkDoneProgressEvent::Begin(b)
                    }
                    ProgressParamsValue::WorkDone(WorkDoneProgress::Report(r)) => {
                        WorkDoneProgressEvent::Report(r)
                    }
                    ProgressParamsValue::WorkDone(WorkDoneProgress::End(e)) => {
                        WorkDoneProgressEvent::End(e)
                    }
                    #[allow(unreachable_patterns)]
                    _ => {
                        log::warn!("unrecognized $/progress value shape for `{method}`");
                        return Event::UnrecognizedNotification(UnrecognizedMessage {
                            method: method.to_string(),
                            params,
                        });
                    }
                };
                Event::WorkDoneProgress {
                    token: p.token,
                    value,
                }
            }
            Err(source) => unrecognized_notification(method, params, &source),
        },
        other => Event::UnrecognizedNotification(UnrecognizedMessage {
            method: other.to_string(),
            params,
        }),
    }
}

fn unrecognized_notification(
    method: &str,
    params: Value,
    source: &serde_json::Error,
) -> Event {
    log::error!("failed to decode notification params for `{method}`: {source}");
    Event::UnrecognizedNotification(UnrecognizedMessage {
        method: method.to_string(),
        params,
    })
}

fn is_present(result: &Option<Value>) -> bool {
    !matches!(result, None | Some(Value::Null))
}

fn decode_optional<T: serde::de::DeserializeOwned>(
    result: Option<Value>,
) -> Result<Option<T>, serde_json::Error> {
    match result {
        None => Ok(None),
        Some(Value::Null) => Ok(None),
        Some(v) => Ok(Some(serde_json::from_value(v)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_hover_result_synthesizes_empty_contents() {
        let event = decode_response(RequestId::from(1), "textDocument/hover", None);
        match event {
            Event::Hover {
                contents, range, ..
            } => {
                assert!(matches!(contents, HoverContents::Array(v) if v.is_empty()));
                assert!(range.is_none());
            }
            _ => panic!("expected a hover event"),
        }
    }

    #[test]
    fn null_signature_help_result_synthesizes_empty_signatures() {
        let event = decode_response(RequestId::from(1), "textDocument/signatureHelp", None);
        match event {
            Event::SignatureHelp { signatures, .. } => assert!(signatures.is_empty()),
            _ => panic!("expected a signature help event"),
        }
    }

    #[test]
    fn completion_salvages_a_bare_item_array() {
        let items = serde_json::json!([
            {"label": "foo"},
            {"label": "bar"},
        ]);
        let event = decode_response(RequestId::from(1), "textDocument/completion", Some(items));
        match event {
            Event::Completion {
                completion_list: Some(list),
                ..
            } => {
                assert!(!list.is_incomplete);
                assert_eq!(list.items.len(), 2);
            }
            other => panic!("expected a salvaged completion list, got {other:?}"),
        }
    }

    #[test]
    fn completion_decodes_a_full_envelope() {
        let payload = serde_json::json!({
            "isIncomplete": true,
            "items": [{"label": "foo"}],
        });
        let event = decode_response(
            RequestId::from(1),
            "textDocument/completion",
            Some(payload),
        );
        match event {
            Event::Completion {
                completion_list: Some(list),
                ..
            } => {
                assert!(list.is_incomplete);
                assert_eq!(list.items.len(), 1);
            }
            other => panic!("expected a completion list, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_method_is_a_raw_response() {
        let event = decode_response(
            RequestId::from(1),
            "experimental/somethingTheCatalogHasNotLearnedYet",
            Some(serde_json::json!({"x": 1})),
        );
        assert!(matches!(event, Event::RawResponse { .. }));
    }

    #[test]
    fn unrecognized_server_request_becomes_unrecognized_request_event() {
        let event = decode_request(
            RequestId::from("srv-1".to_string()),
            "experimental/doSomething",
            serde_json::json!({}),
        );
        match event {
            Event::UnrecognizedRequest(req) => assert_eq!(req.params.method, "experimental/doSomething"),
            _ => panic!("expected an unrecognized request event"),
        }
    }
}
