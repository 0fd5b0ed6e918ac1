//! End-to-end scenarios driven entirely through the public `Session` facade:
//! construct, drain outbound bytes, feed inbound bytes, assert on events and
//! state. No transport of any kind is involved — the "server" side here is
//! just bytes assembled by hand.

use lsp_client_core::{Event, LifecycleState, RequestId, Session, SessionConfig};
use lsp_types::{HoverContents, Position, TextDocumentIdentifier, TextDocumentPositionParams};

fn frame(body: &serde_json::Value) -> Vec<u8> {
    let body = serde_json::to_vec(body).unwrap();
    let mut out = Vec::new();
    out.extend_from_slice(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes());
    out.extend_from_slice(&body);
    out
}

fn position(uri: &str) -> TextDocumentPositionParams {
    TextDocumentPositionParams {
        text_document: TextDocumentIdentifier {
            uri: uri.parse().unwrap(),
        },
        position: Position::new(0, 0),
    }
}

/// S1: constructing a session queues `initialize`; feeding its response
/// moves the session to `Normal` and queues `initialized`.
#[test]
fn handshake_moves_to_normal_and_queues_initialized() {
    let mut session = Session::new(SessionConfig::new(
        Some(4242),
        Some("file:///w".to_string()),
    ));
    assert_eq!(session.state(), LifecycleState::WaitingForInitialized);

    let outbound = session.drain();
    let text = String::from_utf8(outbound).unwrap();
    assert!(text.starts_with("Content-Length: "));
    assert!(text.contains(r#""method":"initialize""#));
    assert!(text.contains(r#""id":0"#));

    let response = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 0,
        "result": { "capabilities": {} },
    }));
    let events = session.feed(&response).unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Initialized(_)));
    assert_eq!(session.state(), LifecycleState::Normal);

    let outbound = session.drain();
    assert!(String::from_utf8(outbound)
        .unwrap()
        .contains(r#""method":"initialized""#));
}

fn normal_session() -> Session {
    let mut session = Session::new(SessionConfig::default());
    session.drain();
    let response = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 0,
        "result": { "capabilities": {} },
    }));
    session.feed(&response).unwrap();
    session
}

/// S2: a hover request/response round-trip yields a populated event and
/// clears the correlation table.
#[test]
fn hover_round_trip_yields_contents_and_clears_correlation() {
    let mut session = normal_session();
    let id = session.hover(position("file:///a")).unwrap();
    assert_eq!(id, RequestId::from(1));
    session.drain();

    let response = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": { "contents": "hi" },
    }));
    let events = session.feed(&response).unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::Hover {
            message_id,
            contents,
            ..
        } => {
            assert_eq!(*message_id, RequestId::from(1));
            assert!(matches!(contents, HoverContents::Scalar(_)));
        }
        other => panic!("expected a hover event, got {other:?}"),
    }

    // A second response for the same id is now unknown and fatal.
    let repeat = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": { "contents": "hi" },
    }));
    assert!(session.feed(&repeat).is_err());
}

/// S3: a null hover result synthesizes empty contents rather than an error.
#[test]
fn null_hover_result_yields_empty_contents() {
    let mut session = normal_session();
    session.hover(position("file:///a")).unwrap();
    session.drain();

    let response = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": null,
    }));
    let events = session.feed(&response).unwrap();
    match &events[0] {
        Event::Hover { contents, .. } => {
            assert!(matches!(contents, HoverContents::Array(v) if v.is_empty()));
        }
        other => panic!("expected a hover event, got {other:?}"),
    }
}

/// S4: a server-originated request surfaces as an answerable event, and
/// replying to it appends a correctly-addressed response.
#[test]
fn server_request_can_be_answered() {
    let mut session = normal_session();

    let request = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": "srv-7",
        "method": "workspace/workspaceFolders",
    }));
    let mut events = session.feed(&request).unwrap();
    assert_eq!(events.len(), 1);
    let Event::WorkspaceFolders(answerable) = events.remove(0) else {
        panic!("expected a workspace folders request");
    };

    answerable
        .reply(
            &mut session,
            serde_json::json!([{ "uri": "file:///w", "name": "w" }]),
        )
        .unwrap();

    let outbound = session.drain();
    let text = String::from_utf8(outbound).unwrap();
    assert!(text.contains(r#""id":"srv-7""#));
    assert!(text.contains(r#""name":"w""#));
}

/// S5: shutdown then exit reaches the terminal state, and any further
/// operation past `Exited` is rejected rather than silently sent.
#[test]
fn shutdown_then_exit_rejects_further_operations() {
    let mut session = normal_session();
    session.shutdown().unwrap();
    assert_eq!(session.state(), LifecycleState::WaitingForShutdown);
    session.drain();

    let response = frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": null,
    }));
    let events = session.feed(&response).unwrap();
    assert!(matches!(events[0], Event::Shutdown));
    assert_eq!(session.state(), LifecycleState::Shutdown);

    session.exit().unwrap();
    assert_eq!(session.state(), LifecycleState::Exited);

    let err = session.hover(position("file:///a")).unwrap_err();
    assert!(matches!(err, lsp_client_core::LspError::InvalidState { .. }));
}

/// S6: feeding one byte at a time still yields events only once a full
/// frame has arrived, in encoding order.
#[test]
fn split_frame_delivery_preserves_order() {
    let mut session = normal_session();
    session.hover(position("file:///a")).unwrap();
    session.drain();

    let mut bytes = Vec::new();
    bytes.extend(frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": { "contents": "first" },
    })));
    bytes.extend(frame(&serde_json::json!({
        "jsonrpc": "2.0",
        "method": "window/logMessage",
        "params": { "type": 3, "message": "second" },
    })));

    let mut all_events = Vec::new();
    for byte in bytes {
        let events = session.feed(&[byte]).unwrap();
        all_events.extend(events);
    }

    assert_eq!(all_events.len(), 2);
    assert!(matches!(all_events[0], Event::Hover { .. }));
    assert!(matches!(all_events[1], Event::LogMessage(_)));
}
