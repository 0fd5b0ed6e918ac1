//! Wire framing: header-framed JSON-RPC over an append-only byte buffer.
//!
//! The codec is pure and reentrant: [`decode_one`] takes a byte slice and
//! returns either a complete message plus the number of bytes it consumed,
//! or `None` if more bytes are needed. It never blocks and never retains
//! state between calls.

use serde_json::Value;
use std::io::Write;

use crate::error::LspError;
use crate::msg::{Notification, Request, Response};

/// One decoded frame, classified by which of `method`/`id`/`result`/`error`
/// fields the JSON body carries.
pub(crate) enum Frame {
    Request(Request),
    Notification(Notification),
    Response(Response),
}

/// Encodes a JSON-RPC body (already serialized, sans envelope) as a framed
/// message: `Content-Length: <n>\r\n\r\n<body>`.
pub(crate) fn encode_frame(out: &mut Vec<u8>, body: &[u8]) {
    write!(out, "Content-Length: {}\r\n\r\n", body.len()).expect("writing to a Vec never fails");
    out.extend_from_slice(body);
}

/// Attempts to decode a single complete frame from the front of `buf`.
///
/// Returns `Ok(None)` if `buf` does not yet contain a complete frame (more
/// bytes are needed). Returns `Ok(Some((frame, consumed)))` on success,
/// where `consumed` is the number of bytes of `buf` the frame occupied.
/// Returns `Err` on a malformed header block, missing/invalid
/// `Content-Length`, non-UTF-8 body, or an unclassifiable JSON object — all
/// of which are fatal to the session.
pub(crate) fn decode_one(buf: &[u8]) -> Result<Option<(Frame, usize)>, LspError> {
    let header_end = match find_subslice(buf, b"\r\n\r\n") {
        Some(pos) => pos,
        None => return Ok(None),
    };

    let header_block = &buf[..header_end];
    let content_length = parse_content_length(header_block)?;

    let body_start = header_end + 4;
    let body_end = body_start + content_length;
    if buf.len() < body_end {
        return Ok(None);
    }

    let body_bytes = &buf[body_start..body_end];
    let body = std::str::from_utf8(body_bytes)
        .map_err(|e| LspError::Framing(format!("non-UTF-8 body: {e}")))?;

    let value: Value = serde_json::from_str(body)
        .map_err(|e| LspError::Framing(format!("invalid JSON body: {e}")))?;

    let frame = classify(value)?;
    Ok(Some((frame, body_end)))
}

/// Classifies a decoded JSON body by field shape:
/// - `method` and `id` present → Request
/// - `method` present, `id` absent → Notification
/// - `id` present and (`result` or `error`) present → Response
/// - otherwise → FramingError
fn classify(value: Value) -> Result<Frame, LspError> {
    let obj = value
        .as_object()
        .ok_or_else(|| LspError::Framing("top-level JSON body is not an object".into()))?;

    let has_method = obj.contains_key("method");
    let has_id = obj.contains_key("id");
    let has_result_or_error = obj.contains_key("result") || obj.contains_key("error");

    if has_method && has_id {
        let req: Request = serde_json::from_value(value)
            .map_err(|e| LspError::Framing(format!("malformed request: {e}")))?;
        Ok(Frame::Request(req))
    } else if has_method {
        let notif: Notification = serde_json::from_value(value)
            .map_err(|e| LspError::Framing(format!("malformed notification: {e}")))?;
        Ok(Frame::Notification(notif))
    } else if has_id && has_result_or_error {
        let resp: Response = serde_json::from_value(value)
            .map_err(|e| LspError::Framing(format!("malformed response: {e}")))?;
        Ok(Frame::Response(resp))
    } else {
        Err(LspError::Framing(
            "JSON object is neither a request, a notification, nor a response".into(),
        ))
    }
}

/// Parses the `Content-Length` header out of a `\r\n`-delimited header
/// block. Header names are matched case-insensitively; any other header
/// (including `Content-Type`) is tolerated and ignored.
fn parse_content_length(header_block: &[u8]) -> Result<usize, LspError> {
    let text = std::str::from_utf8(header_block)
        .map_err(|e| LspError::Framing(format!("non-UTF-8 headers: {e}")))?;

    let mut content_length = None;
    for line in text.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| LspError::Framing(format!("malformed header line: {line:?}")))?;
        if name.trim().eq_ignore_ascii_case("Content-Length") {
            let value = value.trim();
            let n: usize = value
                .parse()
                .map_err(|_| LspError::Framing(format!("invalid Content-Length: {value:?}")))?;
            content_length = Some(n);
        }
    }
    content_length.ok_or_else(|| LspError::Framing("missing Content-Length header".into()))
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::RequestId;

    fn frame_bytes(body: &str) -> Vec<u8> {
        let mut out = Vec::new();
        encode_frame(&mut out, body.as_bytes());
        out
    }

    #[test]
    fn decodes_a_request() {
        let bytes = frame_bytes(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#);
        let (frame, consumed) = decode_one(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        match frame {
            Frame::Request(req) => {
                assert_eq!(req.id, RequestId::Number(1));
                assert_eq!(req.method, "initialize");
            }
            _ => panic!("expected a request"),
        }
    }

    #[test]
    fn decodes_a_notification() {
        let bytes = frame_bytes(r#"{"jsonrpc":"2.0","method":"exit"}"#);
        let (frame, _) = decode_one(&bytes).unwrap().unwrap();
        assert!(matches!(frame, Frame::Notification(n) if n.method == "exit"));
    }

    #[test]
    fn decodes_a_response() {
        let bytes = frame_bytes(r#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#);
        let (frame, _) = decode_one(&bytes).unwrap().unwrap();
        assert!(matches!(frame, Frame::Response(r) if r.id == RequestId::Number(1)));
    }

    #[test]
    fn waits_for_more_bytes_on_partial_header() {
        let bytes = b"Content-Length: 10\r\n";
        assert!(decode_one(bytes).unwrap().is_none());
    }

    #[test]
    fn waits_for_more_bytes_on_partial_body() {
        let full = frame_bytes(r#"{"jsonrpc":"2.0","method":"exit"}"#);
        let partial = &full[..full.len() - 5];
        assert!(decode_one(partial).unwrap().is_none());
    }

    #[test]
    fn tolerates_other_headers_case_insensitively() {
        let body = r#"{"jsonrpc":"2.0","method":"exit"}"#;
        let mut bytes = Vec::new();
        write!(
            &mut bytes,
            "content-type: application/vscode-jsonrpc\r\ncontent-length: {}\r\n\r\n",
            body.len()
        )
        .unwrap();
        bytes.extend_from_slice(body.as_bytes());
        let (frame, consumed) = decode_one(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        assert!(matches!(frame, Frame::Notification(_)));
    }

    #[test]
    fn missing_content_length_is_a_framing_error() {
        let bytes = b"Content-Type: application/json\r\n\r\n{}";
        assert!(decode_one(bytes).is_err());
    }

    #[test]
    fn unclassifiable_object_is_a_framing_error() {
        let bytes = frame_bytes(r#"{"jsonrpc":"2.0","foo":"bar"}"#);
        assert!(decode_one(&bytes).is_err());
    }

    #[test]
    fn round_trip() {
        let body = r#"{"id":1,"method":"initialize"}"#;
        let bytes = frame_bytes(body);
        let (frame, consumed) = decode_one(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        assert!(matches!(frame, Frame::Request(_)));
    }
}
