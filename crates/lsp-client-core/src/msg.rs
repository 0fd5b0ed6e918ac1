//! The JSON-RPC message shapes the core recognizes on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC request id. Outbound requests from this core always use the
/// integer form, drawn from the session's id counter. String ids are
/// accepted verbatim for server-originated requests and echoed back in
/// replies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// An integer id, as allocated by this core's id counter.
    Number(i32),
    /// A string id, as used by some servers for server-originated requests.
    String(String),
}

impl From<i32> for RequestId {
    fn from(id: i32) -> RequestId {
        RequestId::Number(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> RequestId {
        RequestId::String(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(it) => fmt::Display::fmt(it, f),
            RequestId::String(it) => fmt::Debug::fmt(it, f),
        }
    }
}

/// A JSON-RPC error object, as carried by a response-error or sent back by
/// the embedder when replying to a server-originated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    /// The error code.
    pub code: i32,
    /// The error message.
    pub message: String,
    /// Additional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Error codes defined by JSON-RPC and the Language Server Protocol.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Invalid JSON was received.
    ParseError = -32700,
    /// The JSON sent is not a valid request object.
    InvalidRequest = -32600,
    /// The method does not exist / is not available.
    MethodNotFound = -32601,
    /// Invalid method parameter(s).
    InvalidParams = -32602,
    /// Internal JSON-RPC error.
    InternalError = -32603,
    /// A server received a notification or request before `initialize`.
    ServerNotInitialized = -32002,
    /// The client has canceled a request and a server has detected it.
    RequestCanceled = -32800,
    /// A request failed but was syntactically correct.
    RequestFailed = -32803,
}

/// A request, either outbound (from this core) or inbound (server-initiated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// The request id.
    pub id: RequestId,
    /// The method name.
    pub method: String,
    /// The method parameters, if any.
    #[serde(default = "Value::default")]
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

/// A notification, either outbound or inbound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// The method name.
    pub method: String,
    /// The method parameters, if any.
    #[serde(default = "Value::default")]
    #[serde(skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

/// A response, either to one of our outbound requests or to a request we
/// answered from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// The id of the request this response answers.
    pub id: RequestId,
    /// The successful result, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error, if the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl Request {
    pub(crate) fn new(id: RequestId, method: impl Into<String>, params: impl Serialize) -> Self {
        Request {
            id,
            method: method.into(),
            params: serde_json::to_value(params).unwrap_or(Value::Null),
        }
    }
}

impl Notification {
    pub(crate) fn new(method: impl Into<String>, params: impl Serialize) -> Self {
        Notification {
            method: method.into(),
            params: serde_json::to_value(params).unwrap_or(Value::Null),
        }
    }
}

impl Response {
    pub(crate) fn ok(id: RequestId, result: impl Serialize) -> Self {
        Response {
            id,
            result: Some(serde_json::to_value(result).unwrap_or(Value::Null)),
            error: None,
        }
    }

    pub(crate) fn err(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Response {
            id,
            result: None,
            error: Some(ResponseError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Wraps a wire message with the mandatory `jsonrpc` envelope field and
/// serializes it to a JSON body, ready for [`crate::codec::encode_frame`].
pub(crate) fn to_body(msg: &impl Serialize) -> Vec<u8> {
    #[derive(Serialize)]
    struct Envelope<'a, T: Serialize> {
        jsonrpc: &'static str,
        #[serde(flatten)]
        inner: &'a T,
    }
    serde_json::to_vec(&Envelope {
        jsonrpc: "2.0",
        inner: msg,
    })
    .expect("serializing a wire message cannot fail")
}
