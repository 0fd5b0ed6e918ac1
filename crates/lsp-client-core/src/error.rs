//! Error taxonomy for the client core.

use crate::lifecycle::LifecycleState;
use crate::msg::RequestId;

/// Errors produced by the client core.
///
/// [`LspError::Framing`] and [`LspError::UnknownResponseId`] are fatal: the
/// byte stream is presumed desynchronized and the session must be torn down.
/// [`LspError::InvalidState`] and [`LspError::Decode`] are recoverable and do
/// not corrupt session state.
#[derive(Debug, thiserror::Error)]
pub enum LspError {
    /// Malformed header block, missing/non-integer `Content-Length`,
    /// truncated body, invalid UTF-8 body, or an unclassifiable JSON object.
    #[error("framing error: {0}")]
    Framing(String),

    /// A response arrived whose id is not in the correlation table.
    #[error("response for unknown request id {0}")]
    UnknownResponseId(RequestId),

    /// An operation was invoked outside its permitted lifecycle states.
    #[error("operation `{operation}` is not permitted in state {state:?}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the session was in at the time.
        state: LifecycleState,
    },

    /// A well-framed response for a recognized method failed structural
    /// decoding and no salvage rule applied.
    #[error("failed to decode response for method `{method}`: {source}")]
    Decode {
        /// The method that produced the response.
        method: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl LspError {
    /// Whether this error is fatal to the session (the embedder must tear
    /// the session down) as opposed to recoverable and per-event.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LspError::Framing(_) | LspError::UnknownResponseId(_))
    }
}

/// The error returned by [`crate::Session::feed`].
///
/// Carries every event that was successfully decoded from the fed bytes
/// before the fatal error was hit, so that a framing failure at frame *k*
/// never swallows the frames that preceded it.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct FeedError {
    /// Events decoded before the fatal error was encountered.
    pub events: Vec<crate::event::Event>,
    /// The fatal error itself.
    #[source]
    pub error: LspError,
}
