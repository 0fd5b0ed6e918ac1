//! A sans-I/O client core for the Language Server Protocol.
//!
//! This crate owns no socket, thread, or subprocess. It is a pure state
//! machine: feed it the bytes a language server writes to its stdout with
//! [`Session::feed`], drain the bytes it wants written to the server's
//! stdin with [`Session::drain`], and call one of [`Session`]'s typed
//! operations (`hover`, `completion`, `did_open`, ...) to drive a request or
//! notification. All transport, process management, and threading are the
//! embedder's responsibility.
//!
//! ```no_run
//! use lsp_client_core::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::new(None, Some("file:///proj".into())));
//! let outbound = session.drain(); // the `initialize` request
//! // write `outbound` to the server, read its response into `incoming`...
//! # let incoming: &[u8] = b"";
//! for event in session.feed(incoming).map_err(|e| e.error).unwrap() {
//!     // match on `event` and react
//! }
//! ```

mod capabilities;
mod catalog;
mod codec;
mod config;
mod correlation;
mod error;
mod event;
mod lifecycle;
mod msg;
mod session;

pub use capabilities::default_capabilities;
pub use config::SessionConfig;
pub use error::{FeedError, LspError};
pub use event::{
    AnswerableRequest, Event, ShowMessageRequestPayload, UnrecognizedMessage,
    WorkDoneProgressEvent,
};
pub use lifecycle::LifecycleState;
pub use msg::{ErrorCode, RequestId, ResponseError};
pub use session::Session;
