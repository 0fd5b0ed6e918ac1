//! Session configuration.

use lsp_types::{ClientCapabilities, TraceValue, WorkspaceFolder};
use serde_json::Value;

use crate::capabilities::default_capabilities;

/// Configuration consumed by [`crate::Session::new`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The embedder's process id, sent as `processId` in `initialize`.
    pub process_id: Option<u32>,
    /// The workspace root URI, sent as `rootUri` in `initialize`.
    pub root_uri: Option<String>,
    /// The workspace folders, sent as `workspaceFolders` in `initialize`.
    pub workspace_folders: Option<Vec<WorkspaceFolder>>,
    /// The trace level, sent as `trace` in `initialize`. Defaults to `off`.
    pub trace: TraceValue,
    /// The client capability document. Defaults to
    /// [`default_capabilities`].
    pub capabilities: ClientCapabilities,
    /// Extension fields merged into the `initialize` params object, for
    /// server-specific `initializationOptions`.
    pub initialization_options: Option<Value>,
    /// Whether to send `initialize` immediately on construction.
    /// When `false`, the session starts in `NotInitialized` and the embedder
    /// must build and send `initialize` itself via the low-level request
    /// surface.
    pub auto_initialize: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            process_id: None,
            root_uri: None,
            workspace_folders: None,
            trace: TraceValue::Off,
            capabilities: default_capabilities(),
            initialization_options: None,
            auto_initialize: true,
        }
    }
}

impl SessionConfig {
    /// Starts from the default configuration with the given process id and
    /// root URI, the two fields every embedder supplies.
    pub fn new(process_id: Option<u32>, root_uri: Option<String>) -> Self {
        SessionConfig {
            process_id,
            root_uri,
            ..Default::default()
        }
    }
}
