//! The LSP client lifecycle state machine.

/// The state of an LSP session.
///
/// Transitions are driven entirely by [`crate::Session`]'s operations and by
/// responses to `initialize`/`shutdown`; there is no other way to change
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No `initialize` request has been sent yet.
    NotInitialized,
    /// `initialize` has been sent; awaiting its response.
    WaitingForInitialized,
    /// The handshake completed; document and query operations are legal.
    Normal,
    /// `shutdown()` was called; awaiting its response.
    WaitingForShutdown,
    /// The `shutdown` response was received; only `exit()` is legal.
    Shutdown,
    /// `exit()` was called. Terminal.
    Exited,
}

impl LifecycleState {
    /// Whether the session is past the initialize handshake.
    pub fn is_initialized(self) -> bool {
        !matches!(
            self,
            LifecycleState::NotInitialized | LifecycleState::WaitingForInitialized
        )
    }
}
