//! The correlation table: outbound request id → originating method, consulted
//! when a response arrives to select the typed decoder.
//!
//! Only outgoing requests need an entry here; inbound server-originated
//! requests don't, because their replies are keyed by the id the server
//! itself supplied, echoed back verbatim.

use std::collections::HashMap;

use crate::msg::RequestId;

/// A pending outbound request: the method that produced it, and (for
/// embedder diagnostics) the original params.
#[derive(Debug, Clone)]
pub(crate) struct PendingRequest {
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// The correlation table plus the id counter used to populate it.
#[derive(Debug, Default)]
pub(crate) struct CorrelationTable {
    next_id: i32,
    pending: HashMap<RequestId, PendingRequest>,
}

impl CorrelationTable {
    /// Allocates the next request id. Strictly monotonic, starts at 0, never
    /// reused within the session.
    pub fn alloc_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The id most recently allocated, for `$/cancelRequest`. Only
    /// meaningful after at least one call to `alloc_id`.
    pub fn last_allocated_id(&self) -> i32 {
        self.next_id - 1
    }

    /// Registers a request id against the method that produced it.
    pub fn register(&mut self, id: RequestId, method: impl Into<String>, params: Option<serde_json::Value>) {
        self.pending.insert(
            id,
            PendingRequest {
                method: method.into(),
                params,
            },
        );
    }

    /// Removes and returns the pending entry for `id`, if any. Called on
    /// every response, success or error.
    pub fn complete(&mut self, id: &RequestId) -> Option<PendingRequest> {
        self.pending.remove(id)
    }

    /// Whether there are any unanswered outbound requests.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[cfg(test)]
    pub fn pending_ids(&self) -> std::collections::HashSet<RequestId> {
        self.pending.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_from_zero() {
        let mut table = CorrelationTable::default();
        assert_eq!(table.alloc_id(), 0);
        assert_eq!(table.alloc_id(), 1);
        assert_eq!(table.alloc_id(), 2);
    }

    #[test]
    fn register_and_complete_round_trip() {
        let mut table = CorrelationTable::default();
        let id = RequestId::from(table.alloc_id());
        table.register(id.clone(), "textDocument/hover", None);
        assert!(table.has_pending());
        let pending = table.complete(&id).unwrap();
        assert_eq!(pending.method, "textDocument/hover");
        assert!(!table.has_pending());
    }

    #[test]
    fn completing_an_unknown_id_yields_none() {
        let mut table = CorrelationTable::default();
        assert!(table.complete(&RequestId::from(42)).is_none());
    }
}
