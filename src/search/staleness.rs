use std::sync::atomic::{AtomicU64, Ordering};

/// Tracks which query is the latest so late responses for older ones can be dropped.
///
/// Responses are not cancelled; callers check [`is_current`](Self::is_current) when
/// one resolves and discard it if a newer query has started since.
#[derive(Debug, Default)]
pub struct QueryTracker {
    latest: AtomicU64,
}

/// Marks one issued query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    seq: u64,
    query: String,
}

impl QueryTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl QueryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new query, superseding every earlier ticket.
    pub fn begin(&self, query: impl Into<String>) -> QueryTicket {
        let seq = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        QueryTicket {
            seq,
            query: query.into(),
        }
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.seq
    }
}
