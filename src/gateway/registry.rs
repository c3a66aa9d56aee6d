//! Live set of connected viewer sessions.

use std::sync::Arc;

use dashmap::DashMap;

use super::session::ViewerSession;

/// Shared registry of all connected viewers.
///
/// A session is present for exactly the span between a successful welcome
/// push and disconnect/error. Uses `DashMap` for shard-level concurrency so
/// membership changes never block the fan-out path.
pub struct ViewerRegistry {
    sessions: DashMap<String, Arc<ViewerSession>>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a session after its welcome push succeeded.
    pub fn add(&self, session: Arc<ViewerSession>) {
        self.sessions.insert(session.session_id.clone(), session);
    }

    /// Remove a session. Idempotent: removing an absent session is a no-op,
    /// guarding against double-cleanup races. Returns whether the session
    /// was present.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot of the current membership, safe to iterate without holding
    /// any registry lock across network I/O.
    pub fn snapshot(&self) -> Vec<Arc<ViewerSession>> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl Default for ViewerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
