//! Per-connection viewer session identity.

use std::net::SocketAddr;
use std::time::Instant;

use uuid::Uuid;

/// Identity of a single connected viewer, used for registry membership and
/// log correlation. Carries no protocol state: the connection itself lives
/// in the session task.
#[derive(Debug)]
pub struct ViewerSession {
    /// Unique session identifier (`ws_` prefixed UUID).
    pub session_id: String,
    /// Peer address, for logging.
    pub remote_addr: SocketAddr,
    pub connected_at: Instant,
}

impl ViewerSession {
    pub fn new(remote_addr: SocketAddr) -> Self {
        Self {
            session_id: format!("ws_{}", Uuid::new_v4().simple()),
            remote_addr,
            connected_at: Instant::now(),
        }
    }
}
