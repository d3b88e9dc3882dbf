// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource cleanup.

use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// Ensures connection resources are always released when a connection
/// handler's scope is exited, however it exits.
pub(crate) struct ConnectionGuard {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
}

impl ConnectionGuard {
    pub(crate) fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }
}

impl Drop for ConnectionGuard {
    /// Removes any parked blocking waiters and discards a lingering
    /// transaction for the closed session.
    fn drop(&mut self) {
        debug!(
            "ConnectionGuard dropping, cleaning up resources for connection {}",
            self.addr
        );
        self.state
            .blocker_manager
            .remove_waiters_for_session(self.session_id);
        if self.state.db.discard_transaction(self.session_id) {
            debug!(
                "Cleaned up lingering transaction for client {}.",
                self.addr
            );
        }
    }
}
