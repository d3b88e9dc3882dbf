// src/core/storage/db/context.rs

use super::core::Db;
use crate::core::state::ServerState;
use std::sync::Arc;

/// `ExecutionContext` provides the state a `Command` needs to execute.
///
/// Commands never reach into the network layer: everything they may touch is
/// carried here.
pub struct ExecutionContext<'a> {
    pub state: Arc<ServerState>,
    pub db: &'a Db,
    pub session_id: u64,
    /// Set while executing a transaction batch. Blocking commands must not
    /// park inside EXEC; they degrade to their non-blocking attempt.
    pub in_exec: bool,
}
