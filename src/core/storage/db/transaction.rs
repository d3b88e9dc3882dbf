// src/core/storage/db/transaction.rs

use super::Db;
use crate::core::Command;
use crate::core::CitrineError;
use tracing::debug;

/// The per-connection transaction queue, held between a successful `MULTI`
/// and the terminal `EXEC`/`DISCARD`.
#[derive(Debug, Default, Clone)]
pub struct TransactionState {
    pub commands: Vec<Command>,
    /// True once `MULTI` has been issued for the session.
    pub in_transaction: bool,
    /// Marks the transaction as poisoned by a queue-time error (unknown
    /// command, arity failure). `EXEC` aborts when this is set.
    pub has_error: bool,
}

impl Db {
    /// Starts a new transaction for a given session ID.
    pub fn begin_transaction(&self, session_id: u64) {
        let mut tx_state = self.tx_states.entry(session_id).or_default();
        tx_state.commands.clear();
        tx_state.has_error = false;
        tx_state.in_transaction = true;
        debug!("Session {}: Started transaction.", session_id);
    }

    /// Queues a command within an ongoing transaction.
    pub fn queue_command_in_tx(
        &self,
        session_id: u64,
        command: Command,
    ) -> Result<(), CitrineError> {
        let mut tx_state = self
            .tx_states
            .get_mut(&session_id)
            .ok_or(CitrineError::ExecWithoutMulti)?;
        tx_state.commands.push(command);
        debug!("Session {}: Queued command.", session_id);
        Ok(())
    }

    /// Flags the session's transaction as poisoned by a queue-time error.
    pub fn poison_transaction(&self, session_id: u64) {
        if let Some(mut tx_state) = self.tx_states.get_mut(&session_id) {
            tx_state.has_error = true;
        }
    }

    /// Retrieves and removes the transaction state for a session.
    pub fn take_transaction_state(&self, session_id: u64) -> Option<TransactionState> {
        let state = self.tx_states.remove(&session_id).map(|(_, v)| v);
        if state.is_some() {
            debug!("Session {}: Took transaction state.", session_id);
        }
        state
    }

    /// Aborts a transaction, clearing all queued commands for the session.
    /// Reports whether a transaction was actually active.
    pub fn discard_transaction(&self, session_id: u64) -> bool {
        let discarded = self.tx_states.remove(&session_id).is_some();
        if discarded {
            debug!("Session {}: Discarded transaction.", session_id);
        }
        discarded
    }
}
