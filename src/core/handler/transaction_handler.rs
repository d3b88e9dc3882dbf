// src/core/handler/transaction_handler.rs

//! Manages the logic for transactions: command queuing and batch execution.

use crate::core::commands::command_trait::CommandExt;
use crate::core::state::ServerState;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use std::sync::Arc;

/// Handles the transaction lifecycle for a single client session.
pub struct TransactionHandler {
    state: Arc<ServerState>,
    session_id: u64,
}

impl TransactionHandler {
    pub fn new(state: Arc<ServerState>, session_id: u64) -> Self {
        Self { state, session_id }
    }

    /// Handles the `MULTI` command, starting a new transaction for the session.
    pub fn handle_multi(&self) -> Result<RespValue, CitrineError> {
        if let Some(tx_state) = self.state.db.tx_states.get(&self.session_id) {
            if tx_state.in_transaction {
                return Err(CitrineError::NestedMulti);
            }
        }
        self.state.db.begin_transaction(self.session_id);
        Ok(RespValue::SimpleString("OK".into()))
    }

    /// Handles the `EXEC` command: runs the queued commands in insertion order
    /// as one batch. Each command contributes exactly one reply element; a
    /// failing command contributes an error element and execution continues.
    pub async fn handle_exec(&self) -> Result<RespValue, CitrineError> {
        let tx_state = self
            .state
            .db
            .take_transaction_state(self.session_id)
            .ok_or(CitrineError::ExecWithoutMulti)?;

        if tx_state.has_error {
            return Err(CitrineError::ExecAborted);
        }

        let mut responses = Vec::with_capacity(tx_state.commands.len());
        for command in &tx_state.commands {
            let mut ctx = ExecutionContext {
                state: self.state.clone(),
                db: self.state.db.as_ref(),
                session_id: self.session_id,
                in_exec: true,
            };
            match command.execute(&mut ctx).await {
                Ok(resp) => responses.push(resp),
                // Runtime errors are reported in place; later commands still run.
                Err(e) => responses.push(RespValue::Error(e.to_string())),
            }
        }
        Ok(RespValue::Array(responses))
    }

    /// Handles the `DISCARD` command, aborting the transaction.
    pub fn handle_discard(&self) -> Result<RespValue, CitrineError> {
        if self.state.db.discard_transaction(self.session_id) {
            Ok(RespValue::SimpleString("OK".into()))
        } else {
            Err(CitrineError::DiscardWithoutMulti)
        }
    }
}
