// src/core/handler/command_router.rs

//! The central component for routing parsed commands to their handlers.
//!
//! The `Router` receives a parsed `Command` from the `ConnectionHandler` and
//! dispatches it: transaction-control commands go to the transaction handler,
//! anything else is either queued (while the session is in a transaction) or
//! executed immediately against the keyspace.

use super::transaction_handler::TransactionHandler;
use crate::connection::SessionState;
use crate::core::commands::command_trait::{CommandExt, CommandFlags};
use crate::core::state::ServerState;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, Command, RespValue};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{Instrument, info_span};

/// The `Router` directs a parsed `Command` through the processing pipeline.
pub struct Router<'a> {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
    session: &'a mut SessionState,
}

impl<'a> Router<'a> {
    /// Creates a new `Router` for a given command and session.
    pub fn new(
        state: Arc<ServerState>,
        session_id: u64,
        addr: SocketAddr,
        session: &'a mut SessionState,
    ) -> Self {
        Self {
            state,
            session_id,
            addr,
            session,
        }
    }

    /// The main entry point for routing a command.
    pub async fn route(&mut self, command: Command) -> Result<RespValue, CitrineError> {
        let span = info_span!(
            "command",
            name = %command.name(),
            client.addr = %self.addr,
            client.id = %self.session_id,
        );

        async move {
            if self.session.is_in_transaction {
                self.handle_transaction_mode(command).await
            } else {
                self.handle_normal_command(command).await
            }
        }
        .instrument(span)
        .await
    }

    /// Handles commands while the session is inside a `MULTI`/`EXEC` block:
    /// everything except transaction control is queued for `EXEC`.
    async fn handle_transaction_mode(
        &mut self,
        command: Command,
    ) -> Result<RespValue, CitrineError> {
        if command.get_flags().contains(CommandFlags::TRANSACTION) {
            return self.handle_normal_command(command).await;
        }

        self.state.db.queue_command_in_tx(self.session_id, command)?;
        Ok(RespValue::SimpleString("QUEUED".into()))
    }

    /// Handles the normal command flow, dispatching transaction control to its
    /// handler and executing everything else directly.
    async fn handle_normal_command(
        &mut self,
        command: Command,
    ) -> Result<RespValue, CitrineError> {
        match command {
            Command::Multi => {
                let response =
                    TransactionHandler::new(self.state.clone(), self.session_id).handle_multi()?;
                self.session.is_in_transaction = true;
                Ok(response)
            }
            Command::Exec => {
                // The session leaves queuing state no matter how EXEC ends.
                self.session.is_in_transaction = false;
                TransactionHandler::new(self.state.clone(), self.session_id)
                    .handle_exec()
                    .await
            }
            Command::Discard => {
                self.session.is_in_transaction = false;
                TransactionHandler::new(self.state.clone(), self.session_id).handle_discard()
            }
            cmd => {
                let mut ctx = ExecutionContext {
                    state: self.state.clone(),
                    db: self.state.db.as_ref(),
                    session_id: self.session_id,
                    in_exec: false,
                };
                cmd.execute(&mut ctx).await
            }
        }
    }
}
