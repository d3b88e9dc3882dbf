// src/core/commands/list/brpop.rs

//! Implements the `BRPOP` command.

use super::blpop::parse_blocking_pop_args;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PopDirection};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Represents the `BRPOP` command with its parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct BRPop {
    pub keys: Vec<Bytes>,
    pub timeout: Duration,
}

impl ParseCommand for BRPop {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (keys, timeout) = parse_blocking_pop_args(args, "BRPOP")?;
        Ok(BRPop { keys, timeout })
    }
}

#[async_trait]
impl ExecutableCommand for BRPop {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let blockers = ctx.state.blocker_manager.clone();
        blockers
            .orchestrate_blocking_pop(ctx, &self.keys, PopDirection::Right, self.timeout)
            .await
    }
}

impl CommandSpec for BRPop {
    fn name(&self) -> &'static str {
        "brpop"
    }
    fn arity(&self) -> i64 {
        -3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE | CommandFlags::BLOCKING
    }
    fn get_keys(&self) -> Vec<Bytes> {
        self.keys.clone()
    }
}
