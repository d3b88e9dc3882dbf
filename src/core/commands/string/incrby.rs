// src/core/commands/string/incrby.rs

use super::incr::incr_decr_logic;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, parse_int_arg, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `INCRBY` command.
#[derive(Debug, Clone, Default)]
pub struct IncrBy {
    pub key: Bytes,
    pub increment: i64,
}

impl ParseCommand for IncrBy {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 2, "INCRBY")?;
        Ok(IncrBy {
            key: extract_bytes(&args[0])?,
            increment: parse_int_arg(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for IncrBy {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        incr_decr_logic(ctx, &self.key, self.increment).await
    }
}

impl CommandSpec for IncrBy {
    fn name(&self) -> &'static str {
        "incrby"
    }
    fn arity(&self) -> i64 {
        3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
