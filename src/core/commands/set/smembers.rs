// src/core/commands/set/smembers.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `SMEMBERS` command. Member order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct Smembers {
    pub key: Bytes,
}

impl ParseCommand for Smembers {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "SMEMBERS")?;
        Ok(Smembers {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Smembers {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        ctx.db
            .view(&self.key, |entry| {
                let Some(value) = entry else {
                    return Ok(RespValue::Array(vec![]));
                };
                let members = value
                    .data
                    .as_set()?
                    .iter()
                    .cloned()
                    .map(RespValue::BulkString)
                    .collect();
                Ok(RespValue::Array(members))
            })
            .await
    }
}

impl CommandSpec for Smembers {
    fn name(&self) -> &'static str {
        "smembers"
    }
    fn arity(&self) -> i64 {
        2
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
