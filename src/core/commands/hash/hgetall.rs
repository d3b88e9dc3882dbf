// src/core/commands/hash/hgetall.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `HGETALL` command: a flat array of field, value, field,
/// value... pairs.
#[derive(Debug, Clone, Default)]
pub struct HGetAll {
    pub key: Bytes,
}

impl ParseCommand for HGetAll {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "HGETALL")?;
        Ok(HGetAll {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for HGetAll {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        ctx.db
            .view(&self.key, |entry| {
                let Some(value) = entry else {
                    return Ok(RespValue::Array(vec![]));
                };
                let hash = value.data.as_hash()?;
                let mut flat = Vec::with_capacity(hash.len() * 2);
                for (field, val) in hash {
                    flat.push(RespValue::BulkString(field.clone()));
                    flat.push(RespValue::BulkString(val.clone()));
                }
                Ok(RespValue::Array(flat))
            })
            .await
    }
}

impl CommandSpec for HGetAll {
    fn name(&self) -> &'static str {
        "hgetall"
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
