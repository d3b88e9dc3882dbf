// src/core/commands/hash/hget.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct HGet {
    pub key: Bytes,
    pub field: Bytes,
}

impl ParseCommand for HGet {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 2, "HGET")?;
        Ok(HGet {
            key: extract_bytes(&args[0])?,
            field: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for HGet {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let field = self.field.clone();
        ctx.db
            .view(&self.key, move |entry| {
                let Some(value) = entry else {
                    return Ok(RespValue::Null);
                };
                let hash = value.data.as_hash()?;
                Ok(hash
                    .get(&field)
                    .map(|v| RespValue::BulkString(v.clone()))
                    .unwrap_or(RespValue::Null))
            })
            .await
    }
}

impl CommandSpec for HGet {
    fn name(&self) -> &'static str {
        "hget"
    }
    fn arity(&self) -> i64 {
        3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
