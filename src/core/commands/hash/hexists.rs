// src/core/commands/hash/hexists.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct HExists {
    pub key: Bytes,
    pub field: Bytes,
}

impl ParseCommand for HExists {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 2, "HEXISTS")?;
        Ok(HExists {
            key: extract_bytes(&args[0])?,
            field: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for HExists {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let field = self.field.clone();
        ctx.db
            .view(&self.key, move |entry| match entry {
                None => Ok(RespValue::Integer(0)),
                Some(value) => {
                    let present = value.data.as_hash()?.contains_key(&field);
                    Ok(RespValue::Integer(i64::from(present)))
                }
            })
            .await
    }
}

impl CommandSpec for HExists {
    fn name(&self) -> &'static str {
        "hexists"
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
