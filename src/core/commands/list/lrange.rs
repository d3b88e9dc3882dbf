// src/core/commands/list/lrange.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, parse_int_arg, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `LRANGE` command. Both bounds are inclusive; negative
/// indices count from the tail and out-of-range bounds are clamped.
#[derive(Debug, Clone, Default)]
pub struct LRange {
    pub key: Bytes,
    pub start: i64,
    pub stop: i64,
}

impl ParseCommand for LRange {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 3, "LRANGE")?;
        Ok(LRange {
            key: extract_bytes(&args[0])?,
            start: parse_int_arg(&args[1])?,
            stop: parse_int_arg(&args[2])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let start = self.start;
        let stop = self.stop;
        ctx.db
            .view(&self.key, move |entry| {
                let Some(value) = entry else {
                    return Ok(RespValue::Array(vec![]));
                };
                let list = value.data.as_list()?;
                let len = list.len() as i64;
                if len == 0 {
                    return Ok(RespValue::Array(vec![]));
                }
                let start = (if start < 0 { len + start } else { start }).max(0);
                let stop = (if stop < 0 { len + stop } else { stop }).min(len - 1);
                if start > stop {
                    return Ok(RespValue::Array(vec![]));
                }
                let elements = list
                    .iter()
                    .skip(start as usize)
                    .take((stop - start + 1) as usize)
                    .cloned()
                    .map(RespValue::BulkString)
                    .collect();
                Ok(RespValue::Array(elements))
            })
            .await
    }
}

impl CommandSpec for LRange {
    fn name(&self) -> &'static str {
        "lrange"
    }
    fn arity(&self) -> i64 {
        4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
