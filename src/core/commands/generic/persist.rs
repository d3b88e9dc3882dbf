// src/core/commands/generic/persist.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `PERSIST` command: drops a key's deadline. Replies 1 only
/// when a deadline was actually removed. The stale heap registration left
/// behind is skipped by the reaper's deadline check.
#[derive(Debug, Clone, Default)]
pub struct Persist {
    pub key: Bytes,
}

impl ParseCommand for Persist {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "PERSIST")?;
        Ok(Persist {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Persist {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let cleared = ctx
            .db
            .compute(&self.key, |current| match current {
                Some(mut value) => {
                    let had_deadline = value.expiry.take().is_some();
                    (Some(value), had_deadline)
                }
                None => (None, false),
            })
            .await;
        Ok(RespValue::Integer(i64::from(cleared)))
    }
}

impl CommandSpec for Persist {
    fn name(&self) -> &'static str {
        "persist"
    }
    fn arity(&self) -> i64 {
        2
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
