// src/core/commands/list/rpop.rs

use super::logic::{list_pop_many, list_pop_single};
use super::lpop::parse_pop_args;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PopDirection};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `RPOP` command with its optional count.
#[derive(Debug, Clone, Default)]
pub struct RPop {
    pub key: Bytes,
    pub count: Option<usize>,
}

impl ParseCommand for RPop {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, count) = parse_pop_args(args, "RPOP")?;
        Ok(RPop { key, count })
    }
}

#[async_trait]
impl ExecutableCommand for RPop {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        match self.count {
            None => list_pop_single(ctx, &self.key, PopDirection::Right).await,
            Some(count) => list_pop_many(ctx, &self.key, PopDirection::Right, count).await,
        }
    }
}

impl CommandSpec for RPop {
    fn name(&self) -> &'static str {
        "rpop"
    }
    fn arity(&self) -> i64 {
        -2
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
