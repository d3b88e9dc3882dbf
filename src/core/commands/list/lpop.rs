// src/core/commands/list/lpop.rs

use super::logic::{list_pop_many, list_pop_single};
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PopDirection};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `LPOP` command with its optional count.
#[derive(Debug, Clone, Default)]
pub struct LPop {
    pub key: Bytes,
    pub count: Option<usize>,
}

pub(super) fn parse_pop_args(
    args: &[RespFrame],
    cmd: &str,
) -> Result<(Bytes, Option<usize>), CitrineError> {
    match args {
        [key] => Ok((extract_bytes(key)?, None)),
        [key, count] => {
            let count: usize = extract_string(count)?
                .parse()
                .map_err(|_| CitrineError::NotAnInteger)?;
            Ok((extract_bytes(key)?, Some(count)))
        }
        _ => Err(CitrineError::WrongArgumentCount(cmd.to_string())),
    }
}

impl ParseCommand for LPop {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, count) = parse_pop_args(args, "LPOP")?;
        Ok(LPop { key, count })
    }
}

#[async_trait]
impl ExecutableCommand for LPop {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        match self.count {
            None => list_pop_single(ctx, &self.key, PopDirection::Left).await,
            Some(count) => list_pop_many(ctx, &self.key, PopDirection::Left, count).await,
        }
    }
}

impl CommandSpec for LPop {
    fn name(&self) -> &'static str {
        "lpop"
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
