// src/core/commands/list/blpop.rs

//! Implements the `BLPOP` command.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::extract_bytes;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::{ExecutionContext, PopDirection};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Represents the `BLPOP` command with its parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct BLPop {
    pub keys: Vec<Bytes>,
    pub timeout: Duration,
}

/// Parses `key [key ...] timeout`. The timeout is in seconds; fractional
/// values are accepted and truncated to millisecond precision, and zero
/// means wait indefinitely.
pub(super) fn parse_blocking_pop_args(
    args: &[RespFrame],
    cmd: &str,
) -> Result<(Vec<Bytes>, Duration), CitrineError> {
    if args.len() < 2 {
        return Err(CitrineError::WrongArgumentCount(cmd.to_string()));
    }

    let timeout_str = match args.last().unwrap() {
        RespFrame::BulkString(bs) => String::from_utf8_lossy(bs).to_string(),
        _ => return Err(CitrineError::NotAnInteger),
    };
    let timeout_secs: f64 = timeout_str
        .parse()
        .map_err(|_| CitrineError::NotAnInteger)?;
    if timeout_secs < 0.0 || !timeout_secs.is_finite() {
        return Err(CitrineError::NotAnInteger);
    }

    let keys: Vec<Bytes> = args[..args.len() - 1]
        .iter()
        .map(extract_bytes)
        .collect::<Result<_, _>>()?;

    let timeout = Duration::from_millis((timeout_secs * 1000.0) as u64);
    Ok((keys, timeout))
}

impl ParseCommand for BLPop {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (keys, timeout) = parse_blocking_pop_args(args, "BLPOP")?;
        Ok(BLPop { keys, timeout })
    }
}

#[async_trait]
impl ExecutableCommand for BLPop {
    /// The blocking logic, including single-winner delivery and timeout
    /// handling, lives in the central `BlockerManager`.
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let blockers = ctx.state.blocker_manager.clone();
        blockers
            .orchestrate_blocking_pop(ctx, &self.keys, PopDirection::Left, self.timeout)
            .await
    }
}

impl CommandSpec for BLPop {
    fn name(&self) -> &'static str {
        "blpop"
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
