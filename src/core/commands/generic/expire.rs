// src/core/commands/generic/expire.rs

//! Implements `EXPIRE` and `PEXPIRE`, which attach a deadline to a live key.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, parse_int_arg, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::MAX_TTL;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};

/// Shared logic for the expire family. A non-positive TTL deletes the key
/// outright, matching the behavior of expiring in the past.
async fn apply_expiry(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    ttl_ms: i64,
) -> Result<RespValue, CitrineError> {
    if ttl_ms <= 0 {
        let existed = ctx.db.remove(key).await;
        return Ok(RespValue::Integer(i64::from(existed)));
    }

    let deadline = Instant::now() + Duration::from_millis(ttl_ms as u64).min(MAX_TTL);
    let updated = ctx
        .db
        .compute(key, |current| match current {
            Some(mut value) => {
                value.expiry = Some(deadline);
                (Some(value), true)
            }
            None => (None, false),
        })
        .await;

    if updated {
        ctx.db.register_expiry(key, deadline);
    }
    Ok(RespValue::Integer(i64::from(updated)))
}

/// Represents the `EXPIRE` command (seconds resolution).
#[derive(Debug, Clone, Default)]
pub struct Expire {
    pub key: Bytes,
    pub seconds: i64,
}

impl ParseCommand for Expire {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 2, "EXPIRE")?;
        Ok(Expire {
            key: extract_bytes(&args[0])?,
            seconds: parse_int_arg(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Expire {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        apply_expiry(ctx, &self.key, self.seconds.saturating_mul(1000)).await
    }
}

impl CommandSpec for Expire {
    fn name(&self) -> &'static str {
        "expire"
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

/// Represents the `PEXPIRE` command (millisecond resolution).
#[derive(Debug, Clone, Default)]
pub struct PExpire {
    pub key: Bytes,
    pub milliseconds: i64,
}

impl ParseCommand for PExpire {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 2, "PEXPIRE")?;
        Ok(PExpire {
            key: extract_bytes(&args[0])?,
            milliseconds: parse_int_arg(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for PExpire {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        apply_expiry(ctx, &self.key, self.milliseconds).await
    }
}

impl CommandSpec for PExpire {
    fn name(&self) -> &'static str {
        "pexpire"
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
