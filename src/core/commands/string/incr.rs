// src/core/commands/string/incr.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Shared logic for `INCR`, `DECR` and `INCRBY`.
///
/// The value must parse as a signed 64-bit decimal; anything else, including
/// an addition that would leave the i64 range, is `NotAnInteger` and leaves
/// the stored value untouched.
pub(crate) async fn incr_decr_logic(
    ctx: &mut ExecutionContext<'_>,
    key: &Bytes,
    delta: i64,
) -> Result<RespValue, CitrineError> {
    ctx.db
        .compute(key, move |current| {
            let Some(mut stored) = current else {
                // An absent key counts up from zero.
                let value = StoredValue::new(DataValue::String(delta.to_string().into()));
                return (Some(value), Ok(RespValue::Integer(delta)));
            };

            let DataValue::String(raw) = &mut stored.data else {
                return (Some(stored), Err(CitrineError::WrongType));
            };

            let parsed: Result<i64, _> = std::str::from_utf8(raw)
                .map_err(|_| CitrineError::NotAnInteger)
                .and_then(|s| s.parse().map_err(|_| CitrineError::NotAnInteger));
            let current_value = match parsed {
                Ok(v) => v,
                Err(e) => return (Some(stored), Err(e)),
            };

            let Some(new_value) = current_value.checked_add(delta) else {
                return (Some(stored), Err(CitrineError::NotAnInteger));
            };

            *raw = Bytes::from(new_value.to_string());
            (Some(stored), Ok(RespValue::Integer(new_value)))
        })
        .await
}

/// Represents the `INCR` command.
#[derive(Debug, Clone, Default)]
pub struct Incr {
    pub key: Bytes,
}

impl ParseCommand for Incr {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "INCR")?;
        Ok(Incr {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Incr {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        incr_decr_logic(ctx, &self.key, 1).await
    }
}

impl CommandSpec for Incr {
    fn name(&self) -> &'static str {
        "incr"
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
