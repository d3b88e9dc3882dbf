// src/core/commands/string/set.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, MAX_TTL, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::{Duration, Instant};

/// Defines the condition for `SET` execution (`NX` or `XX`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SetCondition {
    #[default]
    None, // Always set.
    IfExists,    // `XX` - only set if the key already exists.
    IfNotExists, // `NX` - only set if the key does not already exist.
}

/// Defines the TTL options for the `SET` command.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TtlOption {
    #[default]
    None, // No TTL option: any existing deadline is removed on success.
    Seconds(u64),
    Milliseconds(u64),
}

/// Represents the full `SET` command with all its options.
#[derive(Debug, Clone, Default)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub ttl: TtlOption,
    pub condition: SetCondition,
}

impl ParseCommand for Set {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 2 {
            return Err(CitrineError::WrongArgumentCount("SET".to_string()));
        }
        let mut cmd = Set {
            key: extract_bytes(&args[0])?,
            value: extract_bytes(&args[1])?,
            ..Default::default()
        };

        let mut i = 2;
        while i < args.len() {
            let token = extract_string(&args[i])?.to_ascii_lowercase();
            match token.as_str() {
                "ex" | "px" => {
                    // EX and PX are mutually exclusive.
                    if cmd.ttl != TtlOption::None {
                        return Err(CitrineError::SyntaxError);
                    }
                    let Some(value_frame) = args.get(i + 1) else {
                        return Err(CitrineError::SyntaxError);
                    };
                    let amount: u64 = extract_string(value_frame)?
                        .parse()
                        .map_err(|_| CitrineError::NotAnInteger)?;
                    cmd.ttl = if token == "ex" {
                        TtlOption::Seconds(amount)
                    } else {
                        TtlOption::Milliseconds(amount)
                    };
                    i += 2;
                }
                "nx" => {
                    if cmd.condition != SetCondition::None {
                        return Err(CitrineError::SyntaxError);
                    }
                    cmd.condition = SetCondition::IfNotExists;
                    i += 1;
                }
                "xx" => {
                    if cmd.condition != SetCondition::None {
                        return Err(CitrineError::SyntaxError);
                    }
                    cmd.condition = SetCondition::IfExists;
                    i += 1;
                }
                _ => return Err(CitrineError::SyntaxError),
            }
        }
        Ok(cmd)
    }
}

#[async_trait]
impl ExecutableCommand for Set {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let deadline = match self.ttl {
            TtlOption::Seconds(s) => Some(Instant::now() + Duration::from_secs(s).min(MAX_TTL)),
            TtlOption::Milliseconds(ms) => {
                Some(Instant::now() + Duration::from_millis(ms).min(MAX_TTL))
            }
            TtlOption::None => None,
        };
        let value = self.value.clone();
        let condition = self.condition;

        let written = ctx
            .db
            .compute(&self.key, move |current| {
                // The kind of a live entry is stable: SET does not silently
                // turn a container into a string.
                if let Some(existing) = &current {
                    if !matches!(existing.data, DataValue::String(_)) {
                        return (current, Err(CitrineError::WrongType));
                    }
                }

                let exists = current.is_some();
                if (condition == SetCondition::IfExists && !exists)
                    || (condition == SetCondition::IfNotExists && exists)
                {
                    return (current, Ok(false));
                }

                // Replacement without a TTL option wipes any prior deadline.
                let mut stored = StoredValue::new(DataValue::String(value));
                stored.expiry = deadline;
                (Some(stored), Ok(true))
            })
            .await?;

        if !written {
            return Ok(RespValue::Null);
        }
        if let Some(when) = deadline {
            ctx.db.register_expiry(&self.key, when);
        }
        Ok(RespValue::SimpleString("OK".into()))
    }
}

impl CommandSpec for Set {
    fn name(&self) -> &'static str {
        "set"
    }
    fn arity(&self) -> i64 {
        -3
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
