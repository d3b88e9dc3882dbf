// src/core/commands/set/srem.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `SREM` command. Removing the last member deletes the key.
#[derive(Debug, Clone, Default)]
pub struct Srem {
    pub key: Bytes,
    pub members: Vec<Bytes>,
}

impl ParseCommand for Srem {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, members) = parse_key_and_values(args, 2, "SREM")?;
        Ok(Srem { key, members })
    }
}

#[async_trait]
impl ExecutableCommand for Srem {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let members = self.members.clone();
        ctx.db
            .compute(&self.key, move |current| {
                let Some(mut stored) = current else {
                    return (None, Ok(RespValue::Integer(0)));
                };
                let DataValue::Set(set) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                let mut removed = 0i64;
                for member in &members {
                    if set.remove(member) {
                        removed += 1;
                    }
                }
                let reply = Ok(RespValue::Integer(removed));
                if set.is_empty() {
                    (None, reply)
                } else {
                    (Some(stored), reply)
                }
            })
            .await
    }
}

impl CommandSpec for Srem {
    fn name(&self) -> &'static str {
        "srem"
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
