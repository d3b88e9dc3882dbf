// src/core/commands/zset/zrem.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `ZREM` command. Removing the last member deletes the key.
#[derive(Debug, Clone, Default)]
pub struct Zrem {
    pub key: Bytes,
    pub members: Vec<Bytes>,
}

impl ParseCommand for Zrem {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, members) = parse_key_and_values(args, 2, "ZREM")?;
        Ok(Zrem { key, members })
    }
}

#[async_trait]
impl ExecutableCommand for Zrem {
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
                let DataValue::SortedSet(zset) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                let mut removed = 0i64;
                for member in &members {
                    if zset.remove(member) {
                        removed += 1;
                    }
                }
                let reply = Ok(RespValue::Integer(removed));
                if zset.is_empty() {
                    (None, reply)
                } else {
                    (Some(stored), reply)
                }
            })
            .await
    }
}

impl CommandSpec for Zrem {
    fn name(&self) -> &'static str {
        "zrem"
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
