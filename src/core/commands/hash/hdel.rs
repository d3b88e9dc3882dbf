// src/core/commands/hash/hdel.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `HDEL` command. Deleting the last field deletes the key.
#[derive(Debug, Clone, Default)]
pub struct HDel {
    pub key: Bytes,
    pub fields: Vec<Bytes>,
}

impl ParseCommand for HDel {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, fields) = parse_key_and_values(args, 2, "HDEL")?;
        Ok(HDel { key, fields })
    }
}

#[async_trait]
impl ExecutableCommand for HDel {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let fields = self.fields.clone();
        ctx.db
            .compute(&self.key, move |current| {
                let Some(mut stored) = current else {
                    return (None, Ok(RespValue::Integer(0)));
                };
                let DataValue::Hash(hash) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                let mut removed = 0i64;
                for field in &fields {
                    if hash.swap_remove(field).is_some() {
                        removed += 1;
                    }
                }
                let reply = Ok(RespValue::Integer(removed));
                if hash.is_empty() {
                    (None, reply)
                } else {
                    (Some(stored), reply)
                }
            })
            .await
    }
}

impl CommandSpec for HDel {
    fn name(&self) -> &'static str {
        "hdel"
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
