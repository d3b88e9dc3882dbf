// src/core/commands/set/sadd.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_values;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;

/// Represents the `SADD` command. Replies with the number of members that
/// were actually new.
#[derive(Debug, Clone, Default)]
pub struct Sadd {
    pub key: Bytes,
    pub members: Vec<Bytes>,
}

impl ParseCommand for Sadd {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, members) = parse_key_and_values(args, 2, "SADD")?;
        Ok(Sadd { key, members })
    }
}

#[async_trait]
impl ExecutableCommand for Sadd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let members = self.members.clone();
        ctx.db
            .compute(&self.key, move |current| {
                let mut stored =
                    current.unwrap_or_else(|| StoredValue::new(DataValue::Set(HashSet::new())));
                let DataValue::Set(set) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                let mut added = 0i64;
                for member in members {
                    if set.insert(member) {
                        added += 1;
                    }
                }
                (Some(stored), Ok(RespValue::Integer(added)))
            })
            .await
    }
}

impl CommandSpec for Sadd {
    fn name(&self) -> &'static str {
        "sadd"
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
