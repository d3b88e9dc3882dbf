// src/core/commands/zset/zadd.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::zset::SortedSet;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the `ZADD` command with plain score/member pairs. Replies with
/// the number of members that were newly added.
#[derive(Debug, Clone, Default)]
pub struct Zadd {
    pub key: Bytes,
    pub members: Vec<(f64, Bytes)>,
}

impl ParseCommand for Zadd {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 3 || args.len() % 2 != 1 {
            return Err(CitrineError::WrongArgumentCount("ZADD".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let members = args[1..]
            .chunks_exact(2)
            .map(|chunk| -> Result<(f64, Bytes), CitrineError> {
                let score = extract_string(&chunk[0])?
                    .parse::<f64>()
                    .map_err(|_| CitrineError::NotAFloat)?;
                Ok((score, extract_bytes(&chunk[1])?))
            })
            .collect::<Result<_, _>>()?;
        Ok(Zadd { key, members })
    }
}

#[async_trait]
impl ExecutableCommand for Zadd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let members = self.members.clone();
        ctx.db
            .compute(&self.key, move |current| {
                let mut stored = current
                    .unwrap_or_else(|| StoredValue::new(DataValue::SortedSet(SortedSet::new())));
                let DataValue::SortedSet(zset) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                let mut added = 0i64;
                for (score, member) in members {
                    if zset.insert(score, member) {
                        added += 1;
                    }
                }
                (Some(stored), Ok(RespValue::Integer(added)))
            })
            .await
    }
}

impl CommandSpec for Zadd {
    fn name(&self) -> &'static str {
        "zadd"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
