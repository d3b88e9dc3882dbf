// src/core/commands/hash/hset.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_key_and_field_value_pairs;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

/// Represents the `HSET` command. Replies with the number of fields that
/// were newly created.
#[derive(Debug, Clone, Default)]
pub struct HSet {
    pub key: Bytes,
    pub fields: Vec<(Bytes, Bytes)>,
}

impl ParseCommand for HSet {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        let (key, fields) = parse_key_and_field_value_pairs(args, "HSET")?;
        Ok(HSet { key, fields })
    }
}

#[async_trait]
impl ExecutableCommand for HSet {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let fields = self.fields.clone();
        ctx.db
            .compute(&self.key, move |current| {
                let mut stored =
                    current.unwrap_or_else(|| StoredValue::new(DataValue::Hash(IndexMap::new())));
                let DataValue::Hash(hash) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                let mut created = 0i64;
                for (field, value) in fields {
                    if hash.insert(field, value).is_none() {
                        created += 1;
                    }
                }
                (Some(stored), Ok(RespValue::Integer(created)))
            })
            .await
    }
}

impl CommandSpec for HSet {
    fn name(&self) -> &'static str {
        "hset"
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
