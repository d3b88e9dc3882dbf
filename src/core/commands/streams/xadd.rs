// src/core/commands/streams/xadd.rs

//! Implements the `XADD` command, the write operation for the stream kind.
//!
//! Each entry gets a unique, strictly increasing ID. `*` auto-generates both
//! parts, `ms-*` pins the millisecond part, and an explicit `ms-seq` must be
//! greater than the last stored id.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::{DataValue, StoredValue};
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::{EntryIdSpec, Stream};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

/// Represents the `XADD` command with its parsed id spec and field pairs.
#[derive(Debug, Clone)]
pub struct XAdd {
    pub key: Bytes,
    pub id_spec: EntryIdSpec,
    pub fields: IndexMap<Bytes, Bytes>,
}

impl Default for XAdd {
    fn default() -> Self {
        Self {
            key: Bytes::new(),
            id_spec: EntryIdSpec::Auto,
            fields: IndexMap::new(),
        }
    }
}

impl ParseCommand for XAdd {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 4 {
            return Err(CitrineError::WrongArgumentCount("XADD".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let id_spec = EntryIdSpec::parse(&extract_string(&args[1])?)?;

        let remaining = &args[2..];
        if remaining.is_empty() || remaining.len() % 2 != 0 {
            return Err(CitrineError::WrongArgumentCount("XADD".to_string()));
        }
        let fields = remaining
            .chunks_exact(2)
            .map(|chunk| Ok((extract_bytes(&chunk[0])?, extract_bytes(&chunk[1])?)))
            .collect::<Result<_, CitrineError>>()?;

        Ok(XAdd {
            key,
            id_spec,
            fields,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XAdd {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let id_spec = self.id_spec;
        let fields = self.fields.clone();
        ctx.db
            .compute(&self.key, move |current| {
                let mut stored =
                    current.unwrap_or_else(|| StoredValue::new(DataValue::Stream(Stream::new())));
                let DataValue::Stream(stream) = &mut stored.data else {
                    return (Some(stored), Err(CitrineError::WrongType));
                };
                match stream.add_entry(id_spec, fields) {
                    Ok(id) => (
                        Some(stored),
                        Ok(RespValue::BulkString(id.to_string().into())),
                    ),
                    Err(e) => {
                        // A rejected first insert must not leave an empty
                        // stream behind.
                        if stream.is_empty() {
                            (None, Err(e))
                        } else {
                            (Some(stored), Err(e))
                        }
                    }
                }
            })
            .await
    }
}

impl CommandSpec for XAdd {
    fn name(&self) -> &'static str {
        "xadd"
    }
    fn arity(&self) -> i64 {
        -5
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::WRITE
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
