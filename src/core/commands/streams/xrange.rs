// src/core/commands/streams/xrange.rs

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::{StreamEntry, StreamId};
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;

/// Represents the `XRANGE` command. Both bounds are inclusive; `-`/`+` are
/// the minimum and maximum ids, and a bare `ms` defaults its sequence to 0
/// on the start bound and to `u64::MAX` on the end bound.
#[derive(Debug, Clone, Default)]
pub struct XRange {
    pub key: Bytes,
    pub start: StreamId,
    pub end: StreamId,
    pub count: Option<usize>,
}

fn parse_start_boundary(s: &str) -> Result<StreamId, CitrineError> {
    match s {
        "-" => Ok(StreamId::MIN),
        "+" => Ok(StreamId::MAX),
        _ => StreamId::parse_with_default(s, 0),
    }
}

fn parse_end_boundary(s: &str) -> Result<StreamId, CitrineError> {
    match s {
        "-" => Ok(StreamId::MIN),
        "+" => Ok(StreamId::MAX),
        _ => StreamId::parse_with_default(s, u64::MAX),
    }
}

impl ParseCommand for XRange {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 3 {
            return Err(CitrineError::WrongArgumentCount("XRANGE".to_string()));
        }
        let key = extract_bytes(&args[0])?;
        let start = parse_start_boundary(&extract_string(&args[1])?)?;
        let end = parse_end_boundary(&extract_string(&args[2])?)?;

        let mut count = None;
        if args.len() > 3 {
            if extract_string(&args[3])?.eq_ignore_ascii_case("count") {
                if args.len() != 5 {
                    return Err(CitrineError::SyntaxError);
                }
                count = Some(
                    extract_string(&args[4])?
                        .parse()
                        .map_err(|_| CitrineError::NotAnInteger)?,
                );
            } else {
                return Err(CitrineError::SyntaxError);
            }
        }
        Ok(XRange {
            key,
            start,
            end,
            count,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let (start, end, count) = (self.start, self.end, self.count);
        ctx.db
            .view(&self.key, move |entry| {
                let Some(value) = entry else {
                    return Ok(RespValue::Array(vec![]));
                };
                let stream = value.data.as_stream()?;
                let results = stream
                    .entries
                    .range((Bound::Included(start), Bound::Included(end)))
                    .take(count.unwrap_or(usize::MAX))
                    .map(|(id, entry)| format_entry(id, entry))
                    .collect();
                Ok(RespValue::Array(results))
            })
            .await
    }
}

/// Renders one entry as `[id, [field, value, ...]]`.
pub(crate) fn format_entry(id: &StreamId, entry: &StreamEntry) -> RespValue {
    let mut fields_array = Vec::with_capacity(entry.fields.len() * 2);
    for (field, value) in &entry.fields {
        fields_array.push(RespValue::BulkString(field.clone()));
        fields_array.push(RespValue::BulkString(value.clone()));
    }
    RespValue::Array(vec![
        RespValue::BulkString(id.to_string().into()),
        RespValue::Array(fields_array),
    ])
}

impl CommandSpec for XRange {
    fn name(&self) -> &'static str {
        "xrange"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
