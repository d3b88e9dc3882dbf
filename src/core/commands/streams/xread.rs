// src/core/commands/streams/xread.rs

//! Implements the synchronous `XREAD` command: for each stream, the entries
//! with ids strictly greater than the supplied id.

use super::xrange::format_entry;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::StreamId;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::Bound;

/// The parsed `XREAD` command: one `(key, after-id)` pair per stream.
#[derive(Debug, Clone, Default)]
pub struct XRead {
    pub streams: Vec<(Bytes, StreamId)>,
}

impl ParseCommand for XRead {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.is_empty() {
            return Err(CitrineError::WrongArgumentCount("XREAD".to_string()));
        }
        if !extract_string(&args[0])?.eq_ignore_ascii_case("streams") {
            return Err(CitrineError::SyntaxError);
        }

        let remaining = &args[1..];
        let num_args = remaining.len();
        if num_args == 0 || num_args % 2 != 0 {
            return Err(CitrineError::WrongArgumentCount("XREAD".to_string()));
        }

        let num_streams = num_args / 2;
        let keys = &remaining[0..num_streams];
        let ids = &remaining[num_streams..];

        let mut streams = Vec::with_capacity(num_streams);
        for (key_frame, id_frame) in keys.iter().zip(ids.iter()) {
            let key = extract_bytes(key_frame)?;
            let after = StreamId::parse_with_default(&extract_string(id_frame)?, 0)?;
            streams.push((key, after));
        }
        Ok(XRead { streams })
    }
}

#[async_trait]
impl ExecutableCommand for XRead {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let mut results = Vec::new();
        for (key, after) in &self.streams {
            let after = *after;
            let entries = ctx
                .db
                .view(key, move |entry| {
                    let Some(value) = entry else {
                        return Ok::<Vec<RespValue>, CitrineError>(Vec::new());
                    };
                    let stream = value.data.as_stream()?;
                    Ok(stream
                        .entries
                        .range((Bound::Excluded(after), Bound::Unbounded))
                        .map(|(id, entry)| format_entry(id, entry))
                        .collect::<Vec<_>>())
                })
                .await?;
            if !entries.is_empty() {
                results.push(RespValue::Array(vec![
                    RespValue::BulkString(key.clone()),
                    RespValue::Array(entries),
                ]));
            }
        }

        if results.is_empty() {
            // No stream moved past the supplied ids.
            Ok(RespValue::NullArray)
        } else {
            Ok(RespValue::Array(results))
        }
    }
}

impl CommandSpec for XRead {
    fn name(&self) -> &'static str {
        "xread"
    }
    fn arity(&self) -> i64 {
        -4
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        self.streams.iter().map(|(key, _)| key.clone()).collect()
    }
}
