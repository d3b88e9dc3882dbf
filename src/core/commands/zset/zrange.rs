// src/core/commands/zset/zrange.rs

use super::zscore::format_score;
use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, parse_int_arg};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Represents the rank-based `ZRANGE` command. Negative indices count from
/// the highest-ranked member; both bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ZRange {
    pub key: Bytes,
    pub start: i64,
    pub stop: i64,
    pub with_scores: bool,
}

impl ParseCommand for ZRange {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        if args.len() < 3 || args.len() > 4 {
            return Err(CitrineError::WrongArgumentCount("ZRANGE".to_string()));
        }
        let with_scores = match args.get(3) {
            None => false,
            Some(frame) => {
                if extract_string(frame)?.eq_ignore_ascii_case("withscores") {
                    true
                } else {
                    return Err(CitrineError::SyntaxError);
                }
            }
        };
        Ok(ZRange {
            key: extract_bytes(&args[0])?,
            start: parse_int_arg(&args[1])?,
            stop: parse_int_arg(&args[2])?,
            with_scores,
        })
    }
}

#[async_trait]
impl ExecutableCommand for ZRange {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let (start, stop, with_scores) = (self.start, self.stop, self.with_scores);
        ctx.db
            .view(&self.key, move |entry| {
                let Some(value) = entry else {
                    return Ok(RespValue::Array(vec![]));
                };
                let ranked = value.data.as_zset()?.range_by_rank(start, stop);
                let mut reply = Vec::with_capacity(ranked.len() * if with_scores { 2 } else { 1 });
                for (member, score) in ranked {
                    reply.push(RespValue::BulkString(member));
                    if with_scores {
                        reply.push(RespValue::BulkString(format_score(score).into()));
                    }
                }
                Ok(RespValue::Array(reply))
            })
            .await
    }
}

impl CommandSpec for ZRange {
    fn name(&self) -> &'static str {
        "zrange"
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
