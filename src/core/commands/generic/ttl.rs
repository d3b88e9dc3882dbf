// src/core/commands/generic/ttl.rs

//! Implements `TTL` and `PTTL`. Absent keys report -2, keys without a
//! deadline report -1.

use crate::core::commands::command_spec::CommandSpec;
use crate::core::commands::command_trait::{CommandFlags, ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Ttl {
    pub key: Bytes,
}

impl ParseCommand for Ttl {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "TTL")?;
        Ok(Ttl {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Ttl {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let reply = ctx
            .db
            .view(&self.key, |entry| match entry {
                None => -2,
                Some(value) => value.remaining_ttl_secs().map_or(-1, |secs| secs as i64),
            })
            .await;
        Ok(RespValue::Integer(reply))
    }
}

impl CommandSpec for Ttl {
    fn name(&self) -> &'static str {
        "ttl"
    }
    fn arity(&self) -> i64 {
        2
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pttl {
    pub key: Bytes,
}

impl ParseCommand for Pttl {
    fn parse(args: &[RespFrame]) -> Result<Self, CitrineError> {
        validate_arg_count(args, 1, "PTTL")?;
        Ok(Pttl {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Pttl {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, CitrineError> {
        let reply = ctx
            .db
            .view(&self.key, |entry| match entry {
                None => -2,
                Some(value) => value.remaining_ttl_ms().unwrap_or(-1),
            })
            .await;
        Ok(RespValue::Integer(reply))
    }
}

impl CommandSpec for Pttl {
    fn name(&self) -> &'static str {
        "pttl"
    }
    fn arity(&self) -> i64 {
        2
    }
    fn flags(&self) -> CommandFlags {
        CommandFlags::READONLY
    }
    fn get_keys(&self) -> Vec<Bytes> {
        vec![self.key.clone()]
    }
}
