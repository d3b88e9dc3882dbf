// src/core/commands/mod.rs

//! This module defines all supported commands, organizes them into categories,
//! and provides the central `Command` enum that encapsulates their parsed
//! state. The `define_commands!` macro generates the enum and its core
//! implementations, reducing boilerplate and ensuring consistency.

use crate::core::commands::command_trait::{
    CommandExt, CommandFlags, ExecutableCommand, ParseCommand,
};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{CitrineError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

// Re-export the CommandSpec trait for easy access by other modules.
pub use command_spec::CommandSpec;

pub mod command_spec;
pub mod command_trait;
pub mod generic;
pub mod hash;
pub mod helpers;
pub mod list;
pub mod set;
pub mod string;
pub mod streams;
pub mod zset;

/// Generates the `Command` enum and its dispatch implementations from the
/// `(Variant, Type, "wire name")` table. The transaction-control commands
/// (`MULTI`, `EXEC`, `DISCARD`) carry no arguments and are routed by the
/// dispatcher rather than executed, so they are plain variants.
macro_rules! define_commands {
    ( $( ($variant:ident, $type:ty, $name:literal) ),+ $(,)? ) => {
        /// Every command the server understands, in parsed form.
        #[derive(Debug, Clone)]
        pub enum Command {
            $( $variant($type), )+
            Multi,
            Exec,
            Discard,
        }

        impl Command {
            pub fn name(&self) -> &'static str {
                match self {
                    $( Command::$variant(_) => $name, )+
                    Command::Multi => "multi",
                    Command::Exec => "exec",
                    Command::Discard => "discard",
                }
            }
        }

        impl TryFrom<RespFrame> for Command {
            type Error = CitrineError;

            /// Parses a multi-bulk request frame into a command. The command
            /// name is matched case-insensitively.
            fn try_from(frame: RespFrame) -> Result<Self, CitrineError> {
                let RespFrame::Array(parts) = frame else {
                    return Err(CitrineError::ProtocolError(
                        "expected a multi-bulk request".to_string(),
                    ));
                };
                let mut parts = parts.into_iter();
                let Some(RespFrame::BulkString(name_bytes)) = parts.next() else {
                    return Err(CitrineError::ProtocolError(
                        "expected a bulk-string command name".to_string(),
                    ));
                };
                let name = String::from_utf8_lossy(&name_bytes).to_ascii_lowercase();
                let args: Vec<RespFrame> = parts.collect();

                match name.as_str() {
                    $( $name => Ok(Command::$variant(<$type as ParseCommand>::parse(&args)?)), )+
                    "multi" => parse_bare(&args, "MULTI", Command::Multi),
                    "exec" => parse_bare(&args, "EXEC", Command::Exec),
                    "discard" => parse_bare(&args, "DISCARD", Command::Discard),
                    _ => Err(CitrineError::UnknownCommand(name)),
                }
            }
        }

        #[async_trait]
        impl CommandExt for Command {
            fn get_flags(&self) -> CommandFlags {
                match self {
                    $( Command::$variant(cmd) => cmd.flags(), )+
                    Command::Multi | Command::Exec | Command::Discard => {
                        CommandFlags::TRANSACTION
                    }
                }
            }

            fn get_keys(&self) -> Vec<Bytes> {
                match self {
                    $( Command::$variant(cmd) => cmd.get_keys(), )+
                    Command::Multi | Command::Exec | Command::Discard => Vec::new(),
                }
            }

            async fn execute<'a>(
                &self,
                ctx: &mut ExecutionContext<'a>,
            ) -> Result<RespValue, CitrineError> {
                match self {
                    $( Command::$variant(cmd) => cmd.execute(ctx).await, )+
                    Command::Multi | Command::Exec | Command::Discard => {
                        Err(CitrineError::Internal(
                            "transaction control commands are routed separately".to_string(),
                        ))
                    }
                }
            }
        }
    };
}

/// Accepts a command that takes no arguments at all.
fn parse_bare(
    args: &[RespFrame],
    name: &str,
    command: Command,
) -> Result<Command, CitrineError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CitrineError::WrongArgumentCount(name.to_string()))
    }
}

define_commands! {
    // --- Generic Commands ---
    (Ping, generic::Ping, "ping"),
    (Echo, generic::Echo, "echo"),
    (Del, generic::Del, "del"),
    (Exists, generic::Exists, "exists"),
    (Expire, generic::Expire, "expire"),
    (PExpire, generic::PExpire, "pexpire"),
    (Ttl, generic::Ttl, "ttl"),
    (Pttl, generic::Pttl, "pttl"),
    (Persist, generic::Persist, "persist"),
    (Type, generic::TypeInfo, "type"),
    (DbSize, generic::DbSize, "dbsize"),
    (Quit, generic::Quit, "quit"),

    // --- String Commands ---
    (Get, string::Get, "get"),
    (Set, string::Set, "set"),
    (Incr, string::Incr, "incr"),
    (IncrBy, string::IncrBy, "incrby"),
    (Decr, string::Decr, "decr"),

    // --- List Commands ---
    (LPush, list::LPush, "lpush"),
    (RPush, list::RPush, "rpush"),
    (LPop, list::LPop, "lpop"),
    (RPop, list::RPop, "rpop"),
    (LLen, list::LLen, "llen"),
    (LRange, list::LRange, "lrange"),
    (BLPop, list::BLPop, "blpop"),
    (BRPop, list::BRPop, "brpop"),

    // --- Hash Commands ---
    (HSet, hash::HSet, "hset"),
    (HGet, hash::HGet, "hget"),
    (HGetAll, hash::HGetAll, "hgetall"),
    (HDel, hash::HDel, "hdel"),
    (HLen, hash::HLen, "hlen"),
    (HExists, hash::HExists, "hexists"),

    // --- Set Commands ---
    (Sadd, set::Sadd, "sadd"),
    (Srem, set::Srem, "srem"),
    (Smembers, set::Smembers, "smembers"),
    (Sismember, set::Sismember, "sismember"),
    (Scard, set::Scard, "scard"),

    // --- Sorted Set Commands ---
    (Zadd, zset::Zadd, "zadd"),
    (Zrem, zset::Zrem, "zrem"),
    (ZScore, zset::ZScore, "zscore"),
    (ZCard, zset::ZCard, "zcard"),
    (ZRange, zset::ZRange, "zrange"),

    // --- Stream Commands ---
    (XAdd, streams::XAdd, "xadd"),
    (XRange, streams::XRange, "xrange"),
    (XLen, streams::XLen, "xlen"),
    (XRead, streams::XRead, "xread"),
}
