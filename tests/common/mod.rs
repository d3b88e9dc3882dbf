// tests/common/mod.rs

//! Shared helpers for driving commands against an in-process server state,
//! mirroring what the connection handler does on the wire.

#![allow(dead_code)]

use bytes::Bytes;
use citrinedb::config::Config;
use citrinedb::connection::SessionState;
use citrinedb::core::handler::command_router::Router;
use citrinedb::core::protocol::RespFrame;
use citrinedb::core::state::ServerState;
use citrinedb::core::{CitrineError, Command, RespValue};
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds a fresh server state with default configuration. The expiry reaper
/// is not running; tests that need it spawn one themselves.
pub fn test_state() -> Arc<ServerState> {
    ServerState::initialize(Config::default()).state
}

/// Builds a multi-bulk request frame the way a client would send it.
pub fn request(parts: &[&str]) -> RespFrame {
    RespFrame::Array(
        parts
            .iter()
            .map(|p| RespFrame::BulkString(Bytes::copy_from_slice(p.as_bytes())))
            .collect(),
    )
}

/// Parses and routes one command for a session, replicating the connection
/// handler's dispatch (including transaction poisoning on parse failures).
pub async fn run_cmd(
    state: &Arc<ServerState>,
    session_id: u64,
    session: &mut SessionState,
    parts: &[&str],
) -> Result<RespValue, CitrineError> {
    let command = match Command::try_from(request(parts)) {
        Ok(command) => command,
        Err(e) => {
            if session.is_in_transaction {
                state.db.poison_transaction(session_id);
            }
            return Err(e);
        }
    };
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    Router::new(state.clone(), session_id, addr, session)
        .route(command)
        .await
}

/// One-session convenience wrapper for tests that don't care about
/// transactions.
pub async fn run_simple(
    state: &Arc<ServerState>,
    parts: &[&str],
) -> Result<RespValue, CitrineError> {
    let mut session = SessionState::default();
    run_cmd(state, 1, &mut session, parts).await
}

pub fn bulk(s: &str) -> RespValue {
    RespValue::BulkString(Bytes::copy_from_slice(s.as_bytes()))
}

pub fn simple(s: &str) -> RespValue {
    RespValue::SimpleString(s.to_string())
}
