// src/core/errors.rs

//! Defines the primary error type for the entire application.
//!
//! Command errors are values, not panics: every variant's `Display` output is
//! the exact message written to the client, including the RESP error code
//! prefix (`ERR`, `WRONGTYPE`, `EXECABORT`).

use std::num::{ParseFloatError, ParseIntError};
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
#[derive(Error, Debug)]
pub enum CitrineError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("ERR Protocol error: {0}")]
    ProtocolError(String),

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR value is not a valid float")]
    NotAFloat,

    #[error("ERR The ID specified in XADD is equal or smaller than the target stream top item")]
    StreamIdTooSmall,

    #[error("ERR The ID specified in XADD must be greater than 0-0")]
    StreamIdZero,

    #[error("ERR Invalid stream ID specified as stream command argument")]
    InvalidStreamId,

    #[error("ERR MULTI calls can not be nested")]
    NestedMulti,

    #[error("ERR EXEC without MULTI")]
    ExecWithoutMulti,

    #[error("ERR DISCARD without MULTI")]
    DiscardWithoutMulti,

    #[error("EXECABORT Transaction discarded because of previous errors.")]
    ExecAborted,

    #[error("ERR internal error: {0}")]
    Internal(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// The Arc wrapper makes the clone cheap and shared.
impl Clone for CitrineError {
    fn clone(&self) -> Self {
        match self {
            CitrineError::Io(e) => CitrineError::Io(Arc::clone(e)),
            CitrineError::IncompleteData => CitrineError::IncompleteData,
            CitrineError::ProtocolError(s) => CitrineError::ProtocolError(s.clone()),
            CitrineError::UnknownCommand(s) => CitrineError::UnknownCommand(s.clone()),
            CitrineError::SyntaxError => CitrineError::SyntaxError,
            CitrineError::WrongArgumentCount(s) => CitrineError::WrongArgumentCount(s.clone()),
            CitrineError::WrongType => CitrineError::WrongType,
            CitrineError::NotAnInteger => CitrineError::NotAnInteger,
            CitrineError::NotAFloat => CitrineError::NotAFloat,
            CitrineError::StreamIdTooSmall => CitrineError::StreamIdTooSmall,
            CitrineError::StreamIdZero => CitrineError::StreamIdZero,
            CitrineError::InvalidStreamId => CitrineError::InvalidStreamId,
            CitrineError::NestedMulti => CitrineError::NestedMulti,
            CitrineError::ExecWithoutMulti => CitrineError::ExecWithoutMulti,
            CitrineError::DiscardWithoutMulti => CitrineError::DiscardWithoutMulti,
            CitrineError::ExecAborted => CitrineError::ExecAborted,
            CitrineError::Internal(s) => CitrineError::Internal(s.clone()),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for CitrineError {
    fn from(e: std::io::Error) -> Self {
        CitrineError::Io(Arc::new(e))
    }
}

impl From<ParseIntError> for CitrineError {
    fn from(_: ParseIntError) -> Self {
        CitrineError::NotAnInteger
    }
}

impl From<ParseFloatError> for CitrineError {
    fn from(_: ParseFloatError) -> Self {
        CitrineError::NotAFloat
    }
}
