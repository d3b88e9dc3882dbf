// src/core/commands/helpers.rs

//! Provides helper functions for parsing command arguments from `RespFrame`s.
//! These helpers reduce boilerplate and ensure consistent error handling.

use crate::core::CitrineError;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// Extracts a `String` from a `RespFrame::BulkString`.
/// Returns a `WrongType` error if the frame is not a BulkString or not valid UTF-8.
pub fn extract_string(frame: &RespFrame) -> Result<String, CitrineError> {
    if let RespFrame::BulkString(bs) = frame {
        String::from_utf8(bs.to_vec()).map_err(|_| CitrineError::WrongType)
    } else {
        Err(CitrineError::WrongType)
    }
}

/// Extracts `Bytes` from a `RespFrame::BulkString`.
/// Returns a `WrongType` error if the frame is not a BulkString.
pub fn extract_bytes(frame: &RespFrame) -> Result<Bytes, CitrineError> {
    match frame {
        RespFrame::BulkString(bs) => Ok(bs.clone()),
        _ => Err(CitrineError::WrongType),
    }
}

/// Validates that the number of arguments matches an exact expected count.
pub fn validate_arg_count(
    args: &[RespFrame],
    expected: usize,
    cmd: &str,
) -> Result<(), CitrineError> {
    if args.len() != expected {
        Err(CitrineError::WrongArgumentCount(cmd.to_string()))
    } else {
        Ok(())
    }
}

/// Parses arguments for commands that follow the pattern `COMMAND key value1 [value2 ...]`.
pub fn parse_key_and_values(
    args: &[RespFrame],
    min_args: usize,
    cmd: &str,
) -> Result<(Bytes, Vec<Bytes>), CitrineError> {
    if args.len() < min_args {
        return Err(CitrineError::WrongArgumentCount(cmd.to_string()));
    }
    let key = extract_bytes(&args[0])?;
    let values = args[1..]
        .iter()
        .map(extract_bytes)
        .collect::<Result<_, _>>()?;
    Ok((key, values))
}

/// Parses arguments for commands that follow the pattern
/// `COMMAND key field1 value1 [field2 value2 ...]`.
pub fn parse_key_and_field_value_pairs(
    args: &[RespFrame],
    cmd: &str,
) -> Result<(Bytes, Vec<(Bytes, Bytes)>), CitrineError> {
    if args.len() < 3 || args.len() % 2 != 1 {
        return Err(CitrineError::WrongArgumentCount(cmd.to_string()));
    }
    let key = extract_bytes(&args[0])?;
    let fields = args[1..]
        .chunks_exact(2)
        .map(|chunk| -> Result<(Bytes, Bytes), CitrineError> {
            Ok((extract_bytes(&chunk[0])?, extract_bytes(&chunk[1])?))
        })
        .collect::<Result<_, _>>()?;
    Ok((key, fields))
}

/// Parses a signed integer argument, mapping failures to `NotAnInteger`.
pub fn parse_int_arg(frame: &RespFrame) -> Result<i64, CitrineError> {
    extract_string(frame)?
        .parse()
        .map_err(|_| CitrineError::NotAnInteger)
}
