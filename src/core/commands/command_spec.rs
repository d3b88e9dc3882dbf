// src/core/commands/command_spec.rs

//! Defines the `CommandSpec` trait describing each command's static shape.

use crate::core::commands::command_trait::CommandFlags;
use bytes::Bytes;

/// Static metadata about a command: its name, arity and key positions.
///
/// Arity follows the usual convention: a positive value is an exact argument
/// count (command name included), a negative value `-N` means "at least N".
pub trait CommandSpec {
    fn name(&self) -> &'static str;
    fn arity(&self) -> i64;
    fn flags(&self) -> CommandFlags;
    fn get_keys(&self) -> Vec<Bytes>;
}
