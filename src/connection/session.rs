// src/connection/session.rs

//! Defines the state associated with a single client session.

/// Holds the state specific to a single client session. One connection is one
/// logical client and owns exactly one transaction context.
#[derive(Debug, Default)]
pub struct SessionState {
    /// True while the client is within a `MULTI`/`EXEC` block.
    pub is_in_transaction: bool,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}
