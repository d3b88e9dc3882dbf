// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use crate::config::Config;
use crate::core::blocking::BlockerManager;
use crate::core::storage::db::Db;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Contains the initialized shared state plus the channel ends consumed by
/// background tasks. Created once at startup and taken apart by the spawner.
pub struct ServerInit {
    /// The fully initialized, shared server state.
    pub state: Arc<ServerState>,
    /// Feeds deadline registrations to the expiry reaper task.
    pub expiry_rx: mpsc::UnboundedReceiver<(Bytes, Instant)>,
}

/// The central struct holding all shared, server-wide state.
///
/// Wrapped in an `Arc` and passed to every connection handler and background
/// task; there is no ambient global state anywhere in the server.
#[derive(Debug)]
pub struct ServerState {
    /// The keyspace.
    pub db: Arc<Db>,
    /// Manages clients blocked on list commands (`BLPOP`, `BRPOP`).
    pub blocker_manager: Arc<BlockerManager>,
    /// The server's configuration, fixed after startup.
    pub config: Config,
}

impl ServerState {
    /// Initializes the shared server state from the given configuration.
    pub fn initialize(config: Config) -> ServerInit {
        let (db, expiry_rx) = Db::new();
        let state = Arc::new(Self {
            db: Arc::new(db),
            blocker_manager: Arc::new(BlockerManager::new()),
            config,
        });
        ServerInit { state, expiry_rx }
    }
}
