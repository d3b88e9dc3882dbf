// src/core/storage/expiry.rs

//! The active expiration reaper.
//!
//! Deadline registrations arrive over a channel from the keyspace and are
//! kept in a min-heap ordered by `(deadline, key)`. The reaper sleeps until
//! the earliest deadline, then removes the key only if the live entry's
//! deadline still matches the registration; overwrites and deletions leave
//! stale heap entries behind, which are detected and skipped at pop time.
//!
//! Lazy expiration on access remains mandatory everywhere; this task only
//! bounds how long an untouched expired key can linger.

use crate::core::storage::db::Db;
use bytes::Bytes;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

pub struct ExpiryManager {
    db: Arc<Db>,
    registrations: mpsc::UnboundedReceiver<(Bytes, Instant)>,
    deadlines: BinaryHeap<Reverse<(Instant, Bytes)>>,
}

impl ExpiryManager {
    pub fn new(db: Arc<Db>, registrations: mpsc::UnboundedReceiver<(Bytes, Instant)>) -> Self {
        Self {
            db,
            registrations,
            deadlines: BinaryHeap::new(),
        }
    }

    /// Runs the main loop for the expiration reaper.
    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Expiration reaper started (deadline heap).");
        loop {
            let next_deadline = self.deadlines.peek().map(|Reverse((when, _))| *when);
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Expiration reaper shutting down.");
                    return;
                }
                registration = self.registrations.recv() => {
                    match registration {
                        Some((key, when)) => self.deadlines.push(Reverse((when, key))),
                        // The keyspace is gone; nothing left to reap.
                        None => return,
                    }
                }
                _ = sleep_until_deadline(next_deadline) => {
                    self.reap_due().await;
                }
            }
        }
    }

    /// Removes every key whose registered deadline has arrived, skipping
    /// registrations that no longer match the live entry.
    async fn reap_due(&mut self) {
        let now = Instant::now();
        let mut reaped = 0u64;
        while let Some(Reverse((when, _))) = self.deadlines.peek() {
            if *when > now {
                break;
            }
            let Reverse((when, key)) = self.deadlines.pop().expect("peeked entry must exist");
            if self.db.remove_if_deadline(&key, when).await {
                reaped += 1;
            }
        }
        if reaped > 0 {
            debug!("Reaped {} expired keys.", reaped);
        }
    }
}

/// Sleeps until the given deadline, or forever when no deadline is pending.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(when) => tokio::time::sleep_until(tokio::time::Instant::from_std(when)).await,
        None => std::future::pending().await,
    }
}
