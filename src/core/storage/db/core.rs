// src/core/storage/db/core.rs

use super::shard::DbShard;
use super::transaction::TransactionState;
use crate::core::storage::data_types::{DataValue, StoredValue};
use bytes::Bytes;
use dashmap::DashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// The number of shards the keyspace is split into.
pub const NUM_SHARDS: usize = 16;

/// Which end of a list a push operation targets.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PushDirection {
    Left,
    Right,
}

/// Which end of a list a pop operation targets.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum PopDirection {
    Left,
    Right,
}

/// `Db` is the keyspace: a sharded map from key to stored value, plus the
/// per-session transaction queues and the channel feeding the expiry reaper.
///
/// All mutations funnel through [`Db::compute`], which holds the owning
/// shard's mutex for the duration of the read-modify-write.
#[derive(Debug)]
pub struct Db {
    shards: Vec<Arc<DbShard>>,
    /// The state of ongoing transactions, keyed by session ID.
    pub tx_states: Arc<DashMap<u64, TransactionState>>,
    expiry_tx: mpsc::UnboundedSender<(Bytes, Instant)>,
}

impl Db {
    /// Creates a new keyspace. The returned receiver feeds deadline
    /// registrations to the expiry reaper task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(Bytes, Instant)>) {
        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let shards = (0..NUM_SHARDS).map(|_| Arc::new(DbShard::new())).collect();
        let db = Self {
            shards,
            tx_states: Arc::new(DashMap::new()),
            expiry_tx,
        };
        (db, expiry_rx)
    }

    /// Calculates the shard index for a given key using hashing.
    fn shard_index(&self, key: &Bytes) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % NUM_SHARDS
    }

    fn shard_for(&self, key: &Bytes) -> &Arc<DbShard> {
        &self.shards[self.shard_index(key)]
    }

    /// Returns the total number of keys in the keyspace. O(1) complexity.
    pub fn key_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.key_count.load(Ordering::Relaxed))
            .sum()
    }

    /// The atomic read-modify-write primitive underpinning every mutation.
    ///
    /// The closure receives the current live value (expired entries are
    /// removed first and presented as absent). Returning `None` deletes the
    /// key; returning `Some` stores the value. The owning shard's mutex is
    /// held across the whole exchange.
    pub async fn compute<R>(
        &self,
        key: &Bytes,
        f: impl FnOnce(Option<StoredValue>) -> (Option<StoredValue>, R),
    ) -> R {
        let shard = self.shard_for(key);
        let mut map = shard.entries.lock().await;
        let current = map.pop_live(key);
        let (next, out) = f(current);
        if let Some(value) = next {
            map.put(key.clone(), value);
        }
        out
    }

    /// Runs a read-only closure against the current live value, lazily
    /// removing the entry first if its deadline has passed.
    pub async fn view<R>(&self, key: &Bytes, f: impl FnOnce(Option<&StoredValue>) -> R) -> R {
        let shard = self.shard_for(key);
        let mut map = shard.entries.lock().await;
        if map.peek(key).is_some_and(|v| v.is_expired()) {
            map.pop(key);
        }
        f(map.peek(key))
    }

    /// Returns a snapshot of the live value for a key.
    pub async fn get(&self, key: &Bytes) -> Option<StoredValue> {
        self.view(key, |entry| entry.cloned()).await
    }

    /// Stores a value unconditionally, replacing any previous entry and its
    /// deadline. A TTL registers the new deadline with the reaper.
    pub async fn put(&self, key: Bytes, data: DataValue, ttl: Option<Duration>) {
        let value = match ttl {
            Some(ttl) => StoredValue::with_ttl(data, ttl),
            None => StoredValue::new(data),
        };
        let deadline = value.expiry;
        {
            let mut map = self.shard_for(&key).entries.lock().await;
            map.put(key.clone(), value);
        }
        if let Some(when) = deadline {
            self.register_expiry(&key, when);
        }
    }

    /// Removes a key, reporting whether a live entry existed.
    pub async fn remove(&self, key: &Bytes) -> bool {
        let mut map = self.shard_for(key).entries.lock().await;
        map.pop_live(key).is_some()
    }

    /// Removes several keys, counting the distinct live keys that existed.
    pub async fn remove_many(&self, keys: &[Bytes]) -> u64 {
        let mut count = 0;
        for key in keys {
            if self.remove(key).await {
                count += 1;
            }
        }
        count
    }

    /// Removes a key only if its deadline still equals `deadline`. Used by the
    /// expiry reaper to skip registrations made stale by later overwrites.
    pub async fn remove_if_deadline(&self, key: &Bytes, deadline: Instant) -> bool {
        let mut map = self.shard_for(key).entries.lock().await;
        if map.peek(key).is_some_and(|v| v.expiry == Some(deadline)) {
            map.pop(key);
            true
        } else {
            false
        }
    }

    /// Registers a deadline with the expiry reaper. A no-op when the reaper
    /// is not running (e.g. in engine-level tests relying on lazy expiry).
    pub fn register_expiry(&self, key: &Bytes, when: Instant) {
        let _ = self.expiry_tx.send((key.clone(), when));
    }
}

impl Db {
    /// Pops one element from a list key on the given side. The key is deleted
    /// when the pop drains it. Used by the pop commands and the blocking
    /// waiter registry.
    pub async fn list_pop(
        &self,
        key: &Bytes,
        side: PopDirection,
    ) -> Result<Option<Bytes>, crate::core::CitrineError> {
        self.compute(key, |current| {
            let Some(mut value) = current else {
                return (None, Ok(None));
            };
            let DataValue::List(list) = &mut value.data else {
                return (Some(value), Err(crate::core::CitrineError::WrongType));
            };
            let popped = match side {
                PopDirection::Left => list.pop_front(),
                PopDirection::Right => list.pop_back(),
            };
            if list.is_empty() {
                (None, Ok(popped))
            } else {
                (Some(value), Ok(popped))
            }
        })
        .await
    }

    /// Returns an element to the edge of a list it was popped from. Used by
    /// the blocking waiter registry when a delivery loses its race.
    pub async fn list_unpop(&self, key: &Bytes, side: PopDirection, element: Bytes) {
        self.compute(key, |current| {
            let mut value =
                current.unwrap_or_else(|| StoredValue::new(DataValue::List(Default::default())));
            if let DataValue::List(list) = &mut value.data {
                match side {
                    PopDirection::Left => list.push_front(element),
                    PopDirection::Right => list.push_back(element),
                }
            }
            (Some(value), ())
        })
        .await
    }
}
