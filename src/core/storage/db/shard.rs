// src/core/storage/db/shard.rs

//! Defines the `DbShard` and `ShardMap` structs, the fundamental storage
//! units within a `Db`.

use crate::core::storage::data_types::StoredValue;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A `DbShard` is a single, concurrent slice of the database. Holding the
/// shard's mutex is the per-key exclusive section for every key it owns.
#[derive(Debug)]
pub struct DbShard {
    /// The actual key-value store, protected by a Mutex for exclusive access.
    pub entries: Mutex<ShardMap>,
    /// An atomic counter for the number of live keys in this shard.
    pub key_count: Arc<AtomicUsize>,
}

impl DbShard {
    pub(super) fn new() -> Self {
        let key_count = Arc::new(AtomicUsize::new(0));
        Self {
            entries: Mutex::new(ShardMap::new(key_count.clone())),
            key_count,
        }
    }
}

/// A `ShardMap` wraps the underlying map and keeps the shard's key counter
/// accurate across every insertion and removal path.
#[derive(Debug)]
pub struct ShardMap {
    store: HashMap<Bytes, StoredValue>,
    key_counter: Arc<AtomicUsize>,
}

impl ShardMap {
    fn new(key_counter: Arc<AtomicUsize>) -> Self {
        Self {
            store: HashMap::new(),
            key_counter,
        }
    }

    /// Inserts a key-value pair, returning the old value if the key existed.
    pub fn put(&mut self, key: Bytes, value: StoredValue) -> Option<StoredValue> {
        let old_value = self.store.insert(key, value);
        if old_value.is_none() {
            self.key_counter.fetch_add(1, Ordering::Relaxed);
        }
        old_value
    }

    /// Removes a key, returning the value if the key was present.
    pub fn pop(&mut self, key: &Bytes) -> Option<StoredValue> {
        let popped = self.store.remove(key);
        if popped.is_some() {
            self.key_counter.fetch_sub(1, Ordering::Relaxed);
        }
        popped
    }

    /// Removes and returns the value only if it is still live. An entry whose
    /// deadline has passed is removed and reported as absent.
    pub fn pop_live(&mut self, key: &Bytes) -> Option<StoredValue> {
        self.pop(key).filter(|value| !value.is_expired())
    }

    /// Gets an immutable reference to a value without expiry handling.
    pub fn peek(&self, key: &Bytes) -> Option<&StoredValue> {
        self.store.get(key)
    }
}
