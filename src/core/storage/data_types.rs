// src/core/storage/data_types.rs

//! Defines the core data structures for storing values in the database,
//! such as `StoredValue` and the `DataValue` enum.

use crate::core::CitrineError;
use crate::core::storage::stream::Stream;
use crate::core::storage::zset::SortedSet;
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

/// Deadlines further out than this are clamped; `Instant` arithmetic must not
/// overflow on absurd TTL requests.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// A wrapper for all values stored in the database, pairing the data with its
/// optional absolute expiration deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    pub data: DataValue,
    /// The instant at which the value becomes invisible and eligible for reaping.
    pub expiry: Option<Instant>,
}

impl StoredValue {
    /// Creates a new `StoredValue` without an expiration deadline.
    pub fn new(data: DataValue) -> Self {
        Self { data, expiry: None }
    }

    /// Creates a new `StoredValue` expiring after `ttl`.
    pub fn with_ttl(data: DataValue, ttl: Duration) -> Self {
        Self {
            data,
            expiry: Some(Instant::now() + ttl.min(MAX_TTL)),
        }
    }

    /// Checks whether the deadline has passed. Every access path must treat an
    /// expired entry as absent and remove it before returning.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= Instant::now())
    }

    /// Calculates the remaining time-to-live in seconds.
    pub fn remaining_ttl_secs(&self) -> Option<u64> {
        self.expiry
            .and_then(|expiry| expiry.checked_duration_since(Instant::now()))
            .map(|d| d.as_secs())
    }

    /// Calculates the remaining time-to-live in milliseconds.
    pub fn remaining_ttl_ms(&self) -> Option<i64> {
        self.expiry
            .and_then(|expiry| expiry.checked_duration_since(Instant::now()))
            .map(|d| d.as_millis() as i64)
    }
}

/// An enum representing the different data kinds that can be stored.
///
/// The kind of an entry is stable for its whole lifetime: changing the kind of
/// a key requires deleting and re-creating it.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    String(Bytes),
    List(VecDeque<Bytes>),
    Hash(IndexMap<Bytes, Bytes>),
    Set(HashSet<Bytes>),
    SortedSet(SortedSet),
    Stream(Stream),
}

impl DataValue {
    /// The kind name as reported by the `TYPE` command.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::String(_) => "string",
            DataValue::List(_) => "list",
            DataValue::Hash(_) => "hash",
            DataValue::Set(_) => "set",
            DataValue::SortedSet(_) => "zset",
            DataValue::Stream(_) => "stream",
        }
    }

    pub fn as_string(&self) -> Result<&Bytes, CitrineError> {
        match self {
            DataValue::String(b) => Ok(b),
            _ => Err(CitrineError::WrongType),
        }
    }

    pub fn as_list(&self) -> Result<&VecDeque<Bytes>, CitrineError> {
        match self {
            DataValue::List(l) => Ok(l),
            _ => Err(CitrineError::WrongType),
        }
    }

    pub fn as_hash(&self) -> Result<&IndexMap<Bytes, Bytes>, CitrineError> {
        match self {
            DataValue::Hash(h) => Ok(h),
            _ => Err(CitrineError::WrongType),
        }
    }

    pub fn as_set(&self) -> Result<&HashSet<Bytes>, CitrineError> {
        match self {
            DataValue::Set(s) => Ok(s),
            _ => Err(CitrineError::WrongType),
        }
    }

    pub fn as_zset(&self) -> Result<&SortedSet, CitrineError> {
        match self {
            DataValue::SortedSet(z) => Ok(z),
            _ => Err(CitrineError::WrongType),
        }
    }

    pub fn as_stream(&self) -> Result<&Stream, CitrineError> {
        match self {
            DataValue::Stream(s) => Ok(s),
            _ => Err(CitrineError::WrongType),
        }
    }
}
