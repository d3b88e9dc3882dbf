// src/core/storage/stream.rs

//! The stream container and its 128-bit ordered entry identifier.

use crate::core::CitrineError;
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

// --- Stream ID ---

/// A stream entry identifier: wall-clock milliseconds plus a sub-millisecond
/// sequence number, totally ordered by the `(ms, seq)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Default)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u64::MAX,
    };

    pub fn new(ms: u64, seq: u64) -> Self {
        Self { ms, seq }
    }

    /// Parses `"ms-seq"` or a bare `"ms"`, filling in `default_seq` for the
    /// missing sequence part. Range lower bounds default the sequence to 0,
    /// upper bounds to `u64::MAX`.
    pub fn parse_with_default(s: &str, default_seq: u64) -> Result<Self, CitrineError> {
        match s.split_once('-') {
            Some((ms, seq)) => {
                let ms = ms.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                let seq = seq.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                Ok(StreamId::new(ms, seq))
            }
            None => {
                let ms = s.parse().map_err(|_| CitrineError::InvalidStreamId)?;
                Ok(StreamId::new(ms, default_seq))
            }
        }
    }
}

impl FromStr for StreamId {
    type Err = CitrineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreamId::parse_with_default(s, 0)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

/// The identifier requested by an `XADD` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryIdSpec {
    /// `*`: both parts are generated.
    Auto,
    /// `ms-*`: the caller pins the millisecond part, the sequence is generated.
    AutoSeq(u64),
    /// An explicit `ms-seq` pair.
    Explicit(StreamId),
}

impl EntryIdSpec {
    /// Parses an `XADD` id argument (`*`, `ms-*`, `ms-seq`, or bare `ms`).
    pub fn parse(s: &str) -> Result<Self, CitrineError> {
        if s == "*" {
            return Ok(EntryIdSpec::Auto);
        }
        if let Some((ms, seq)) = s.split_once('-') {
            let ms: u64 = ms.parse().map_err(|_| CitrineError::InvalidStreamId)?;
            if seq == "*" {
                return Ok(EntryIdSpec::AutoSeq(ms));
            }
            let seq: u64 = seq.parse().map_err(|_| CitrineError::InvalidStreamId)?;
            return Ok(EntryIdSpec::Explicit(StreamId::new(ms, seq)));
        }
        let ms: u64 = s.parse().map_err(|_| CitrineError::InvalidStreamId)?;
        Ok(EntryIdSpec::Explicit(StreamId::new(ms, 0)))
    }
}

// --- Stream Entry ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: IndexMap<Bytes, Bytes>,
}

// --- Main Stream Struct ---

/// An ordered mapping from `StreamId` to entries. Stored ids are strictly
/// increasing in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stream {
    pub entries: BTreeMap<StreamId, StreamEntry>,
    pub last_generated_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a new entry, resolving the id spec against the stream's last
    /// generated id. Monotonicity is enforced here: whatever id comes out is
    /// strictly greater than every id already stored.
    pub fn add_entry(
        &mut self,
        id_spec: EntryIdSpec,
        fields: IndexMap<Bytes, Bytes>,
    ) -> Result<StreamId, CitrineError> {
        let new_id = self.resolve_id(id_spec)?;
        self.entries.insert(new_id, StreamEntry { id: new_id, fields });
        self.last_generated_id = new_id;
        Ok(new_id)
    }

    fn resolve_id(&self, id_spec: EntryIdSpec) -> Result<StreamId, CitrineError> {
        let last = self.last_generated_id;
        let id = match id_spec {
            EntryIdSpec::Auto => {
                let now_ms = wall_clock_ms();
                if now_ms > last.ms {
                    StreamId::new(now_ms, 0)
                } else {
                    StreamId::new(last.ms, last.seq + 1)
                }
            }
            EntryIdSpec::AutoSeq(ms) => {
                if ms < last.ms {
                    return Err(CitrineError::StreamIdTooSmall);
                }
                let seq = if ms > last.ms { 0 } else { last.seq + 1 };
                StreamId::new(ms, seq)
            }
            EntryIdSpec::Explicit(id) => {
                if id == StreamId::MIN {
                    return Err(CitrineError::StreamIdZero);
                }
                if !self.entries.is_empty() && id <= last {
                    return Err(CitrineError::StreamIdTooSmall);
                }
                id
            }
        };
        Ok(id)
    }
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
