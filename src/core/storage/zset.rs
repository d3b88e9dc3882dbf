// src/core/storage/zset.rs

//! The sorted-set container: a member-to-score map plus a secondary index
//! ordered by `(score, member)` for ranged scans.

use bytes::Bytes;
use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    members: HashMap<Bytes, f64>,
    index: BTreeSet<(OrderedFloat<f64>, Bytes)>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Inserts or updates a member. Returns `true` if the member was new.
    pub fn insert(&mut self, score: f64, member: Bytes) -> bool {
        if let Some(old_score) = self.members.insert(member.clone(), score) {
            self.index.remove(&(OrderedFloat(old_score), member.clone()));
            self.index.insert((OrderedFloat(score), member));
            false
        } else {
            self.index.insert((OrderedFloat(score), member));
            true
        }
    }

    /// Removes a member, returning `true` if it was present.
    pub fn remove(&mut self, member: &Bytes) -> bool {
        if let Some(score) = self.members.remove(member) {
            self.index.remove(&(OrderedFloat(score), member.clone()));
            true
        } else {
            false
        }
    }

    pub fn score(&self, member: &Bytes) -> Option<f64> {
        self.members.get(member).copied()
    }

    /// Returns members between two ranks, inclusive. Negative indices count
    /// from the end; out-of-range bounds are clamped.
    pub fn range_by_rank(&self, start: i64, stop: i64) -> Vec<(Bytes, f64)> {
        let len = self.members.len() as i64;
        if len == 0 {
            return Vec::new();
        }
        let start = (if start < 0 { len + start } else { start }).max(0);
        let stop = (if stop < 0 { len + stop } else { stop }).min(len - 1);
        if start > stop {
            return Vec::new();
        }
        self.index
            .iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .map(|(score, member)| (member.clone(), score.into_inner()))
            .collect()
    }
}
