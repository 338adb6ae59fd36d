#![forbid(unsafe_code)]

//! Bounded FIFO evidence ledger for solver decision audit trails.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Bounded FIFO evidence buffer recording solver decisions.
///
/// Capacity is enforced via `capacity.max(1)`, so at least one entry is kept.
/// When full, the oldest entry (front of `VecDeque`) is evicted before
/// a new entry is appended. The number of evicted entries is tracked so a
/// reader can tell a truncated history from a complete one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceLedger<T> {
    capacity: usize,
    entries: VecDeque<T>,
    evicted: usize,
}

impl<T> EvidenceLedger<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
            evicted: 0,
        }
    }

    /// Append an entry, evicting the oldest if at capacity.
    pub fn record(&mut self, entry: T) {
        if self.entries.len() == self.capacity {
            let _ = self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recently recorded entry.
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries dropped from the front because the ledger was full.
    #[must_use]
    pub const fn evicted(&self) -> usize {
        self.evicted
    }

    /// Retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Serialize> EvidenceLedger<T> {
    /// Serialize retained entries as JSON lines, oldest first.
    #[must_use]
    pub fn serialize_jsonl(&self) -> String {
        self.entries
            .iter()
            .filter_map(|entry| serde_json::to_string(entry).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
