//! Write Order Module
//!
//! Tracks entries by write time for capacity eviction.

use std::collections::BTreeMap;

use tokio::time::Instant;

// == Write Order ==
/// Index of keys ordered by `(written_at, seq)`.
///
/// The first position is the least-recently-written key. Reads never
/// change the order; only writes do. Equal write instants are ordered by
/// sequence number, so the earlier write is evicted first.
#[derive(Debug, Default)]
pub struct WriteOrder {
    order: BTreeMap<(Instant, u64), String>,
}

impl WriteOrder {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    // == Record ==
    /// Records a write of `key` at `position`.
    ///
    /// The caller removes the key's previous position first when overwriting.
    pub fn record(&mut self, key: &str, position: (Instant, u64)) {
        self.order.insert(position, key.to_string());
    }

    // == Remove ==
    /// Removes the key recorded at `position`.
    pub fn remove(&mut self, position: (Instant, u64)) -> Option<String> {
        self.order.remove(&position)
    }

    // == Pop Oldest ==
    /// Returns and removes the least-recently-written key.
    ///
    /// Returns None if the index is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the least-recently-written key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
