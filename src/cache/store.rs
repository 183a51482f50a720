//! Cache Store Module
//!
//! Synchronous cache storage: HashMap entries, a write-order index for
//! capacity eviction, lazy TTL expiration, and refresh bookkeeping.

use std::collections::{HashMap, HashSet};

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats, RefreshStatus, WriteOrder};
use crate::config::CacheConfig;
use crate::error::Result;

// == Lookup ==
/// Result of reading one key.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// Key not present
    Miss,
    /// Key was present but expired; the entry has been removed
    Expired,
    /// Key present and valid
    Hit {
        value: T,
        /// Sequence number of the entry that was read
        seq: u64,
        /// Remaining lifetime is under the refresh threshold
        refresh_due: bool,
    },
}

impl<T> Lookup<T> {
    /// Drops the refresh metadata, keeping only the value.
    pub fn into_value(self) -> Option<T> {
        match self {
            Lookup::Hit { value, .. } => Some(value),
            Lookup::Miss | Lookup::Expired => None,
        }
    }
}

// == Cache Store ==
/// Cache storage with write-order eviction and TTL support.
///
/// Not synchronized; `RefreshCache` wraps it in a lock for shared use.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Keys ordered by write time
    order: WriteOrder,
    /// Keys with a background refresh outstanding (single-flight only)
    refreshing: HashSet<String>,
    /// Performance statistics
    stats: CacheStats,
    /// Engine settings
    config: CacheConfig,
    /// Next write sequence number
    next_seq: u64,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates a new CacheStore after validating `config`.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: HashMap::new(),
            order: WriteOrder::new(),
            refreshing: HashSet::new(),
            stats: CacheStats::new(),
            config,
            next_seq: 0,
        })
    }

    // == Put ==
    /// Stores a value, fully replacing any previous entry for `key`.
    ///
    /// When the store is full and `key` is new, the least-recently-written
    /// entry is evicted first. Returns the evicted key, if any.
    pub fn put(&mut self, key: String, value: T) -> Option<String> {
        self.put_at(key, value, Instant::now())
    }

    pub(crate) fn put_at(&mut self, key: String, value: T, now: Instant) -> Option<String> {
        let mut evicted = None;

        if let Some(previous) = self.entries.get(&key) {
            self.order.remove(previous.order_key());
        } else if self.entries.len() >= self.config.capacity {
            if let Some(oldest) = self.order.pop_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                evicted = Some(oldest);
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = CacheEntry::new(value, self.config.ttl, now, seq);
        self.order.record(&key, entry.order_key());
        self.entries.insert(key, entry);

        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Put If Current ==
    /// Stores a refreshed value only if `key` still holds the write `seq`.
    ///
    /// Returns false, leaving the store unchanged, when the entry was
    /// cleared, evicted, expired away or overwritten since that write.
    pub fn put_if_current(&mut self, key: &str, seq: u64, value: T) -> bool {
        self.put_if_current_at(key, seq, value, Instant::now())
    }

    pub(crate) fn put_if_current_at(&mut self, key: &str, seq: u64, value: T, now: Instant) -> bool {
        let is_current = self.entries.get(key).map(|entry| entry.seq) == Some(seq);
        if is_current {
            self.put_at(key.to_string(), value, now);
        }
        is_current
    }

    // == Lookup ==
    /// Reads `key`, removing it if it has expired.
    pub fn lookup(&mut self, key: &str) -> Lookup<T> {
        self.lookup_at(key, Instant::now())
    }

    pub(crate) fn lookup_at(&mut self, key: &str, now: Instant) -> Lookup<T> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return Lookup::Miss;
        };

        if entry.is_expired_at(now) {
            self.remove_entry(key);
            self.stats.record_expiration();
            return Lookup::Expired;
        }

        let refresh_due = self
            .config
            .effective_refresh_threshold()
            .map(|threshold| entry.in_refresh_window(now, threshold))
            .unwrap_or(false);

        let hit = Lookup::Hit {
            value: entry.value.clone(),
            seq: entry.seq,
            refresh_due,
        };
        self.stats.record_hit();
        hit
    }

    // == Get ==
    /// Returns a copy of the value for `key`, or None if absent or expired.
    pub fn get(&mut self, key: &str) -> Option<T> {
        self.lookup(key).into_value()
    }

    // == Refresh Bookkeeping ==
    /// Marks a refresh of `key` as dispatched.
    ///
    /// With single-flight enabled, returns false if one is already
    /// outstanding for this key, in which case nothing is dispatched.
    pub fn begin_refresh(&mut self, key: &str) -> bool {
        if self.config.single_flight && !self.refreshing.insert(key.to_string()) {
            return false;
        }
        self.stats.record_refresh_started();
        true
    }

    /// Records the outcome of a refresh and releases the in-flight marker.
    pub fn finish_refresh(&mut self, key: &str, status: RefreshStatus) {
        self.refreshing.remove(key);
        self.stats.record_refresh(status);
    }

    /// True while a single-flight refresh of `key` is outstanding.
    pub fn is_refreshing(&self, key: &str) -> bool {
        self.refreshing.contains(key)
    }

    // == Clear ==
    /// Removes one entry. Returns whether it was present.
    pub fn clear(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    /// Removes all entries. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub(crate) fn purge_expired_at(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
            self.stats.record_purge();
        }

        expired_keys.len()
    }

    // == Accessors ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Presence check that ignores expiry and touches no statistics.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the entry for `key` without expiry checks.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(entry.order_key());
                self.stats.set_total_entries(self.entries.len());
                true
            }
            None => false,
        }
    }
}
