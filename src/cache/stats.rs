//! Cache Statistics Module
//!
//! Tracks hits, misses, expirations, evictions and background refresh outcomes.

use serde::Serialize;

// == Refresh Status ==
/// Outcome of one background refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// New value stored
    Succeeded,
    /// Handler failed; stale entry left in place
    Failed,
    /// Entry was cleared, evicted or rewritten meanwhile; value dropped
    Discarded,
}

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that found nothing (absent or expired)
    pub misses: u64,
    /// Entries dropped because they were found expired
    pub expirations: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Background refreshes dispatched
    pub refreshes_started: u64,
    /// Background refreshes that stored a new value
    pub refreshes_succeeded: u64,
    /// Background refreshes whose handler failed
    pub refreshes_failed: u64,
    /// Background refreshes whose result was dropped
    pub refreshes_discarded: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Refreshes dispatched but not yet finished.
    pub fn refreshes_in_flight(&self) -> u64 {
        self.refreshes_started
            .saturating_sub(self.refreshes_succeeded + self.refreshes_failed + self.refreshes_discarded)
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// An expired entry counts as both an expiration and a miss.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }

    /// Expired entry removed by a purge rather than a read; not a miss.
    pub fn record_purge(&mut self) {
        self.expirations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_refresh_started(&mut self) {
        self.refreshes_started += 1;
    }

    // == Record Refresh Outcome ==
    pub fn record_refresh(&mut self, status: RefreshStatus) {
        match status {
            RefreshStatus::Succeeded => self.refreshes_succeeded += 1,
            RefreshStatus::Failed => self.refreshes_failed += 1,
            RefreshStatus::Discarded => self.refreshes_discarded += 1,
        }
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_expiration_counts_as_miss() {
        let mut stats = CacheStats::new();
        stats.record_expiration();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_refresh_outcomes() {
        let mut stats = CacheStats::new();
        for _ in 0..4 {
            stats.record_refresh_started();
        }
        stats.record_refresh(RefreshStatus::Succeeded);
        stats.record_refresh(RefreshStatus::Failed);
        stats.record_refresh(RefreshStatus::Discarded);

        assert_eq!(stats.refreshes_succeeded, 1);
        assert_eq!(stats.refreshes_failed, 1);
        assert_eq!(stats.refreshes_discarded, 1);
        assert_eq!(stats.refreshes_in_flight(), 1);
    }

    #[test]
    fn test_serialize() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.set_total_entries(42);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["evictions"], 1);
        assert_eq!(json["total_entries"], 42);
    }
}
