//! Cache Entry Module
//!
//! Defines a single cache entry with its write time and expiry.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::Ttl;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub value: T,
    /// When the entry was created or last overwritten
    pub written_at: Instant,
    /// Expiration instant, None = never expires
    pub expires_at: Option<Instant>,
    /// Write sequence number, unique within one store
    pub seq: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry written at `written_at`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Entry lifetime
    /// * `written_at` - Write instant
    /// * `seq` - Write sequence number assigned by the store
    pub fn new(value: T, ttl: Ttl, written_at: Instant, seq: u64) -> Self {
        Self {
            value,
            written_at,
            expires_at: ttl.expires_at(written_at),
            seq,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// An entry is still valid at exactly its expiration instant and
    /// expires strictly after it.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    /// Checks whether the entry has expired now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime at `now`, or None if the entry never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the expiration instant is reached.
    pub fn ttl_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(now))
    }

    /// Returns the remaining lifetime now.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl_remaining_at(Instant::now())
    }

    // == Refresh Window ==
    /// True when less than `threshold` of the entry's lifetime remains.
    ///
    /// Never true for entries without an expiry.
    pub fn in_refresh_window(&self, now: Instant, threshold: Duration) -> bool {
        match self.ttl_remaining_at(now) {
            Some(remaining) => remaining < threshold,
            None => false,
        }
    }

    /// Position of this entry in the write-order index.
    pub fn order_key(&self) -> (Instant, u64) {
        (self.written_at, self.seq)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_infinite_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value", Ttl::Infinite, now, 0);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(now + Duration::from_secs(365 * 24 * 3600)));
        assert!(entry.ttl_remaining_at(now).is_none());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value", Ttl::from_secs(60), now, 0);

        assert_eq!(entry.expires_at, Some(now + Duration::from_secs(60)));
        assert!(entry.expires_at.unwrap() >= entry.written_at);
        assert!(!entry.is_expired_at(now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new(1, Ttl::from_millis(1000), now, 0);
        let expires = now + Duration::from_millis(1000);

        assert!(!entry.is_expired_at(expires - Duration::from_millis(1)));
        assert!(!entry.is_expired_at(expires), "Valid at exactly expires_at");
        assert!(entry.is_expired_at(expires + Duration::from_millis(1)));
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = CacheEntry::new(1, Ttl::from_secs(10), now, 0);

        assert_eq!(
            entry.ttl_remaining_at(now + Duration::from_secs(4)),
            Some(Duration::from_secs(6))
        );
        assert_eq!(
            entry.ttl_remaining_at(now + Duration::from_secs(11)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_refresh_window() {
        let now = Instant::now();
        let entry = CacheEntry::new(1, Ttl::from_millis(1000), now, 0);
        let threshold = Duration::from_millis(100);

        assert!(!entry.in_refresh_window(now, threshold));
        assert!(!entry.in_refresh_window(now + Duration::from_millis(900), threshold));
        assert!(entry.in_refresh_window(now + Duration::from_millis(950), threshold));
        assert!(!entry.in_refresh_window(now + Duration::from_millis(950), Duration::ZERO));
    }

    #[test]
    fn test_infinite_entry_never_in_refresh_window() {
        let now = Instant::now();
        let entry = CacheEntry::new(1, Ttl::Infinite, now, 0);
        assert!(!entry.in_refresh_window(now, Duration::MAX));
    }
}
