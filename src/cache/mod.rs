//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, write-order eviction
//! and refresh-ahead.

mod engine;
mod entry;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::{RefreshCache, RefreshFuture, RefreshHandler};
pub use entry::CacheEntry;
pub use order::WriteOrder;
pub use stats::{CacheStats, RefreshStatus};
pub use store::{CacheStore, Lookup};
