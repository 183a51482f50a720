//! Refresh Cache - An in-process cache for slow-to-fetch data
//!
//! Provides TTL expiration, write-order capacity eviction and refresh-ahead
//! (stale-while-revalidate), plus a registry of named caches and an admin
//! HTTP surface for hosting them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, RefreshCache};
pub use config::{CacheConfig, Config, Ttl};
pub use error::CacheError;
pub use registry::{CacheRegistry, ManagedCache};
pub use tasks::spawn_sweep_task;
