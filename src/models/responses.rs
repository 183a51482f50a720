//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::config::CacheConfig;

/// Response body for reading an entry (GET /caches/:name/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub cache: String,
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(cache: impl Into<String>, key: impl Into<String>, value: Value) -> Self {
        Self {
            cache: cache.into(),
            key: key.into(),
            value,
        }
    }
}

/// Response body for seeding an entry (PUT /caches/:name/:key)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    pub cache: String,
    pub key: String,
}

impl PutResponse {
    pub fn new(cache: impl Into<String>, key: impl Into<String>) -> Self {
        let cache = cache.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' stored in cache '{}'", key, cache),
            cache,
            key,
        }
    }
}

/// Response body for clearing one entry (DELETE /caches/:name/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub cache: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(cache: impl Into<String>, key: impl Into<String>) -> Self {
        let cache = cache.into();
        let key = key.into();
        Self {
            message: format!("Key '{}' cleared from cache '{}'", key, cache),
            cache,
            key,
        }
    }
}

/// Response body for clearing a whole cache (DELETE /caches/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    pub cache: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(cache: impl Into<String>, removed: usize) -> Self {
        let cache = cache.into();
        Self {
            message: format!("Cache '{}' cleared", cache),
            cache,
            removed,
        }
    }
}

/// Statistics of one cache (GET /stats/:name, and inside GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: String,
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(cache: impl Into<String>, stats: CacheStats) -> Self {
        Self {
            cache: cache.into(),
            hit_rate: stats.hit_rate(),
            stats,
        }
    }
}

/// Settings and statistics of one cache (GET /caches)
#[derive(Debug, Clone, Serialize)]
pub struct CacheSummary {
    pub name: String,
    /// TTL in milliseconds, None for entries that never expire
    pub ttl_ms: Option<u64>,
    pub capacity: usize,
    /// Effective refresh threshold in milliseconds, None when refresh-ahead cannot trigger
    pub refresh_threshold_ms: Option<u64>,
    pub single_flight: bool,
    pub entries: usize,
}

impl CacheSummary {
    pub fn new(name: impl Into<String>, config: &CacheConfig, entries: usize) -> Self {
        Self {
            name: name.into(),
            ttl_ms: config.ttl.as_duration().map(|d| d.as_millis() as u64),
            capacity: config.capacity,
            refresh_threshold_ms: config
                .effective_refresh_threshold()
                .map(|d| d.as_millis() as u64),
            single_flight: config.single_flight,
            entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
