//! Configuration Module
//!
//! Per-cache settings (`Ttl`, `CacheConfig`) and the host process
//! configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{CacheError, Result};

// == Ttl ==
/// Lifetime of a cache entry relative to its last write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Entry expires this long after it was written
    Finite(Duration),
    /// Entry never expires
    Infinite,
}

impl Ttl {
    /// Finite TTL of the given number of seconds.
    pub fn from_secs(secs: u64) -> Self {
        Ttl::Finite(Duration::from_secs(secs))
    }

    /// Finite TTL of the given number of milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Ttl::Finite(Duration::from_millis(millis))
    }

    /// Returns the duration, or None for an infinite TTL.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Ttl::Finite(duration) => Some(*duration),
            Ttl::Infinite => None,
        }
    }

    /// Computes the expiration instant for an entry written at `written_at`.
    ///
    /// Returns None when the entry never expires. A duration too large to
    /// represent is treated the same way.
    pub fn expires_at(&self, written_at: Instant) -> Option<Instant> {
        match self {
            Ttl::Finite(duration) => written_at.checked_add(*duration),
            Ttl::Infinite => None,
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Finite(duration) => write!(f, "{}ms", duration.as_millis()),
            Ttl::Infinite => write!(f, "infinite"),
        }
    }
}

impl FromStr for Ttl {
    type Err = CacheError;

    /// Parses whole seconds, or `inf` / `infinite` / `never`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "inf" | "infinite" | "never" => Ok(Ttl::Infinite),
            _ => trimmed
                .parse::<u64>()
                .map(Ttl::from_secs)
                .map_err(|_| CacheError::InvalidConfig(format!("Invalid TTL '{}'", s))),
        }
    }
}

// == Cache Config ==
/// Settings fixed at construction of a single cache engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entry lifetime
    pub ttl: Ttl,
    /// Maximum number of entries
    pub capacity: usize,
    /// Remaining lifetime under which a read triggers a refresh.
    /// None means 10% of the TTL.
    pub refresh_threshold: Option<Duration>,
    /// Allow at most one in-flight refresh per key
    pub single_flight: bool,
}

impl CacheConfig {
    /// Creates a config with the default refresh threshold and single-flight enabled.
    pub fn new(ttl: Ttl, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            refresh_threshold: None,
            single_flight: true,
        }
    }

    /// Sets an explicit refresh threshold.
    ///
    /// A zero threshold disables refresh-ahead. It is not treated as unset,
    /// so it never falls back to the ttl/10 default.
    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = Some(threshold);
        self
    }

    /// Enables or disables per-key refresh deduplication.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    // == Effective Refresh Threshold ==
    /// Returns the threshold actually applied on reads.
    ///
    /// Always None for an infinite TTL, since such entries have no
    /// approaching expiry to refresh ahead of.
    pub fn effective_refresh_threshold(&self) -> Option<Duration> {
        match self.ttl {
            Ttl::Finite(ttl) => Some(self.refresh_threshold.unwrap_or(ttl / 10)),
            Ttl::Infinite => None,
        }
    }

    // == Validate ==
    /// Rejects zero capacity and a zero finite TTL.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.ttl == Ttl::Finite(Duration::ZERO) {
            return Err(CacheError::InvalidConfig(
                "finite TTL must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// == Dataset Config ==
/// A named cache hosted by the server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Registry name of the cache
    pub name: String,
    /// Engine settings
    pub cache: CacheConfig,
}

impl DatasetConfig {
    pub fn new(name: impl Into<String>, cache: CacheConfig) -> Self {
        Self {
            name: name.into(),
            cache,
        }
    }
}

/// Datasets hosted when no overrides are given.
///
/// Projects change daily, documents hourly, stages and categories are static.
pub fn default_datasets() -> Vec<DatasetConfig> {
    const HOUR: u64 = 60 * 60;
    vec![
        DatasetConfig::new(
            "projects",
            CacheConfig::new(Ttl::from_secs(24 * HOUR), 100)
                .with_refresh_threshold(Duration::from_secs(2 * HOUR)),
        ),
        DatasetConfig::new(
            "documents",
            CacheConfig::new(Ttl::from_secs(HOUR), 500)
                .with_refresh_threshold(Duration::from_secs(5 * 60)),
        ),
        DatasetConfig::new("stages", CacheConfig::new(Ttl::Infinite, 50)),
        DatasetConfig::new("categories", CacheConfig::new(Ttl::Infinite, 100)),
    ]
}

// == Server Config ==
/// Host process configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds, 0 disables the sweep
    pub sweep_interval: u64,
    /// Caches to register at startup
    pub datasets: Vec<DatasetConfig>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds, 0 = off (default: 0)
    /// - `<NAME>_TTL` - Seconds or `infinite`, per dataset
    /// - `<NAME>_MAX_ENTRIES` - Capacity, per dataset
    /// - `<NAME>_REFRESH_THRESHOLD` - Seconds, per dataset
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to the default for that setting.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = Self::default();

        let datasets = defaults
            .datasets
            .into_iter()
            .map(|mut dataset| {
                let prefix = dataset.name.to_ascii_uppercase();
                // Zero TTL and zero capacity are invalid, keep the default
                if let Some(ttl) = lookup(&format!("{}_TTL", prefix))
                    .and_then(|v| v.parse::<Ttl>().ok())
                    .filter(|ttl| *ttl != Ttl::Finite(Duration::ZERO))
                {
                    dataset.cache.ttl = ttl;
                }
                if let Some(capacity) =
                    parse(&format!("{}_MAX_ENTRIES", prefix)).filter(|&capacity| capacity > 0)
                {
                    dataset.cache.capacity = capacity as usize;
                }
                if let Some(threshold) = parse(&format!("{}_REFRESH_THRESHOLD", prefix)) {
                    dataset.cache.refresh_threshold = Some(Duration::from_secs(threshold));
                }
                dataset
            })
            .collect();

        Self {
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            sweep_interval: parse("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            datasets,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            sweep_interval: 0,
            datasets: default_datasets(),
        }
    }
}
