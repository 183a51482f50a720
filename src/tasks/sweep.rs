//! Expired-Entry Sweep Task
//!
//! Background task that periodically purges expired entries from every
//! registered cache, so entries that are never read again do not linger
//! until capacity pressure removes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::registry::CacheRegistry;

/// Spawns a background task that purges expired entries on an interval.
///
/// # Arguments
/// * `registry` - Shared registry whose caches are swept
/// * `sweep_interval_secs` - Interval in seconds between sweeps, at least 1
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let registry = Arc::new(CacheRegistry::new());
/// let sweep_handle = spawn_sweep_task(registry.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(registry: Arc<CacheRegistry>, sweep_interval_secs: u64) -> JoinHandle<()> {
    // A zero interval would spin on the runtime
    let sweep_interval_secs = sweep_interval_secs.max(1);
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expired-entry sweep with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = registry.purge_expired().await;

            if removed > 0 {
                info!("Sweep: removed {} expired entries", removed);
            } else {
                debug!("Sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheConfig, Ttl};

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired_entries() {
        let mut registry = CacheRegistry::new();
        let cache = registry
            .register::<i32>("short", CacheConfig::new(Ttl::from_secs(1), 10))
            .unwrap();
        cache.put("expire_soon", 1).await;
        let registry = Arc::new(registry);

        let handle = spawn_sweep_task(registry.clone(), 2);

        // Paused clock auto-advances through the sweep interval
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(!cache.contains("expire_soon").await);
        assert_eq!(cache.stats().await.expirations, 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_valid_entries() {
        let mut registry = CacheRegistry::new();
        let cache = registry
            .register::<i32>("long", CacheConfig::new(Ttl::from_secs(3600), 10))
            .unwrap();
        let forever = registry
            .register::<i32>("static", CacheConfig::new(Ttl::Infinite, 10))
            .unwrap();
        cache.put("long_lived", 1).await;
        forever.put("static", 2).await;

        let handle = spawn_sweep_task(Arc::new(registry), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.get("long_lived").await, Some(1));
        assert_eq!(forever.get("static").await, Some(2));

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_zero_interval_is_clamped() {
        let mut registry = CacheRegistry::new();
        let cache = registry
            .register::<i32>("short", CacheConfig::new(Ttl::from_secs(1), 10))
            .unwrap();
        cache.put("expire_soon", 1).await;

        let handle = spawn_sweep_task(Arc::new(registry), 0);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(cache.contains("expire_soon").await);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(!cache.contains("expire_soon").await);
        assert!(!handle.is_finished());

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let handle = spawn_sweep_task(Arc::new(CacheRegistry::new()), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
