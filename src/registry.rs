//! Cache Registry Module
//!
//! Holds independently configured caches by name, one per logical dataset.
//! Built once during startup and shared by reference afterwards.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::cache::{CacheStats, RefreshCache};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Managed Cache ==
/// Type-erased view of a registered cache, for operations that do not
/// depend on the value type.
#[async_trait]
pub trait ManagedCache: Send + Sync {
    fn name(&self) -> &str;
    fn config(&self) -> &CacheConfig;
    async fn len(&self) -> usize;
    async fn stats(&self) -> CacheStats;
    async fn clear(&self, key: &str) -> bool;
    async fn clear_all(&self) -> usize;
    async fn purge_expired(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
}

#[async_trait]
impl<T> ManagedCache for RefreshCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        RefreshCache::name(self)
    }

    fn config(&self) -> &CacheConfig {
        RefreshCache::config(self)
    }

    async fn len(&self) -> usize {
        RefreshCache::len(self).await
    }

    async fn stats(&self) -> CacheStats {
        RefreshCache::stats(self).await
    }

    async fn clear(&self, key: &str) -> bool {
        RefreshCache::clear(self, key).await
    }

    async fn clear_all(&self) -> usize {
        RefreshCache::clear_all(self).await
    }

    async fn purge_expired(&self) -> usize {
        RefreshCache::purge_expired(self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// == Cache Registry ==
/// Named collection of caches, each with its own value type and settings.
#[derive(Default)]
pub struct CacheRegistry {
    caches: BTreeMap<String, Arc<dyn ManagedCache>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Creates and registers a cache holding values of type `T`.
    ///
    /// # Errors
    /// - `DuplicateCache` if `name` is already taken
    /// - `InvalidConfig` if `config` is rejected
    pub fn register<T>(&mut self, name: &str, config: CacheConfig) -> Result<RefreshCache<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        if self.caches.contains_key(name) {
            return Err(CacheError::DuplicateCache(name.to_string()));
        }

        let cache = RefreshCache::<T>::new(name, config)?;
        info!(
            "Registered cache '{}': ttl={}, capacity={}, refresh_threshold={:?}",
            name,
            cache.config().ttl,
            cache.config().capacity,
            cache.config().effective_refresh_threshold()
        );
        self.caches
            .insert(name.to_string(), Arc::new(cache.clone()));
        Ok(cache)
    }

    // == Typed Lookup ==
    /// Returns the cache registered as `name` with value type `T`.
    ///
    /// # Errors
    /// - `UnknownCache` if nothing is registered under `name`
    /// - `TypeMismatch` if it was registered with another value type
    pub fn get<T>(&self, name: &str) -> Result<RefreshCache<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.cache(name)?
            .as_any()
            .downcast_ref::<RefreshCache<T>>()
            .cloned()
            .ok_or_else(|| CacheError::TypeMismatch(name.to_string()))
    }

    // == Untyped Lookup ==
    /// Returns the type-erased view of the cache registered as `name`.
    pub fn cache(&self, name: &str) -> Result<Arc<dyn ManagedCache>> {
        self.caches
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::UnknownCache(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// All registered caches in name order.
    pub fn caches(&self) -> impl Iterator<Item = &Arc<dyn ManagedCache>> {
        self.caches.values()
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    // == Bulk Operations ==
    /// Statistics for every cache, keyed by name.
    pub async fn stats_all(&self) -> BTreeMap<String, CacheStats> {
        let mut all = BTreeMap::new();
        for (name, cache) in &self.caches {
            all.insert(name.clone(), cache.stats().await);
        }
        all
    }

    /// Empties every cache. Returns the total number of entries removed.
    pub async fn clear_all(&self) -> usize {
        let mut removed = 0;
        for cache in self.caches.values() {
            removed += cache.clear_all().await;
        }
        removed
    }

    /// Drops expired entries from every cache. Returns the total removed.
    pub async fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for cache in self.caches.values() {
            removed += cache.purge_expired().await;
        }
        removed
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("caches", &self.names())
            .finish()
    }
}
