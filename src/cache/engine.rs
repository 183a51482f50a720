//! Refresh Cache Module
//!
//! Shareable async handle around a `CacheStore`, adding refresh-ahead:
//! a read that lands close to expiry returns the current value at once and
//! dispatches a background refresh through the registered handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore, Lookup, RefreshStatus};
use crate::config::CacheConfig;
use crate::error::Result;

/// Future returned by a refresh handler.
pub type RefreshFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'static>>;

/// Produces a fresh value for the key it is given.
pub type RefreshHandler<T> = Arc<dyn Fn(String) -> RefreshFuture<T> + Send + Sync>;

struct Inner<T> {
    name: String,
    config: CacheConfig,
    store: RwLock<CacheStore<T>>,
    handler: RwLock<Option<RefreshHandler<T>>>,
}

// == Refresh Cache ==
/// Thread-safe cache engine with TTL, write-order eviction and refresh-ahead.
///
/// Cloning is cheap; clones share the same entries.
///
/// # Example
/// ```no_run
/// use refresh_cache::{CacheConfig, RefreshCache, Ttl};
///
/// # async fn demo() -> refresh_cache::error::Result<()> {
/// let cache = RefreshCache::new("greetings", CacheConfig::new(Ttl::from_secs(60), 100))?;
/// cache.set_refresh_handler(|key| async move { Ok(format!("hello {}", key)) }).await;
///
/// cache.put("world", "hello world".to_string()).await;
/// assert_eq!(cache.get("world").await.as_deref(), Some("hello world"));
/// # Ok(())
/// # }
/// ```
pub struct RefreshCache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RefreshCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for RefreshCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCache")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl<T> RefreshCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty cache. `name` only appears in logs and the registry.
    ///
    /// Fails if `config` has zero capacity or a zero TTL.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Result<Self> {
        let store = CacheStore::new(config.clone())?;
        Ok(Self {
            inner: Arc::new(Inner {
                name: name.into(),
                config,
                store: RwLock::new(store),
                handler: RwLock::new(None),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    // == Put ==
    /// Stores a value, replacing any previous entry and resetting its expiry.
    ///
    /// May evict the least-recently-written entry when the cache is full.
    pub async fn put(&self, key: impl Into<String>, value: T) {
        let key = key.into();
        let mut store = self.inner.store.write().await;
        if let Some(evicted) = store.put(key, value) {
            debug!("Cache '{}' full, evicted '{}'", self.inner.name, evicted);
        }
    }

    // == Get ==
    /// Returns a copy of the value, or None if absent or expired.
    ///
    /// Never waits on a refresh. If a handler is registered and the entry is
    /// inside its refresh window, a refresh is spawned and the current value
    /// is returned immediately.
    pub async fn get(&self, key: &str) -> Option<T> {
        let mut store = self.inner.store.write().await;

        match store.lookup(key) {
            Lookup::Miss => None,
            Lookup::Expired => {
                debug!("Cache '{}' entry '{}' expired", self.inner.name, key);
                None
            }
            Lookup::Hit {
                value,
                seq,
                refresh_due,
            } => {
                if refresh_due {
                    let handler = self.inner.handler.read().await.clone();
                    if let Some(handler) = handler {
                        if store.begin_refresh(key) {
                            self.spawn_refresh(handler, key.to_string(), seq);
                        }
                    }
                }
                Some(value)
            }
        }
    }

    // == Clear ==
    /// Removes one entry. Returns whether it was present.
    pub async fn clear(&self, key: &str) -> bool {
        self.inner.store.write().await.clear(key)
    }

    /// Removes all entries. Returns how many were removed.
    pub async fn clear_all(&self) -> usize {
        let removed = self.inner.store.write().await.clear_all();
        debug!("Cache '{}' cleared ({} entries)", self.inner.name, removed);
        removed
    }

    // == Refresh Handler ==
    /// Registers the handler used for background refreshes, replacing any
    /// previous one.
    ///
    /// The handler receives the key being refreshed. Caches holding a single
    /// logical value can ignore it.
    pub async fn set_refresh_handler<F, Fut>(&self, handler: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let handler: RefreshHandler<T> = Arc::new(move |key| Box::pin(handler(key)));
        *self.inner.handler.write().await = Some(handler);
    }

    /// Removes the refresh handler; entries then simply expire.
    pub async fn clear_refresh_handler(&self) {
        *self.inner.handler.write().await = None;
    }

    // == Introspection ==
    pub async fn stats(&self) -> CacheStats {
        self.inner.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.store.read().await.is_empty()
    }

    /// Presence check that ignores expiry and does not count as a read.
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.store.read().await.contains(key)
    }

    /// Removes every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.inner.store.write().await.purge_expired()
    }

    // == Background Refresh ==
    /// Runs the handler on its own task and stores the result if the entry
    /// that triggered it is still current.
    ///
    /// Failures, including a panicking handler, are logged and counted; the
    /// stale entry stays in place.
    fn spawn_refresh(&self, handler: RefreshHandler<T>, key: String, seq: u64) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            debug!("Refreshing '{}' in cache '{}'", key, inner.name);

            // The handler call itself may panic before yielding a future
            let call_key = key.clone();
            let result = match tokio::spawn(async move { handler(call_key).await }).await {
                Ok(result) => result,
                Err(join_error) => Err(anyhow::anyhow!("refresh handler panicked: {}", join_error)),
            };

            let mut store = inner.store.write().await;
            let status = match result {
                Ok(value) => {
                    if store.put_if_current(&key, seq, value) {
                        debug!("Refreshed '{}' in cache '{}'", key, inner.name);
                        RefreshStatus::Succeeded
                    } else {
                        debug!(
                            "Dropped refresh of '{}' in cache '{}': entry changed meanwhile",
                            key, inner.name
                        );
                        RefreshStatus::Discarded
                    }
                }
                Err(error) => {
                    warn!(
                        "Background refresh of '{}' in cache '{}' failed: {:#}",
                        key, inner.name, error
                    );
                    RefreshStatus::Failed
                }
            };
            store.finish_refresh(&key, status);
        });
    }
}
