//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check eviction, expiry and statistics against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheStore, Lookup, RefreshCache};
use crate::config::{CacheConfig, Ttl};

// == Test Configuration ==
const TEST_CAPACITY: usize = 8;
const HOUR: u64 = 60 * 60;

// == Strategies ==
/// Small key space so puts collide with existing keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-l]{1,2}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: u32 },
    Get { key: String },
    Clear { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Clear { key }),
    ]
}

/// Operations paired with a clock step in milliseconds; zero steps create ties.
fn timed_ops_strategy() -> impl Strategy<Value = Vec<(u64, CacheOp)>> {
    prop::collection::vec((0u64..3, cache_op_strategy()), 1..120)
}

fn long_lived_store(capacity: usize) -> CacheStore<u32> {
    CacheStore::new(CacheConfig::new(Ttl::from_secs(24 * HOUR), capacity)).unwrap()
}

// == Reference Model ==
/// Entries keyed by name, holding (value, written_ms, seq).
#[derive(Default)]
struct Model {
    entries: HashMap<String, (u32, u64, u64)>,
    next_seq: u64,
}

impl Model {
    fn put(&mut self, key: String, value: u32, now_ms: u64, capacity: usize) -> Option<String> {
        let mut evicted = None;
        if !self.entries.contains_key(&key) && self.entries.len() >= capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, (_, written, seq))| (*written, *seq))
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                self.entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }
        self.entries.insert(key, (value, now_ms, self.next_seq));
        self.next_seq += 1;
        evicted
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Capacity bound and eviction choice: after every put the store never
    // exceeds capacity, and a new-key insert at capacity evicts exactly the
    // entry with the smallest (written_at, seq).
    #[test]
    fn prop_eviction_matches_write_order_model(ops in timed_ops_strategy()) {
        let t0 = Instant::now();
        let mut store = long_lived_store(TEST_CAPACITY);
        let mut model = Model::default();
        let mut now_ms = 0u64;

        for (step, op) in ops {
            now_ms += step;
            let now = t0 + Duration::from_millis(now_ms);

            match op {
                CacheOp::Put { key, value } => {
                    let expected = model.put(key.clone(), value, now_ms, TEST_CAPACITY);
                    let evicted = store.put_at(key, value, now);
                    prop_assert_eq!(evicted, expected);
                }
                CacheOp::Get { key } => {
                    let expected = model.entries.get(&key).map(|(v, _, _)| *v);
                    prop_assert_eq!(store.lookup_at(&key, now).into_value(), expected);
                }
                CacheOp::Clear { key } => {
                    let expected = model.entries.remove(&key).is_some();
                    prop_assert_eq!(store.clear(&key), expected);
                }
            }

            prop_assert!(store.len() <= TEST_CAPACITY);
            prop_assert_eq!(store.len(), model.entries.len());
        }
    }

    // Statistics: hits and misses match the observed outcome of every read,
    // and evictions match the number of displaced keys.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = long_lived_store(TEST_CAPACITY);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;
        let mut expected_evictions = 0u64;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    if store.put(key, value).is_some() {
                        expected_evictions += 1;
                    }
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Clear { key } => {
                    store.clear(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.evictions, expected_evictions);
        prop_assert_eq!(stats.total_entries, store.len());
    }

    // Expiry: with no intervening put, a finite-TTL entry is readable at
    // every instant up to and including expires_at and absent after it.
    #[test]
    fn prop_expiry_boundary(
        ttl_ms in 1u64..10_000,
        probe_ms in 0u64..20_000,
        value in any::<u32>()
    ) {
        let t0 = Instant::now();
        let mut store: CacheStore<u32> =
            CacheStore::new(CacheConfig::new(Ttl::from_millis(ttl_ms), 4)).unwrap();
        store.put_at("k".to_string(), value, t0);

        let result = store.lookup_at("k", t0 + Duration::from_millis(probe_ms));
        if probe_ms <= ttl_ms {
            let served = matches!(result, Lookup::Hit { value: v, .. } if v == value);
            prop_assert!(served);
        } else {
            prop_assert_eq!(result, Lookup::Expired);
            prop_assert!(!store.contains("k"));
        }
    }

    // Refresh window: a hit is flagged for refresh exactly when less than
    // the threshold remains.
    #[test]
    fn prop_refresh_due_matches_threshold(
        ttl_ms in 10u64..10_000,
        threshold_pct in 0u64..100,
        probe_pct in 0u64..=100
    ) {
        let threshold_ms = ttl_ms * threshold_pct / 100;
        let probe_ms = ttl_ms * probe_pct / 100;
        let config = CacheConfig::new(Ttl::from_millis(ttl_ms), 4)
            .with_refresh_threshold(Duration::from_millis(threshold_ms));
        let mut store: CacheStore<u32> = CacheStore::new(config).unwrap();

        let t0 = Instant::now();
        store.put_at("k".to_string(), 1, t0);

        let remaining = ttl_ms - probe_ms;
        match store.lookup_at("k", t0 + Duration::from_millis(probe_ms)) {
            Lookup::Hit { refresh_due, .. } => prop_assert_eq!(refresh_due, remaining < threshold_ms),
            other => prop_assert!(false, "expected a hit, got {:?}", other),
        }
    }

    // Infinite TTL: entries leave only through capacity or clear.
    #[test]
    fn prop_infinite_ttl_never_expires(
        keys in prop::collection::hash_set(key_strategy(), 1..TEST_CAPACITY),
        years in 1u64..100
    ) {
        let t0 = Instant::now();
        let mut store: CacheStore<u32> =
            CacheStore::new(CacheConfig::new(Ttl::Infinite, TEST_CAPACITY)).unwrap();
        for key in &keys {
            store.put_at(key.clone(), 1, t0);
        }

        let later = t0 + Duration::from_secs(years * 365 * 24 * HOUR);
        prop_assert_eq!(store.purge_expired_at(later), 0);
        for key in &keys {
            prop_assert!(store.lookup_at(key, later).into_value().is_some());
        }
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Concurrent puts, gets and clears through a shared RefreshCache never
    // exceed capacity and reads only ever observe values that were written.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..60)
    ) {
        let written: std::collections::HashSet<u32> = operations
            .iter()
            .filter_map(|op| match op {
                CacheOp::Put { value, .. } => Some(*value),
                _ => None,
            })
            .collect();

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache = RefreshCache::new(
                "concurrent",
                CacheConfig::new(Ttl::from_secs(HOUR), TEST_CAPACITY),
            )
            .unwrap();

            let mut handles = vec![];
            for op in operations {
                let cache = cache.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Put { key, value } => {
                            cache.put(key, value).await;
                            None
                        }
                        CacheOp::Get { key } => cache.get(&key).await,
                        CacheOp::Clear { key } => {
                            cache.clear(&key).await;
                            None
                        }
                    }
                }));
            }

            for handle in handles {
                let observed = handle.await.expect("Task should not panic");
                if let Some(value) = observed {
                    prop_assert!(written.contains(&value), "Read a value never written: {}", value);
                }
            }

            let stats = cache.stats().await;
            prop_assert!(stats.total_entries <= TEST_CAPACITY);
            prop_assert!((0.0..=1.0).contains(&stats.hit_rate()));
            Ok(())
        })?;
    }
}
