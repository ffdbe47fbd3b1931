//! HashMap-backed value store.
//!
//! Keys map to `Arc<V>` so callers can hold a value beyond an eviction
//! without copying it. Capacity is enforced by entry count, not byte size.
//! Traffic counters use relaxed atomics so read paths can stay `&self`.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::store::{StoreCore, StoreFull, StoreMetrics, StoreMut};

#[derive(Debug, Default)]
struct StoreCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    removes: AtomicU64,
    evictions: AtomicU64,
}

impl StoreCounters {
    fn snapshot(&self) -> StoreMetrics {
        StoreMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Single-threaded HashMap-backed store.
#[derive(Debug)]
pub struct HashMapStore<K, V> {
    map: FxHashMap<K, Arc<V>>,
    capacity: usize,
    counters: StoreCounters,
}

impl<K, V> HashMapStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates a store with a fixed entry-count capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            counters: StoreCounters::default(),
        }
    }

    /// Fetches a value by reference, counting a hit or miss.
    pub fn get_ref(&self, key: &K) -> Option<&Arc<V>> {
        match self.map.get(key) {
            Some(value) => {
                StoreCounters::bump(&self.counters.hits);
                Some(value)
            }
            None => {
                StoreCounters::bump(&self.counters.misses);
                None
            }
        }
    }

    /// Fetches a value by reference without touching the counters.
    pub fn peek_ref(&self, key: &K) -> Option<&Arc<V>> {
        self.map.get(key)
    }

    /// Iterates the stored keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }
}

impl<K, V> StoreCore<K, V> for HashMapStore<K, V>
where
    K: Eq + Hash,
{
    fn get(&self, key: &K) -> Option<Arc<V>> {
        self.get_ref(key).cloned()
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn metrics(&self) -> StoreMetrics {
        self.counters.snapshot()
    }

    fn record_eviction(&self) {
        StoreCounters::bump(&self.counters.evictions);
    }
}

impl<K, V> StoreMut<K, V> for HashMapStore<K, V>
where
    K: Eq + Hash,
{
    fn try_insert(&mut self, key: K, value: Arc<V>) -> Result<Option<Arc<V>>, StoreFull> {
        if !self.map.contains_key(&key) && self.map.len() >= self.capacity {
            return Err(StoreFull);
        }
        let previous = self.map.insert(key, value);
        if previous.is_some() {
            StoreCounters::bump(&self.counters.updates);
        } else {
            StoreCounters::bump(&self.counters.inserts);
        }
        Ok(previous)
    }

    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let removed = self.map.remove(key);
        if removed.is_some() {
            StoreCounters::bump(&self.counters.removes);
        }
        removed
    }

    fn clear(&mut self) {
        self.map.clear();
    }
}
