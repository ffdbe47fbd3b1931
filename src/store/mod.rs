//! Value storage layer.
//!
//! Stores own the values (`Arc<V>`) behind a cache policy; the policy owns
//! the eviction metadata and decides *which* key to evict, the store only
//! enforces the entry-count capacity and counts traffic.

pub mod hashmap;

pub use hashmap::HashMapStore;

use std::sync::Arc;

/// Returned by [`StoreMut::try_insert`] when a new key would exceed the
/// store's capacity. The policy layer is expected to evict first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreFull;

/// Snapshot of store traffic counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub removes: u64,
    pub evictions: u64,
}

/// Read-side store operations.
pub trait StoreCore<K, V> {
    /// Fetches a value by key, counting a hit or miss.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn capacity(&self) -> usize;

    /// Snapshot of traffic counters.
    fn metrics(&self) -> StoreMetrics;

    /// Records that the policy evicted an entry from this store.
    fn record_eviction(&self);
}

/// Write-side store operations.
pub trait StoreMut<K, V>: StoreCore<K, V> {
    /// Inserts or updates an entry. Updating an existing key always
    /// succeeds; admitting a new key fails with [`StoreFull`] when the
    /// store is at capacity.
    fn try_insert(&mut self, key: K, value: Arc<V>) -> Result<Option<Arc<V>>, StoreFull>;

    fn remove(&mut self, key: &K) -> Option<Arc<V>>;

    fn clear(&mut self);
}
