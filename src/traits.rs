//! Cache trait hierarchy.
//!
//! ```text
//!   CoreCache<K, V>            insert / get / contains / len / capacity / clear
//!        │
//!        ▼
//!   MutableCache<K, V>         + remove(&K)
//!        │
//!        ▼
//!   LfuCacheTrait<K, V>        + pop_lfu / peek_lfu / frequency /
//!                                reset_frequency / increment_frequency
//!
//!   ConcurrentCache            marker: Send + Sync
//! ```
//!
//! `CoreCache` holds the operations every cache supports regardless of
//! eviction policy; `MutableCache` adds arbitrary key-based invalidation;
//! `LfuCacheTrait` adds the frequency-specific surface. Generic callers can
//! bound on exactly the capability they need:
//!
//! ```
//! use freqcache::traits::{CoreCache, LfuCacheTrait};
//! use freqcache::policy::lfu::LfuCache;
//! use std::sync::Arc;
//!
//! fn warm<C: CoreCache<u64, Arc<String>>>(cache: &mut C, data: &[(u64, String)]) {
//!     for (key, value) in data {
//!         cache.insert(*key, Arc::new(value.clone()));
//!     }
//! }
//!
//! let mut cache = LfuCache::new(16);
//! warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
//! assert_eq!(cache.len(), 2);
//! assert_eq!(cache.frequency(&1), Some(1));
//! ```

/// Core cache operations that all caches support.
///
/// # Type Parameters
///
/// - `K`: Key type (implementations typically require `Eq + Hash`)
/// - `V`: Value type as stored (for this crate's policies, `Arc<...>`)
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// Inserting over an existing key counts as an access: the entry's
    /// frequency is promoted exactly as a `get` would promote it, in
    /// addition to the value being replaced. If the cache is full, a victim
    /// is evicted according to the eviction policy before a new entry is
    /// admitted.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Fetches a value by key.
    ///
    /// A hit mutates internal policy state (for LFU, promotes the entry's
    /// frequency) even though it is semantically a read. A miss returns
    /// `None` and changes nothing.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns `true` if `key` is present, without touching policy state.
    fn contains(&self, key: &K) -> bool;

    /// Current number of entries. Never exceeds [`capacity`](Self::capacity).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Removes all entries.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes an entry by key, returning its value if present.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Frequency-tracking operations specific to LFU caches.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the current eviction candidate: the least
    /// recently promoted entry at the smallest live frequency.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Peeks the current eviction candidate without removing it or
    /// promoting anything.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Current access frequency for `key`.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Resets `key`'s frequency to 1, returning the previous frequency.
    /// Useful for manual aging of entries that were hot long ago.
    fn reset_frequency(&mut self, key: &K) -> Option<u64>;

    /// Promotes `key` without fetching its value, returning the new
    /// frequency.
    fn increment_frequency(&mut self, key: &K) -> Option<u64>;
}

/// Marker for cache handles that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}
