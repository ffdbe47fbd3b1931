//! LFU (Least Frequently Used) cache.
//!
//! Evicts the entry with the smallest access frequency when capacity is
//! reached, breaking ties by recency: among entries at the minimum
//! frequency, the one that has gone longest without being promoted is
//! evicted first. All operations are O(1) amortized.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────┐
//!   │                   LfuCache<K, V>                      │
//!   │                                                       │
//!   │   tracker: FrequencyBuckets<K>                        │
//!   │     key → frequency, bucketed lists, victim at the    │
//!   │     tail of the lowest nonempty bucket                │
//!   │                                                       │
//!   │   store: HashMapStore<K, V>                           │
//!   │     key → Arc<V>, capacity enforcement, counters      │
//!   └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Semantics
//!
//! - `get` on a present key promotes its frequency by exactly 1 and makes
//!   it the most recently promoted member of its new bucket. A miss is a
//!   plain `None` with no state change.
//! - `insert` over an existing key counts as an access: frequency is
//!   promoted *and* the value is replaced. Frequencies are never reset by
//!   an overwrite.
//! - `insert` of a new key at capacity evicts one victim first, then
//!   admits the new entry at frequency 1.
//! - Zero capacity is honored: every insert of a new key is a no-op and
//!   `len()` stays 0. Use [`LfuCache::try_new`] to reject capacity 0 at
//!   construction instead.
//!
//! ## Thread safety
//!
//! `LfuCache` is single-threaded; wrap each call in external mutual
//! exclusion for shared use. With the `concurrency` feature,
//! [`ConcurrentLfuCache`] provides exactly that: a `parking_lot::Mutex`
//! around the cache with owned-`Arc<V>` operations.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::traits::{CoreCache, LfuCacheTrait};
//!
//! let mut cache = LfuCache::new(2);
//! cache.insert("a", Arc::new(1));
//! cache.insert("b", Arc::new(2));
//! cache.get(&"a"); // freq(a)=2, freq(b)=1
//!
//! cache.insert("c", Arc::new(3)); // evicts "b" (lowest frequency)
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.frequency(&"c"), Some(1));
//! ```

use std::hash::Hash;
use std::sync::Arc;

use crate::ds::FrequencyBuckets;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{LfuMetrics, LfuMetricsSnapshot};
use crate::store::{HashMapStore, StoreCore, StoreMut};
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

/// Bucketed LFU cache with LRU tie-breaking.
///
/// See the module documentation for semantics.
#[derive(Debug)]
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    store: HashMapStore<K, V>,
    tracker: FrequencyBuckets<K>,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Capacity 0 is honored: the cache stays empty and every insert of a
    /// new key is a no-op.
    pub fn new(capacity: usize) -> Self {
        Self {
            store: HashMapStore::new(capacity),
            tracker: FrequencyBuckets::with_capacity(capacity),
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Fallible constructor for callers that treat zero capacity as a
    /// configuration bug.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        Ok(Self::new(capacity))
    }

    /// Fetches a value without promoting the entry's frequency.
    pub fn peek(&self, key: &K) -> Option<&Arc<V>> {
        self.store.peek_ref(key)
    }

    /// Cheap consistency spot-checks, usable in release builds.
    ///
    /// The exhaustive structural walk lives in
    /// [`debug_validate_invariants`](Self::debug_validate_invariants).
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.store.len() > self.store.capacity() {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.store.len(),
                self.store.capacity()
            )));
        }
        if self.store.len() != self.tracker.len() {
            return Err(InvariantError::new(format!(
                "store holds {} entries but tracker holds {}",
                self.store.len(),
                self.tracker.len()
            )));
        }
        if let Some((key, freq)) = self.tracker.peek_min() {
            if freq == 0 {
                return Err(InvariantError::new("live entry with frequency 0"));
            }
            if !self.store.contains(key) {
                return Err(InvariantError::new(
                    "eviction candidate has no stored value",
                ));
            }
        }
        Ok(())
    }

    /// Exhaustive structural walk, intended for tests and debugging.
    /// Panics on the first violated invariant.
    pub fn debug_validate_invariants(&self) {
        self.check_invariants().expect("lfu invariants violated");
        self.tracker.debug_validate_invariants();
        for key in self.store.keys() {
            assert!(self.tracker.contains(key), "stored key is not tracked");
        }
    }

    fn evict_one(&mut self) {
        if let Some((victim, _freq)) = self.tracker.pop_min() {
            self.store.record_eviction();
            let _ = self.store.remove(&victim);
            #[cfg(feature = "metrics")]
            {
                self.metrics.evicted_entries += 1;
            }
        }
    }
}

impl<K, V> CoreCache<K, Arc<V>> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.insert_calls += 1;
        }

        if self.tracker.contains(&key) {
            #[cfg(feature = "metrics")]
            {
                self.metrics.insert_updates += 1;
            }
            // Overwrite counts as an access: promote, then replace.
            self.tracker.touch(&key);
            return self.store.try_insert(key, value).ok().flatten();
        }

        if self.store.capacity() == 0 {
            return None;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.insert_new += 1;
        }

        if self.store.len() >= self.store.capacity() {
            self.evict_one();
        }

        if self.store.try_insert(key.clone(), value).is_err() {
            return None;
        }
        self.tracker.insert(key);
        None
    }

    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.get_calls += 1;
        }

        if self.tracker.touch(key).is_none() {
            #[cfg(feature = "metrics")]
            {
                self.metrics.get_misses += 1;
            }
            // Count the miss in the store too.
            let _ = self.store.get_ref(key);
            return None;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.get_hits += 1;
        }
        self.store.get_ref(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.store.contains(key)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity()
    }

    fn clear(&mut self) {
        self.store.clear();
        self.tracker.clear();
    }
}

impl<K, V> MutableCache<K, Arc<V>> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        self.tracker.remove(key)?;
        self.store.remove(key)
    }
}

impl<K, V> LfuCacheTrait<K, Arc<V>> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, Arc<V>)> {
        #[cfg(feature = "metrics")]
        {
            self.metrics.pop_lfu_calls += 1;
        }

        let (key, _freq) = self.tracker.pop_min()?;
        self.store.record_eviction();
        let value = self.store.remove(&key)?;
        Some((key, value))
    }

    fn peek_lfu(&self) -> Option<(&K, &Arc<V>)> {
        #[cfg(feature = "metrics")]
        self.metrics
            .peek_lfu_calls
            .set(self.metrics.peek_lfu_calls.get() + 1);

        let (key, _freq) = self.tracker.peek_min()?;
        let value = self.store.peek_ref(key)?;
        Some((key, value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        self.metrics
            .frequency_calls
            .set(self.metrics.frequency_calls.get() + 1);

        self.tracker.frequency(key)
    }

    fn reset_frequency(&mut self, key: &K) -> Option<u64> {
        self.tracker.reset(key)
    }

    fn increment_frequency(&mut self, key: &K) -> Option<u64> {
        self.tracker.touch(key)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evicted_entries: self.metrics.evicted_entries,
            pop_lfu_calls: self.metrics.pop_lfu_calls,
            peek_lfu_calls: self.metrics.peek_lfu_calls.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            cache_len: self.store.len(),
            capacity: self.store.capacity(),
        }
    }
}

/// Mutex-wrapped [`LfuCache`] for shared use across threads.
///
/// Each operation takes the lock for its full duration; values come back as
/// owned `Arc<V>` clones so no borrow outlives the critical section.
#[cfg(feature = "concurrency")]
#[derive(Debug)]
pub struct ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: parking_lot::Mutex<LfuCache<K, V>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: parking_lot::Mutex::new(LfuCache::new(capacity)),
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: parking_lot::Mutex::new(LfuCache::try_new(capacity)?),
        })
    }

    pub fn insert(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).cloned()
    }

    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    pub fn pop_lfu(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lfu()
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }
}

// `Arc<V>: Send` requires `V: Send + Sync`, so the stored values need both
// for the wrapper to actually cross threads.
#[cfg(feature = "concurrency")]
impl<K, V> crate::traits::ConcurrentCache for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> LfuCache<&'static str, i32> {
        LfuCache::new(capacity)
    }

    #[test]
    fn capacity_bound_holds_under_churn() {
        let mut cache = LfuCache::new(3);
        for i in 0..50u64 {
            cache.insert(i, Arc::new(i));
            assert!(cache.len() <= 3);
            cache.debug_validate_invariants();
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn evicts_lowest_frequency_entry() {
        let mut cache = cache(2);
        cache.insert("a", Arc::new(1));
        cache.insert("b", Arc::new(2));
        cache.get(&"a"); // freq(a)=2, freq(b)=1
        cache.insert("c", Arc::new(3));

        assert!(!cache.contains(&"b"));
        assert_eq!(cache.peek(&"a").map(|v| **v), Some(1));
        assert_eq!(cache.peek(&"c").map(|v| **v), Some(3));
        cache.debug_validate_invariants();
    }

    #[test]
    fn ties_break_by_least_recent_insertion() {
        let mut cache = cache(2);
        cache.insert("a", Arc::new(1));
        cache.insert("b", Arc::new(2));
        // Both at freq=1; "a" has been untouched longest.
        cache.insert("c", Arc::new(3));

        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn get_promotes_by_exactly_one_per_call() {
        let mut cache = cache(4);
        cache.insert("k", Arc::new(7));
        for expected in 2..=8u64 {
            assert_eq!(cache.get(&"k").map(|v| **v), Some(7));
            assert_eq!(cache.frequency(&"k"), Some(expected));
        }
    }

    #[test]
    fn overwrite_replaces_value_and_promotes() {
        let mut cache = cache(4);
        assert_eq!(cache.insert("k", Arc::new(1)), None);
        assert_eq!(cache.insert("k", Arc::new(2)).map(|v| *v), Some(1));
        assert_eq!(cache.get(&"k").map(|v| **v), Some(2));
        // insert + insert + get = three accesses.
        assert_eq!(cache.frequency(&"k"), Some(3));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn miss_is_side_effect_free() {
        let mut cache = cache(2);
        cache.insert("a", Arc::new(1));
        let freq_before = cache.frequency(&"a");

        assert_eq!(cache.get(&"missing"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.frequency(&"a"), freq_before);
        cache.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_rejects_all_inserts() {
        let mut cache = cache(0);
        cache.insert("k", Arc::new(1));
        assert_eq!(cache.len(), 0);
        assert!(!cache.contains(&"k"));
        assert_eq!(cache.get(&"k"), None);
        cache.debug_validate_invariants();
    }

    #[test]
    fn try_new_rejects_zero_capacity() {
        assert!(LfuCache::<u64, u64>::try_new(0).is_err());
        assert!(LfuCache::<u64, u64>::try_new(1).is_ok());
    }

    #[test]
    fn remove_forgets_frequency() {
        let mut cache = cache(2);
        cache.insert("k", Arc::new(1));
        cache.get(&"k");
        assert_eq!(cache.remove(&"k").map(|v| *v), Some(1));
        assert_eq!(cache.remove(&"k"), None);

        cache.insert("k", Arc::new(2));
        assert_eq!(cache.frequency(&"k"), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn pop_lfu_drains_in_frequency_then_recency_order() {
        let mut cache = cache(3);
        cache.insert("a", Arc::new(1));
        cache.insert("b", Arc::new(2));
        cache.insert("c", Arc::new(3));
        cache.get(&"a");
        cache.get(&"a");
        cache.get(&"c");

        // freq: b=1, c=2, a=3
        assert_eq!(cache.pop_lfu().map(|(k, _)| k), Some("b"));
        assert_eq!(cache.pop_lfu().map(|(k, _)| k), Some("c"));
        assert_eq!(cache.pop_lfu().map(|(k, _)| k), Some("a"));
        assert_eq!(cache.pop_lfu(), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn peek_lfu_does_not_mutate() {
        let mut cache = cache(2);
        cache.insert("a", Arc::new(1));
        cache.insert("b", Arc::new(2));
        cache.get(&"b");

        assert_eq!(cache.peek_lfu().map(|(k, v)| (*k, **v)), Some(("a", 1)));
        assert_eq!(cache.peek_lfu().map(|(k, v)| (*k, **v)), Some(("a", 1)));
        assert_eq!(cache.frequency(&"a"), Some(1));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn peek_does_not_promote() {
        let mut cache = cache(2);
        cache.insert("k", Arc::new(1));
        cache.peek(&"k");
        cache.peek(&"k");
        assert_eq!(cache.frequency(&"k"), Some(1));
    }

    #[test]
    fn reset_and_increment_frequency() {
        let mut cache = cache(2);
        cache.insert("k", Arc::new(1));
        assert_eq!(cache.increment_frequency(&"k"), Some(2));
        assert_eq!(cache.increment_frequency(&"k"), Some(3));
        assert_eq!(cache.reset_frequency(&"k"), Some(3));
        assert_eq!(cache.frequency(&"k"), Some(1));
        assert_eq!(cache.increment_frequency(&"missing"), None);
    }

    #[test]
    fn eviction_after_explicit_remove_finds_true_minimum() {
        let mut cache = cache(2);
        cache.insert("low", Arc::new(1));
        cache.insert("high", Arc::new(2));
        cache.get(&"high");
        cache.get(&"high");
        cache.remove(&"low"); // min-frequency hint goes stale here

        cache.insert("new", Arc::new(3));
        cache.insert("newer", Arc::new(4)); // must evict "new" (freq 1), not "high"

        assert!(cache.contains(&"high"));
        assert!(cache.contains(&"newer"));
        assert!(!cache.contains(&"new"));
        cache.debug_validate_invariants();
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = cache(2);
        cache.insert("a", Arc::new(1));
        cache.insert("b", Arc::new(2));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.pop_lfu(), None);
        cache.insert("a", Arc::new(3));
        assert_eq!(cache.frequency(&"a"), Some(1));
        cache.debug_validate_invariants();
    }

    #[test]
    fn check_invariants_on_healthy_cache() {
        let mut cache = cache(4);
        cache.insert("a", Arc::new(1));
        cache.get(&"a");
        assert!(cache.check_invariants().is_ok());
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_snapshot_counts_operations() {
        let mut cache = cache(2);
        cache.insert("a", Arc::new(1));
        cache.insert("a", Arc::new(2));
        cache.get(&"a");
        cache.get(&"missing");
        cache.insert("b", Arc::new(3));
        cache.insert("c", Arc::new(4)); // evicts
        let _ = cache.peek_lfu();
        let _ = cache.frequency(&"a");

        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.insert_calls, 4);
        assert_eq!(snapshot.insert_updates, 1);
        assert_eq!(snapshot.insert_new, 3);
        assert_eq!(snapshot.get_calls, 2);
        assert_eq!(snapshot.get_hits, 1);
        assert_eq!(snapshot.get_misses, 1);
        assert_eq!(snapshot.evicted_entries, 1);
        assert_eq!(snapshot.peek_lfu_calls, 1);
        assert_eq!(snapshot.frequency_calls, 1);
        assert_eq!(snapshot.cache_len, 2);
        assert_eq!(snapshot.capacity, 2);
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn concurrent_wrapper_satisfies_the_marker() {
        fn assert_marker<C: crate::traits::ConcurrentCache>() {}
        assert_marker::<ConcurrentLfuCache<u64, String>>();
        assert_marker::<ConcurrentLfuCache<String, Vec<u8>>>();
    }

    #[cfg(feature = "concurrency")]
    #[test]
    fn concurrent_wrapper_shares_across_threads() {
        use std::sync::Arc as StdArc;

        let cache = StdArc::new(ConcurrentLfuCache::<u64, u64>::new(64));
        let mut handles = Vec::new();
        for t in 0..4u64 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..16u64 {
                    cache.insert(t * 16 + i, Arc::new(i));
                    let _ = cache.get(&(t * 16 + i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 64);
    }
}
