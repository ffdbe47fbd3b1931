//! Frequency buckets for O(1) LFU tracking.
//!
//! Keys are organized into per-frequency doubly linked lists ("buckets")
//! whose nodes live in a shared [`SlotArena`]. Each bucket is bounded by two
//! sentinel nodes, so splicing in and out never branches on head/tail
//! position. A hash index maps keys to node handles for O(1) lookup.
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        arena: SlotArena<Node<K>>
//!
//!   buckets: FxHashMap<u64, Bucket>
//!
//!   freq=1: [head] ◄──► [c] ◄──► [b] ◄──► [tail]
//!                        MRU      LRU (evicted first)
//!   freq=2: [head] ◄──► [a] ◄──► [tail]
//!
//!   min_freq = 1 (lower bound on the live minimum)
//! ```
//!
//! Within a bucket the head side is most recently promoted; the eviction
//! candidate is the tail of the lowest nonempty bucket. Buckets are created
//! lazily the first time a frequency is reached and retained after they
//! drain, so victim selection scans upward from `min_freq` to the first
//! nonempty bucket. The scan is amortized O(1): `min_freq` only moves past a
//! frequency once per promotion that drained it.
//!
//! Sentinels carry frequency 0 and no key; live entries always have
//! frequency >= 1. Structure corruption (a sentinel where a data node is
//! required, a handle to a freed slot) is a logic error and panics.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<K> {
    // Link handles are only meaningful while the node is spliced into a
    // bucket; an unlinked node points at itself.
    prev: SlotId,
    next: SlotId,
    freq: u64,
    // None for the two sentinel nodes of each bucket.
    key: Option<K>,
}

/// One frequency level: two sentinel nodes bounding a doubly linked list of
/// entries that currently share that frequency.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    head: SlotId,
    tail: SlotId,
}

impl Bucket {
    fn new<K>(arena: &mut SlotArena<Node<K>>) -> Self {
        let head = alloc_unlinked(arena, None, 0);
        let tail = alloc_unlinked(arena, None, 0);
        link(arena, head, tail);
        Self { head, tail }
    }

    fn is_empty<K>(&self, arena: &SlotArena<Node<K>>) -> bool {
        node(arena, self.head).next == self.tail
    }

    /// Splices `id` in right after the head sentinel, making it the most
    /// recently promoted member. `id` must currently be unlinked.
    fn push_front<K>(&self, arena: &mut SlotArena<Node<K>>, id: SlotId) {
        let first = node(arena, self.head).next;
        debug_assert_eq!(node(arena, id).next, id, "entry is already linked");
        {
            let entry = node_mut(arena, id);
            entry.prev = self.head;
            entry.next = first;
        }
        node_mut(arena, self.head).next = id;
        node_mut(arena, first).prev = id;
    }

    /// Handle of the least recently promoted entry. Calling this on an
    /// empty bucket is a programming error.
    fn tail_id<K>(&self, arena: &SlotArena<Node<K>>) -> SlotId {
        assert!(
            !self.is_empty(arena),
            "tail_id called on an empty frequency bucket"
        );
        node(arena, self.tail).prev
    }
}

fn alloc_unlinked<K>(arena: &mut SlotArena<Node<K>>, key: Option<K>, freq: u64) -> SlotId {
    let id = arena.insert(Node {
        prev: SlotId(0),
        next: SlotId(0),
        freq,
        key,
    });
    let entry = node_mut(arena, id);
    entry.prev = id;
    entry.next = id;
    id
}

fn link<K>(arena: &mut SlotArena<Node<K>>, a: SlotId, b: SlotId) {
    node_mut(arena, a).next = b;
    node_mut(arena, b).prev = a;
}

/// Removes `id` from whichever bucket contains it. The node must be linked;
/// afterwards its own links point at itself until it is reinserted.
fn unlink<K>(arena: &mut SlotArena<Node<K>>, id: SlotId) {
    let (prev, next) = {
        let entry = node(arena, id);
        (entry.prev, entry.next)
    };
    debug_assert_ne!(prev, id, "entry is not linked into any bucket");
    node_mut(arena, prev).next = next;
    node_mut(arena, next).prev = prev;
    let entry = node_mut(arena, id);
    entry.prev = id;
    entry.next = id;
}

fn node<K>(arena: &SlotArena<Node<K>>, id: SlotId) -> &Node<K> {
    arena.get(id).expect("dangling frequency bucket handle")
}

fn node_mut<K>(arena: &mut SlotArena<Node<K>>, id: SlotId) -> &mut Node<K> {
    arena.get_mut(id).expect("dangling frequency bucket handle")
}

/// O(1) LFU metadata tracker with LRU tie-breaking within a frequency.
///
/// Tracks key frequencies for LFU eviction; the value payload lives in a
/// separate store. Every live key is in exactly one bucket list and exactly
/// one index slot.
///
/// # Example
///
/// ```
/// use freqcache::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// freq.insert("a");
/// freq.insert("b");
/// freq.touch(&"a"); // "a" now at freq=2
///
/// assert_eq!(freq.frequency(&"a"), Some(2));
/// assert_eq!(freq.pop_min(), Some(("b", 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<K> {
    arena: SlotArena<Node<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    /// Lower bound on the smallest live frequency; 0 when empty. Exact
    /// after promotions, may lag behind after `remove` until the next
    /// victim scan catches it up.
    min_freq: u64,
    /// Highest frequency ever observed; bounds the victim scan.
    max_freq: u64,
}

impl<K> FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
            max_freq: 0,
        }
    }

    /// Creates a tracker with reserved capacity for entries and index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            // Two sentinel slots per bucket come out of the same arena.
            arena: SlotArena::with_capacity(capacity.saturating_add(8)),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
            max_freq: 0,
        }
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current frequency for `key`, if tracked.
    #[inline]
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        Some(node(&self.arena, id).freq)
    }

    /// Lower bound on the smallest live frequency (`None` when empty).
    /// After a bare `remove` this may briefly undershoot the true minimum;
    /// [`pop_min`](Self::pop_min) and [`peek_min`](Self::peek_min) always
    /// resolve the true minimum by scanning forward.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Starts tracking a new key at frequency 1.
    ///
    /// Returns `false` (no state change) if the key is already tracked.
    ///
    /// ```
    /// use freqcache::ds::FrequencyBuckets;
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// assert!(freq.insert("a"));
    /// assert!(!freq.insert("a"));
    /// assert_eq!(freq.frequency(&"a"), Some(1));
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = alloc_unlinked(&mut self.arena, Some(key.clone()), 1);
        let bucket = self.ensure_bucket(1);
        bucket.push_front(&mut self.arena, id);
        self.index.insert(key, id);
        self.min_freq = 1;
        if self.max_freq == 0 {
            self.max_freq = 1;
        }
        true
    }

    /// Promotes `key` from frequency `f` to `f + 1` and makes it the most
    /// recently promoted member of the destination bucket. Returns the new
    /// frequency, or `None` if the key is not tracked.
    ///
    /// At `u64::MAX` the frequency saturates: the entry is refreshed to the
    /// front of its bucket without changing frequency.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let freq = node(&self.arena, id).freq;
        let old_bucket = *self
            .buckets
            .get(&freq)
            .expect("bucket missing for live frequency");

        if freq == u64::MAX {
            unlink(&mut self.arena, id);
            old_bucket.push_front(&mut self.arena, id);
            return Some(freq);
        }

        unlink(&mut self.arena, id);
        let emptied = old_bucket.is_empty(&self.arena);

        let next = freq + 1;
        let dest = self.ensure_bucket(next);
        node_mut(&mut self.arena, id).freq = next;
        dest.push_front(&mut self.arena, id);

        // The promoted entry itself now lives at `next`, so when the old
        // minimum bucket drained the new minimum is exactly `next`.
        if emptied && self.min_freq == freq {
            self.min_freq = next;
        }
        if next > self.max_freq {
            self.max_freq = next;
        }
        Some(next)
    }

    /// Moves `key` back to frequency 1 as the most recently promoted member
    /// of that bucket. Returns the previous frequency.
    pub fn reset(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let freq = node(&self.arena, id).freq;
        unlink(&mut self.arena, id);
        node_mut(&mut self.arena, id).freq = 1;
        let dest = self.ensure_bucket(1);
        dest.push_front(&mut self.arena, id);
        self.min_freq = 1;
        Some(freq)
    }

    /// Stops tracking `key` and returns its last frequency.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        unlink(&mut self.arena, id);
        let entry = self
            .arena
            .remove(id)
            .expect("live entry missing from arena");
        if self.index.is_empty() {
            self.min_freq = 0;
        }
        Some(entry.freq)
    }

    /// Peeks the eviction candidate: the least recently promoted key at the
    /// smallest live frequency.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        let freq = self.first_live_freq()?;
        let bucket = self.buckets.get(&freq)?;
        let id = bucket.tail_id(&self.arena);
        let entry = node(&self.arena, id);
        let key = entry.key.as_ref().expect("sentinel linked as a data node");
        Some((key, entry.freq))
    }

    /// Removes and returns the eviction candidate `(key, freq)`.
    ///
    /// ```
    /// use freqcache::ds::FrequencyBuckets;
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// freq.insert("a");
    /// freq.insert("b");
    /// freq.touch(&"a");
    ///
    /// assert_eq!(freq.pop_min(), Some(("b", 1)));
    /// assert_eq!(freq.pop_min(), Some(("a", 2)));
    /// assert_eq!(freq.pop_min(), None);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        let freq = self.first_live_freq()?;
        self.min_freq = freq;
        let bucket = *self
            .buckets
            .get(&freq)
            .expect("bucket missing for live frequency");
        let id = bucket.tail_id(&self.arena);
        unlink(&mut self.arena, id);
        let entry = self
            .arena
            .remove(id)
            .expect("live entry missing from arena");
        let key = entry.key.expect("sentinel linked as a data node");
        self.index.remove(&key);
        if self.index.is_empty() {
            self.min_freq = 0;
        }
        Some((key, entry.freq))
    }

    /// Drops all tracked keys and bucket storage.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
        self.max_freq = 0;
    }

    fn ensure_bucket(&mut self, freq: u64) -> Bucket {
        if let Some(bucket) = self.buckets.get(&freq) {
            return *bucket;
        }
        let bucket = Bucket::new(&mut self.arena);
        self.buckets.insert(freq, bucket);
        bucket
    }

    /// First frequency with a nonempty bucket, scanning upward from the
    /// `min_freq` lower bound. `None` when no keys are tracked.
    fn first_live_freq(&self) -> Option<u64> {
        if self.index.is_empty() {
            return None;
        }
        let start = self.min_freq.max(1);
        for freq in start..=self.max_freq {
            if let Some(bucket) = self.buckets.get(&freq) {
                if !bucket.is_empty(&self.arena) {
                    return Some(freq);
                }
            }
        }
        unreachable!("tracked keys exist but no bucket is nonempty")
    }

    /// Exhaustive structural walk, intended for tests and debugging.
    /// Panics on the first violated invariant.
    pub fn debug_validate_invariants(&self) {
        // Arena holds every live entry plus two sentinels per bucket.
        assert_eq!(self.arena.len(), self.index.len() + 2 * self.buckets.len());

        let mut walked = 0usize;
        for (&freq, bucket) in &self.buckets {
            assert!(freq >= 1);
            assert_eq!(node(&self.arena, bucket.head).freq, 0);
            assert_eq!(node(&self.arena, bucket.tail).freq, 0);

            let mut prev = bucket.head;
            let mut current = node(&self.arena, bucket.head).next;
            while current != bucket.tail {
                let entry = node(&self.arena, current);
                assert_eq!(entry.prev, prev);
                assert_eq!(entry.freq, freq);
                let key = entry.key.as_ref().expect("sentinel in data position");
                assert_eq!(self.index.get(key), Some(&current));
                walked += 1;
                assert!(walked <= self.index.len());
                prev = current;
                current = entry.next;
            }
            assert_eq!(node(&self.arena, bucket.tail).prev, prev);
        }
        // Every indexed key was reachable through exactly one bucket.
        assert_eq!(walked, self.index.len());

        if self.index.is_empty() {
            assert_eq!(self.min_freq, 0);
        } else {
            assert!(self.min_freq >= 1);
            let true_min = self
                .index
                .values()
                .map(|&id| node(&self.arena, id).freq)
                .min()
                .unwrap();
            assert!(self.min_freq <= true_min);
            assert_eq!(self.first_live_freq(), Some(true_min));
            assert!(self.max_freq >= true_min);
        }
    }
}

impl<K> Default for FrequencyBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
