//! Feature-gated per-operation counters for the LFU policy.
//!
//! Counters on `&mut self` paths are plain integers; counters on `&self`
//! read paths use `Cell` so recording stays allocation- and lock-free.

use std::cell::Cell;

/// Operation counters maintained by [`LfuCache`](crate::policy::lfu::LfuCache)
/// when the `metrics` feature is enabled.
#[derive(Debug, Default)]
pub struct LfuMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,
    pub pop_lfu_calls: u64,
    pub peek_lfu_calls: Cell<u64>,
    pub frequency_calls: Cell<u64>,
}

/// Point-in-time copy of [`LfuMetrics`] plus current occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,
    pub pop_lfu_calls: u64,
    pub peek_lfu_calls: u64,
    pub frequency_calls: u64,
    pub cache_len: usize,
    pub capacity: usize,
}
