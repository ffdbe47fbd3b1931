//! freqcache: a bucketed LFU (Least Frequently Used) key-value cache.
//!
//! Lookup, promotion, insertion, and eviction are all O(1) amortized. The
//! eviction engine lives in [`ds::freq_buckets`]; values are held in the
//! store layer ([`store`]) and orchestrated by [`policy::lfu::LfuCache`].

pub mod ds;
pub mod error;
pub mod policy;
pub mod store;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
