//! Error types for the freqcache library.
//!
//! - [`ConfigError`]: invalid cache configuration (e.g. zero capacity passed
//!   to a fallible constructor).
//! - [`InvariantError`]: an internal data-structure invariant was violated
//!   (produced by debug-only consistency checks).
//!
//! Absence of a key is never an error anywhere in this crate; it is an
//! ordinary `None`.

use std::fmt;

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`LfuCache::try_new`](crate::policy::lfu::LfuCache::try_new).
///
/// # Example
///
/// ```
/// use freqcache::policy::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Error describing a violated internal invariant.
///
/// Carries a human-readable description of which invariant failed. Invariant
/// violations are bugs, not runtime conditions; they are never retried or
/// recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
