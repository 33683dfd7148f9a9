//! Error types for the lrukit library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned by `check_invariants` when the ordered list
//!   or the cache index disagree with each other.
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (zero capacity).
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<String, i32>, ConfigError> = LruCache::try_new(100);
//! assert!(cache.is_ok());
//!
//! let bad = LruCache::<String, i32>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal list or cache invariants are violated.
///
/// Produced by [`OrderedList::check_invariants`](crate::ds::OrderedList::check_invariants)
/// and [`LruCache::check_invariants`](crate::policy::lru::LruCache::check_invariants).
/// A correct build never produces one; it carries a description of which
/// invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
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

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`LruCache::try_new`](crate::policy::lru::LruCache::try_new)
/// and [`LruCacheBuilder::try_build`](crate::builder::LruCacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
