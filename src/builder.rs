//! Cache configuration and builder.
//!
//! [`CacheConfig`] holds the construction parameters; [`LruCacheBuilder`]
//! is the fluent way to fill one in and validate it.
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::LruCacheBuilder;
//!
//! let mut cache = LruCacheBuilder::new(100)
//!     .prealloc(false)
//!     .build::<u64, String>();
//! cache.set(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru::{LruCache, DEFAULT_CAPACITY};

/// Construction parameters for [`LruCache`].
///
/// ```
/// use lrukit::builder::CacheConfig;
///
/// let config = CacheConfig {
///     capacity: 5000,
///     ..Default::default()
/// };
/// assert_eq!(config.capacity, 5000);
/// assert!(config.prealloc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries. Must be greater than zero.
    pub capacity: usize,

    /// Reserve index and node storage for the full capacity up front.
    pub prealloc: bool,
}

impl Default for CacheConfig {
    /// Defaults: `capacity` = [`DEFAULT_CAPACITY`], `prealloc` = true.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            prealloc: true,
        }
    }
}

/// Builder for [`LruCache`] instances.
#[derive(Debug, Clone)]
pub struct LruCacheBuilder {
    config: CacheConfig,
}

impl LruCacheBuilder {
    /// Create a new builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            config: CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Sets whether storage is reserved for the full capacity.
    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.config.prealloc = prealloc;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Build the cache.
    ///
    /// # Panics
    ///
    /// Panics if the capacity is zero. See [`try_build`](Self::try_build).
    pub fn build<K, V>(self) -> LruCache<K, V>
    where
        K: Clone + Eq + Hash,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build the cache, returning an error on invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn try_build<K, V>(self) -> Result<LruCache<K, V>, ConfigError>
    where
        K: Clone + Eq + Hash,
    {
        LruCache::try_with_config(self.config)
    }
}
