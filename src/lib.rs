//! lrukit: a fixed-capacity LRU cache over an arena-backed ordered list.
//!
//! [`LruCache`] pairs a key index with an [`OrderedList`] of entries so that
//! `get` and `set` run in O(1) and the least recently used entry is evicted
//! when a new key arrives at capacity.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let mut cache = LruCache::new(3);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//! cache.get(&"a");
//! cache.set("d", 4); // evicts "b"
//! assert_eq!(cache.get(&"b"), None);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;

pub use crate::ds::{OrderedList, SlotArena, SlotId};
pub use crate::policy::lru::{Entry, LruCache};
