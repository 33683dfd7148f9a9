pub use crate::builder::{CacheConfig, LruCacheBuilder};
pub use crate::ds::{OrderedList, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lru::{Entry, LruCache};
