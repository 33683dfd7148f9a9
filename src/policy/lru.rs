//! # Least Recently Used (LRU) Cache
//!
//! Fixed-capacity key-value cache that evicts the least recently used entry
//! when a new key arrives at capacity. `get` and `set` are O(1): a key index
//! maps each key straight to its node in an arena-backed [`OrderedList`], so
//! neither operation scans.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        LruCache<K, V>                            │
//!   │                                                                  │
//!   │   ┌──────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, SlotId>  (index, non-owning handles)       │   │
//!   │   │                                                          │   │
//!   │   │   "a" ──────────────┐                                    │   │
//!   │   │   "b" ──────────────┼───────────┐                        │   │
//!   │   │   "c" ──────────────┼───────────┼───────────┐            │   │
//!   │   └─────────────────────┼───────────┼───────────┼────────────┘   │
//!   │                         ▼           ▼           ▼                │
//!   │   ┌──────────────────────────────────────────────────────────┐   │
//!   │   │  OrderedList<Entry<K, V>>  (owns every entry)            │   │
//!   │   │                                                          │   │
//!   │   │  head ──► [a:1] ◄──► [b:2] ◄──► [c:3] ◄── tail           │   │
//!   │   │           LRU                    MRU                     │   │
//!   │   └──────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   set(d, 4) with capacity = 3
//!     head ──► [a] ◄──► [b] ◄──► [c] ◄── tail
//!     1. remove_from_head() yields Entry { key: a, .. }
//!     2. index.remove(&a)          (same entry, same key)
//!     3. add_to_tail(Entry { key: d, value: 4 }), index.insert(d, id)
//!     head ──► [b] ◄──► [c] ◄──► [d] ◄── tail
//!
//!   get(b)
//!     1. index lookup: O(1)
//!     2. move_to_tail(id): O(1), the node is relinked, not recreated
//!     head ──► [c] ◄──► [d] ◄──► [b] ◄── tail
//! ```
//!
//! ## Methods
//!
//! | Method             | Complexity | Description                              |
//! |--------------------|------------|------------------------------------------|
//! | `new(capacity)`    | O(1)       | Create cache, panics on zero capacity    |
//! | `try_new(capacity)`| O(1)       | Create cache, `ConfigError` on zero      |
//! | `get(&k)`          | O(1)       | Get value, moves entry to MRU end        |
//! | `set(k, v)`        | O(1)       | Insert or update, may evict the LRU      |
//! | `peek(&k)`         | O(1)       | Get value without touching recency       |
//! | `peek_lru()`       | O(1)       | Next eviction victim                     |
//! | `touch(&k)`        | O(1)       | Move to MRU without reading              |
//! | `recency_rank(&k)` | O(n)       | Position from the LRU end (0 = LRU)      |
//! | `size()`           | O(1)       | Current number of entries                |
//! | `clear()`          | O(n)       | Remove all entries                       |
//!
//! ## Thread Safety
//!
//! `LruCache` is single-threaded. Shared use needs one lock around the whole
//! cache, since the index and the list must change together.
//!
//! ## Example
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! // "b" is now least recently used and is evicted.
//! cache.set("c", 3);
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.size(), 2);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::builder::CacheConfig;
use crate::ds::{OrderedList, SlotId};
use crate::error::{ConfigError, InvariantError};

/// Capacity used by [`LruCache::default`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Payload stored in each list node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

/// Fixed-capacity LRU cache.
///
/// Keys are cloned once on insertion: one copy lives in the index, the other
/// in the list entry so eviction can find the index slot to clear.
pub struct LruCache<K, V> {
    list: OrderedList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates a cache, returning an error on invalid parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_config(CacheConfig {
            capacity,
            ..CacheConfig::default()
        })
    }

    /// Creates a cache from a [`CacheConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config.capacity` is zero.
    pub fn try_with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        if config.capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than zero"));
        }

        let (list, index) = if config.prealloc {
            (
                OrderedList::with_capacity(config.capacity),
                FxHashMap::with_capacity_and_hasher(config.capacity, Default::default()),
            )
        } else {
            (OrderedList::new(), FxHashMap::default())
        };

        log::debug!(
            "lru cache created: capacity={} prealloc={}",
            config.capacity,
            config.prealloc
        );

        Ok(Self {
            list,
            index,
            capacity: config.capacity,
        })
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss returns `None` and changes nothing.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        let moved = self.list.move_to_tail(id);
        debug_assert!(moved, "index holds a handle the list does not know");
        self.debug_check();
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Stores `value` under `key` and marks it most recently used.
    ///
    /// An existing entry is updated in place and its previous value returned.
    /// A new key at capacity first evicts the least recently used entry.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let previous = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.list.move_to_tail(id);
            debug_assert!(previous.is_some(), "index holds a handle the list does not know");
            self.debug_check();
            return previous;
        }

        if self.list.size() >= self.capacity {
            self.evict_lru();
        }

        let id = self.list.add_to_tail(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        self.debug_check();
        None
    }

    /// Returns the value for `key` without changing recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the entry that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.head().map(|entry| (&entry.key, &entry.value))
    }

    /// Marks `key` most recently used without reading it.
    ///
    /// Returns `false` if the key is not resident.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&id) => {
                let moved = self.list.move_to_tail(id);
                self.debug_check();
                moved
            },
            None => false,
        }
    }

    /// Returns the position of `key` counted from the LRU end (0 = next to
    /// be evicted). O(n).
    pub fn recency_rank<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let &target = self.index.get(key)?;
        self.list.iter_ids().position(|id| id == target)
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Iterates keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    /// Returns the number of resident entries.
    pub fn size(&self) -> usize {
        self.list.size()
    }

    /// Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.list.size()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry. Capacity is unchanged.
    pub fn clear(&mut self) {
        log::debug!("lru cache cleared: dropped {} entries", self.list.size());
        self.list.clear();
        self.index.clear();
    }

    /// Verifies that the index and the list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;

        if self.index.len() != self.list.size() {
            return Err(InvariantError::new(format!(
                "index size {} != list size {}",
                self.index.len(),
                self.list.size()
            )));
        }
        if self.list.size() > self.capacity {
            return Err(InvariantError::new(format!(
                "list size {} exceeds capacity {}",
                self.list.size(),
                self.capacity
            )));
        }
        for (position, (id, entry)) in self.list.iter_entries().enumerate() {
            match self.index.get(&entry.key) {
                Some(&indexed) if indexed == id => {},
                Some(&indexed) => {
                    return Err(InvariantError::new(format!(
                        "list position {} holds {:?} but index points at {:?}",
                        position, id, indexed
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "list position {} holds a key missing from the index",
                        position
                    )));
                },
            }
        }
        Ok(())
    }

    /// Removes the head entry and its index slot in one step, keyed by the
    /// entry actually removed.
    fn evict_lru(&mut self) -> Option<Entry<K, V>> {
        let evicted = self.list.remove_from_head()?;
        self.index.remove(&evicted.key);
        log::trace!(
            "lru cache evicted least recently used entry (size {}/{})",
            self.list.size(),
            self.capacity
        );
        Some(evicted)
    }

    #[inline]
    fn debug_check(&self) {
        #[cfg(debug_assertions)]
        {
            if let Err(err) = self.check_invariants() {
                panic!("lru cache invariant violated: {}", err);
            }
        }
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a cache with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.list.size())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of<K: Clone + Eq + Hash, V>(cache: &LruCache<K, V>) -> Vec<K> {
        cache.keys().cloned().collect()
    }

    // ==============================================
    // Construction
    // ==============================================

    mod construction {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: LruCache<u32, u32> = LruCache::new(3);
            assert_eq!(cache.size(), 0);
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.peek_lru(), None);
        }

        #[test]
        fn try_new_rejects_zero_capacity() {
            let err = LruCache::<u32, u32>::try_new(0).unwrap_err();
            assert_eq!(err.message(), "cache capacity must be greater than zero");
        }

        #[test]
        #[should_panic(expected = "cache capacity must be greater than zero")]
        fn new_panics_on_zero_capacity() {
            let _cache: LruCache<u32, u32> = LruCache::new(0);
        }

        #[test]
        fn default_uses_default_capacity() {
            let cache: LruCache<String, i32> = LruCache::default();
            assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
        }

        #[test]
        fn debug_shows_len_and_capacity() {
            let mut cache = LruCache::new(4);
            cache.set(1, "one");
            let dbg = format!("{:?}", cache);
            assert!(dbg.contains("len: 1"));
            assert!(dbg.contains("capacity: 4"));
        }
    }

    // ==============================================
    // get / set
    // ==============================================

    mod get_set {
        use super::*;

        #[test]
        fn get_miss_has_no_side_effects() {
            let mut cache = LruCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            assert_eq!(cache.get(&"zzz"), None);
            assert_eq!(keys_of(&cache), vec!["a", "b"]);
            assert_eq!(cache.size(), 2);
        }

        #[test]
        fn get_promotes_to_most_recent() {
            let mut cache = LruCache::new(3);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);

            assert_eq!(cache.get(&"a"), Some(&1));
            assert_eq!(keys_of(&cache), vec!["b", "c", "a"]);
        }

        #[test]
        fn set_existing_updates_in_place() {
            let mut cache = LruCache::new(3);
            assert_eq!(cache.set("x", 1), None);
            assert_eq!(cache.set("x", 2), Some(1));
            assert_eq!(cache.size(), 1);
            assert_eq!(cache.get(&"x"), Some(&2));
        }

        #[test]
        fn set_existing_moves_to_most_recent() {
            let mut cache = LruCache::new(3);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);
            cache.set("a", 10);
            assert_eq!(keys_of(&cache), vec!["b", "c", "a"]);
        }

        #[test]
        fn set_new_at_capacity_evicts_head() {
            let mut cache = LruCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);
            assert!(!cache.contains(&"a"));
            assert_eq!(keys_of(&cache), vec!["b", "c"]);
        }

        #[test]
        fn update_at_capacity_does_not_evict() {
            let mut cache = LruCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("a", 3);
            assert_eq!(cache.size(), 2);
            assert!(cache.contains(&"b"));
        }

        #[test]
        fn capacity_one_replaces_entry() {
            let mut cache = LruCache::new(1);
            cache.set("a", 1);
            cache.set("b", 2);
            assert_eq!(cache.get(&"a"), None);
            assert_eq!(cache.get(&"b"), Some(&2));
            assert_eq!(cache.size(), 1);
        }

        #[test]
        fn borrowed_key_lookup() {
            let mut cache: LruCache<String, u32> = LruCache::new(2);
            cache.set("alpha".to_string(), 1);
            assert_eq!(cache.get("alpha"), Some(&1));
            assert!(cache.contains("alpha"));
            assert_eq!(cache.peek("beta"), None);
        }

        #[test]
        fn evicted_slot_is_reused_without_confusing_index() {
            let mut cache = LruCache::new(2);
            for i in 0..100u32 {
                cache.set(i, i * 2);
            }
            assert_eq!(keys_of(&cache), vec![98, 99]);
            assert_eq!(cache.get(&98), Some(&196));
            cache.check_invariants().unwrap();
        }
    }

    // ==============================================
    // Observation helpers
    // ==============================================

    mod observation {
        use super::*;

        #[test]
        fn peek_does_not_promote() {
            let mut cache = LruCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            assert_eq!(cache.peek(&"a"), Some(&1));
            cache.set("c", 3);
            assert!(!cache.contains(&"a"));
        }

        #[test]
        fn peek_lru_names_next_victim() {
            let mut cache = LruCache::new(3);
            cache.set("a", 1);
            cache.set("b", 2);
            assert_eq!(cache.peek_lru(), Some((&"a", &1)));
            cache.get(&"a");
            assert_eq!(cache.peek_lru(), Some((&"b", &2)));
        }

        #[test]
        fn touch_promotes_without_reading() {
            let mut cache = LruCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            assert!(cache.touch(&"a"));
            assert!(!cache.touch(&"missing"));
            cache.set("c", 3);
            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
        }

        #[test]
        fn recency_rank_counts_from_lru_end() {
            let mut cache = LruCache::new(3);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);
            assert_eq!(cache.recency_rank(&"a"), Some(0));
            assert_eq!(cache.recency_rank(&"c"), Some(2));
            cache.get(&"a");
            assert_eq!(cache.recency_rank(&"a"), Some(2));
            assert_eq!(cache.recency_rank(&"b"), Some(0));
            assert_eq!(cache.recency_rank(&"zzz"), None);
        }

        #[test]
        fn iter_runs_lru_to_mru() {
            let mut cache = LruCache::new(3);
            cache.set(1, "one");
            cache.set(2, "two");
            cache.get(&1);
            let pairs: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            assert_eq!(pairs, vec![(2, "two"), (1, "one")]);
        }

        #[test]
        fn clear_keeps_capacity() {
            let mut cache = LruCache::new(2);
            cache.set(1, 1);
            cache.set(2, 2);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 2);
            assert_eq!(cache.get(&1), None);
            cache.set(3, 3);
            assert_eq!(cache.size(), 1);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn extend_applies_sets_in_order() {
            let mut cache = LruCache::new(2);
            cache.extend(vec![("a", 1), ("b", 2), ("c", 3)]);
            assert_eq!(keys_of(&cache), vec!["b", "c"]);
        }
    }

    // ==============================================
    // Property tests
    // ==============================================

    mod property_tests {
        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Set(u8, u32),
            Get(u8),
            Touch(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
                (0u8..16).prop_map(Op::Get),
                (0u8..16).prop_map(Op::Touch),
            ]
        }

        proptest! {
            /// The cache matches a naive recency-ordered `Vec` model.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_matches_naive_model(
                capacity in 1usize..8,
                ops in prop::collection::vec(op_strategy(), 0..200)
            ) {
                let mut cache = LruCache::new(capacity);
                // LRU first, MRU last.
                let mut model: Vec<(u8, u32)> = Vec::new();

                for op in ops {
                    match op {
                        Op::Set(k, v) => {
                            let previous = match model.iter().position(|(mk, _)| *mk == k) {
                                Some(pos) => Some(model.remove(pos).1),
                                None => {
                                    if model.len() == capacity {
                                        model.remove(0);
                                    }
                                    None
                                },
                            };
                            model.push((k, v));
                            prop_assert_eq!(cache.set(k, v), previous);
                        },
                        Op::Get(k) => {
                            let position = model.iter().position(|(mk, _)| *mk == k);
                            let expected = position.map(|pos| {
                                let entry = model.remove(pos);
                                model.push(entry);
                                entry.1
                            });
                            prop_assert_eq!(cache.get(&k).copied(), expected);
                        },
                        Op::Touch(k) => {
                            let found = match model.iter().position(|(mk, _)| *mk == k) {
                                Some(pos) => {
                                    let entry = model.remove(pos);
                                    model.push(entry);
                                    true
                                },
                                None => false,
                            };
                            prop_assert_eq!(cache.touch(&k), found);
                        },
                    }

                    prop_assert!(cache.size() <= capacity);
                    prop_assert!(cache.check_invariants().is_ok());
                    let order: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(order, model.clone());
                }
            }

            /// Repeated gets of one key leave size and the others' order alone.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_repeated_get_is_idempotent(
                keys in prop::collection::vec(0u8..32, 1..20),
                repeats in 1usize..5
            ) {
                let mut cache = LruCache::new(8);
                for &k in &keys {
                    cache.set(k, u32::from(k));
                }
                let target = keys[keys.len() - 1];
                cache.get(&target);
                let size = cache.size();
                let snapshot: Vec<u8> = cache.keys().copied().collect();

                for _ in 0..repeats {
                    prop_assert_eq!(cache.get(&target).copied(), Some(u32::from(target)));
                }
                prop_assert_eq!(cache.size(), size);
                let after: Vec<u8> = cache.keys().copied().collect();
                prop_assert_eq!(after, snapshot);
            }
        }
    }
}
