//! Doubly linked recency list backed by `SlotArena`.
//!
//! Nodes live in a generational [`SlotArena`] and link to each other by
//! [`SlotId`]. A handle returned from `add_to_head`/`add_to_tail` stays valid
//! while its node is in the list, including across `move_to_head` and
//! `move_to_tail`; once the node is removed the handle is rejected.
//!
//! ## Architecture
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!   (least recently used)        (most recently used)
//! ```
//!
//! ## Performance
//! - `add_to_head` / `add_to_tail`: O(1)
//! - `remove_from_head` / `remove_from_tail` / `remove`: O(1)
//! - `move_to_head` / `move_to_tail`: O(1), relinks the node in place
//! - `iter`, `max`, `check_invariants`: O(n)
//!
//! ## Invalid handles
//! `remove` returns `None` and `move_to_*` return `false` for a handle that
//! is not a live node of this list. The list is left untouched in that case.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed doubly linked list with stable `SlotId` handles.
#[derive(Debug)]
pub struct OrderedList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> OrderedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of nodes in the list.
    pub fn size(&self) -> usize {
        self.arena.len()
    }

    /// Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a node in this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the value at the head.
    pub fn head(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    pub fn head_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Returns the value at the tail.
    pub fn tail(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn tail_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Returns an iterator from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Returns an iterator of handles from head to tail.
    pub fn iter_ids(&self) -> IdIter<'_, T> {
        IdIter {
            list: self,
            current: self.head,
        }
    }

    /// Returns an iterator of `(SlotId, &T)` from head to tail.
    pub fn iter_entries(&self) -> EntryIter<'_, T> {
        EntryIter {
            list: self,
            current: self.head,
        }
    }

    /// Inserts `value` as the new head and returns its handle.
    pub fn add_to_head(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(node) = self.arena.get_mut(head) {
                node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.debug_check();
        id
    }

    /// Inserts `value` as the new tail and returns its handle.
    pub fn add_to_tail(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        if let Some(tail) = self.tail {
            if let Some(node) = self.arena.get_mut(tail) {
                node.next = Some(id);
            }
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        self.debug_check();
        id
    }

    /// Removes and returns the head value, or `None` if the list is empty.
    pub fn remove_from_head(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    /// Removes and returns the tail value, or `None` if the list is empty.
    pub fn remove_from_tail(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks the node `id` and returns its value.
    ///
    /// Returns `None` without touching the list if `id` is stale. Handles are
    /// only meaningful for the list that issued them; a handle from another
    /// list is rejected only when it names no live slot here.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        if self.detach(id).is_none() {
            log::trace!("ordered list: remove rejected invalid handle {:?}", id);
            return None;
        }
        let value = self.arena.remove(id).map(|node| node.value);
        self.debug_check();
        value
    }

    /// Moves an existing node to the head; returns `false` if `id` is not present.
    pub fn move_to_head(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            log::trace!("ordered list: move_to_head rejected invalid handle {:?}", id);
            return false;
        }
        if Some(id) == self.head {
            return true;
        }
        self.detach(id);
        self.attach_head(id);
        self.debug_check();
        true
    }

    /// Moves an existing node to the tail; returns `false` if `id` is not present.
    pub fn move_to_tail(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            log::trace!("ordered list: move_to_tail rejected invalid handle {:?}", id);
            return false;
        }
        if Some(id) == self.tail {
            return true;
        }
        self.detach(id);
        self.attach_tail(id);
        self.debug_check();
        true
    }

    /// Removes every node. Handles issued before the clear become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Returns the largest value in the list. O(n).
    pub fn max(&self) -> Option<&T>
    where
        T: Ord,
    {
        self.iter().max()
    }

    /// Walks the list in both directions and verifies links, ends and count.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.len();
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() || len != 0 {
                return Err(InvariantError::new(format!(
                    "head {:?} / tail {:?} inconsistent with len {}",
                    self.head, self.tail, len
                )));
            }
            return Ok(());
        }
        if len == 1 && self.head != self.tail {
            return Err(InvariantError::new("single node but head != tail"));
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("forward walk: stale id {:?}", id)))?;
            if node.prev != prev {
                return Err(InvariantError::new(format!(
                    "node {:?} prev is {:?}, expected {:?}",
                    id, node.prev, prev
                )));
            }
            count += 1;
            if count > len {
                return Err(InvariantError::new("forward walk exceeds len (cycle?)"));
            }
            prev = Some(id);
            current = node.next;
        }
        if prev != self.tail {
            return Err(InvariantError::new(format!(
                "forward walk ended at {:?}, tail is {:?}",
                prev, self.tail
            )));
        }
        if count != len {
            return Err(InvariantError::new(format!(
                "forward walk counted {} but len = {}",
                count, len
            )));
        }

        let mut back_count = 0usize;
        let mut current = self.tail;
        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("backward walk: stale id {:?}", id)))?;
            back_count += 1;
            if back_count > len {
                return Err(InvariantError::new("backward walk exceeds len (cycle?)"));
            }
            current = node.prev;
        }
        if back_count != len {
            return Err(InvariantError::new(format!(
                "backward walk counted {} but len = {}",
                back_count, len
            )));
        }
        Ok(())
    }

    #[inline]
    fn debug_check(&self) {
        #[cfg(debug_assertions)]
        {
            if let Err(err) = self.check_invariants() {
                panic!("ordered list invariant violated: {}", err);
            }
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_head(&mut self, id: SlotId) -> Option<()> {
        let old_head = self.head;
        let node = self.arena.get_mut(id)?;
        node.prev = None;
        node.next = old_head;
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        Some(())
    }

    fn attach_tail(&mut self, id: SlotId) -> Option<()> {
        let old_tail = self.tail;
        let node = self.arena.get_mut(id)?;
        node.next = None;
        node.prev = old_tail;
        if let Some(old_tail) = old_tail {
            if let Some(tail_node) = self.arena.get_mut(old_tail) {
                tail_node.next = Some(id);
            }
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        Some(())
    }
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values from head to tail.
pub struct Iter<'a, T> {
    list: &'a OrderedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Iterator over handles from head to tail.
pub struct IdIter<'a, T> {
    list: &'a OrderedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for IdIter<'a, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(id)
    }
}

/// Iterator over `(SlotId, &T)` pairs from head to tail.
pub struct EntryIter<'a, T> {
    list: &'a OrderedList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for EntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some((id, &node.value))
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
