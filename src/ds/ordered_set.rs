//! Insertion-ordered set of keys with O(1) lookup and repositioning.
//!
//! Pairs an [`IntrusiveList`] of keys with an index from key to node handle,
//! giving the "ordered map as ordered set" behaviour the LIRS recency stack
//! and resident-HIR queue both need.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        list: IntrusiveList<K>
//!   ┌─────────┬─────────┐              head ─► [A] ◄──► [B] ◄──► [C] ◄── tail
//!   │  key A  │  id_1   │                    oldest             newest
//!   │  key B  │  id_2   │
//!   │  key C  │  id_3   │
//!   └─────────┴─────────┘
//! ```
//!
//! The front is always the least recently pushed or touched key and the back
//! the most recent one. There is no capacity: bounding is the caller's job.
//!
//! ## Performance
//! - `contains` / `push_back` / `touch` / `remove`: O(1) average
//! - `front` / `back` / `pop_front`: O(1)
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::{IntrusiveList, Iter};
use crate::ds::slot_arena::SlotId;

/// Unique-membership sequence of keys, oldest at the front.
#[derive(Debug)]
pub struct OrderedSet<K> {
    list: IntrusiveList<K>,
    index: FxHashMap<K, SlotId>,
}

impl<K> OrderedSet<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            list: IntrusiveList::new(),
            index: FxHashMap::default(),
        }
    }

    /// Creates an empty set with room for `capacity` keys before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the set has no keys.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is in the set.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Oldest key.
    pub fn front(&self) -> Option<&K> {
        self.list.front()
    }

    /// Newest key.
    pub fn back(&self) -> Option<&K> {
        self.list.back()
    }

    /// Makes `key` the newest entry, inserting it if absent.
    ///
    /// Returns `true` if the key was newly inserted.
    pub fn push_back(&mut self, key: K) -> bool {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_back(id);
            return false;
        }
        let id = self.list.push_back(key.clone());
        self.index.insert(key, id);
        true
    }

    /// Moves an existing key to the back; returns `false` if it is absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_back(id),
            None => false,
        }
    }

    /// Removes and returns the oldest key.
    pub fn pop_front(&mut self) -> Option<K> {
        let key = self.list.pop_front()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Removes `key`; returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => self.list.remove(id).is_some(),
            None => false,
        }
    }

    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K> {
        self.list.iter()
    }

    /// Panics if the list and the key index disagree.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.list.len(), self.index.len());
        for key in self.list.iter() {
            let id = self.index.get(key).expect("listed key missing from index");
            assert!(self.list.get(*id) == Some(key), "index points at wrong node");
        }
    }
}

impl<K> Default for OrderedSet<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
