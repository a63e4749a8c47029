//! Index-stable slot storage with an embedded free list.
//!
//! Backs [`IntrusiveList`](crate::ds::IntrusiveList): nodes live in a `Vec`
//! and are addressed by [`SlotId`], so links survive insertions and removals
//! elsewhere in the arena. Vacant slots form a singly linked free list threaded
//! through the vector itself, which keeps reuse O(1) without a side `Vec`.
//!
//! ```text
//!   slots: [ Occupied(a) | Vacant(next: 3) | Occupied(b) | Vacant(next: none) ]
//!   free_head ──────────────────► 1 ──────────────────────► 3
//! ```

/// Stable handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

/// Arena of `T` values addressed by [`SlotId`].
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value`, reusing the most recently freed slot if one exists.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        if let Some(idx) = self.free_head {
            if let Slot::Vacant { next_free } = &self.slots[idx] {
                self.free_head = *next_free;
            }
            self.slots[idx] = Slot::Occupied(value);
            return SlotId(idx);
        }
        self.slots.push(Slot::Occupied(value));
        SlotId(self.slots.len() - 1)
    }

    /// Frees the slot and returns its value; `None` if already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        let Slot::Occupied(value) = std::mem::replace(slot, vacant) else {
            return None;
        };
        self.free_head = Some(id.0);
        self.len -= 1;
        Some(value)
    }

    /// Returns the value in an occupied slot.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns a mutable reference to the value in an occupied slot.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns `true` if `id` refers to an occupied slot.
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
