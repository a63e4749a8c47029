pub mod intrusive_list;
pub mod ordered_set;
pub mod slot_arena;

pub use intrusive_list::IntrusiveList;
pub use ordered_set::OrderedSet;
pub use slot_arena::{SlotArena, SlotId};
