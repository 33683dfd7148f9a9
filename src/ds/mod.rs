pub mod ordered_list;
pub mod slot_arena;

pub use ordered_list::OrderedList;
pub use slot_arena::{SlotArena, SlotId};
