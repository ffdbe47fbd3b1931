pub mod freq_buckets;
pub mod slot_arena;

pub use freq_buckets::FrequencyBuckets;
pub use slot_arena::{SlotArena, SlotId};
