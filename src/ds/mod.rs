pub mod bucket_chain;
pub mod frequency_index;
pub mod ghost_index;
pub mod slot_arena;

pub use bucket_chain::{BucketChain, BucketId, BucketListener, ChainAudit, ItemId, ItemMeta, Splice};
pub use frequency_index::FrequencyIndex;
pub use ghost_index::{GhostEntry, GhostIndex};
pub use slot_arena::{SlotArena, SlotId};
