pub mod lfu;
pub mod placement;
