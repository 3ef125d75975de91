pub use crate::builder::LfuCacheBuilder;
pub use crate::ds::{GhostEntry, SlotArena, SlotId};
pub use crate::error::{AccessError, AllocError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
pub use crate::policy::lfu::{Access, CacheStats, LfuCache};
pub use crate::policy::placement::{BucketPlacement, Variant};
pub use crate::traits::{Replay, TraceCache};
