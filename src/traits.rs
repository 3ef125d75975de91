//! # Trace-Driven Cache Contract
//!
//! The cache is consumed by a trace replayer that only needs four things:
//! open a cache, feed it references, read statistics, close it. This module
//! names that contract so replayers (benchmarks, simulators, fuzzers) can be
//! written once against any implementation.
//!
//! ```text
//!   ┌─────────────────────────────────────────────┐
//!   │               TraceCache                    │
//!   │                                             │
//!   │  open(capacity, variant) → Self             │
//!   │  access(&mut, key, size) → Hit | Miss       │
//!   │  stats(&) → Stats                           │
//!   │  close(self) → Stats                        │
//!   │                                             │
//!   │  replay(&mut, trace) → Replay   (provided)  │
//!   └─────────────────────────────────────────────┘
//! ```
//!
//! ## Implementation Notes
//!
//! - `close` takes `self`, so a closed cache cannot be used again.
//! - Errors from `access` are fatal for the reference that raised them;
//!   `replay` stops at the first one.

use crate::error::{AccessError, ConfigError};
use crate::policy::lfu::{Access, CacheStats, LfuCache};
use crate::policy::placement::Variant;

/// Hit/miss tally produced by [`TraceCache::replay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Replay {
    pub hits: u64,
    pub misses: u64,
}

impl Replay {
    pub fn references(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_ratio(&self) -> f64 {
        match self.references() {
            0 => 0.0,
            refs => self.hits as f64 / refs as f64,
        }
    }
}

/// Operations a trace replayer drives.
///
/// # Example
///
/// ```
/// use lfukit::policy::lfu::LfuCache;
/// use lfukit::policy::placement::Variant;
/// use lfukit::traits::TraceCache;
///
/// fn hit_ratio<C: TraceCache>(capacity: u32, variant: Variant, keys: &[u64]) -> f64 {
///     let mut cache = C::open(capacity, variant).unwrap();
///     let replay = cache.replay(keys.iter().map(|&k| (k, 1))).unwrap();
///     cache.close();
///     replay.hit_ratio()
/// }
///
/// let ratio = hit_ratio::<LfuCache>(2, Variant::Basic, &[1, 2, 1, 3, 1]);
/// assert!((ratio - 0.4).abs() < 1e-9);
/// ```
pub trait TraceCache: Sized {
    type Stats;

    /// Opens a cache with a size budget of `capacity`.
    fn open(capacity: u32, variant: Variant) -> Result<Self, ConfigError>;

    /// Processes one reference.
    fn access(&mut self, key: u64, size: u32) -> Result<Access, AccessError>;

    fn stats(&self) -> Self::Stats;

    /// Releases the cache, returning its final statistics.
    fn close(self) -> Self::Stats;

    /// Feeds every `(key, size)` reference in order.
    fn replay<I>(&mut self, trace: I) -> Result<Replay, AccessError>
    where
        I: IntoIterator<Item = (u64, u32)>,
    {
        let mut tally = Replay::default();
        for (key, size) in trace {
            match self.access(key, size)? {
                Access::Hit => tally.hits += 1,
                Access::Miss => tally.misses += 1,
            }
        }
        Ok(tally)
    }
}

impl TraceCache for LfuCache {
    type Stats = CacheStats;

    fn open(capacity: u32, variant: Variant) -> Result<Self, ConfigError> {
        LfuCache::open(capacity, variant)
    }

    fn access(&mut self, key: u64, size: u32) -> Result<Access, AccessError> {
        LfuCache::access(self, key, size)
    }

    fn stats(&self) -> CacheStats {
        LfuCache::stats(self)
    }

    fn close(self) -> CacheStats {
        LfuCache::close(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_tallies_hits_and_misses() {
        let mut cache = <LfuCache as TraceCache>::open(2, Variant::Basic).unwrap();
        let replay = cache
            .replay([(1, 1), (2, 1), (1, 1), (3, 1), (1, 1)])
            .unwrap();
        assert_eq!(replay, Replay { hits: 2, misses: 3 });
        assert_eq!(replay.references(), 5);
        assert_eq!(TraceCache::stats(&cache).total_refs, 5);
    }

    #[test]
    fn replay_stops_at_first_error() {
        let mut cache = <LfuCache as TraceCache>::open(4, Variant::Perfect).unwrap();
        let err = cache.replay([(1, 1), (2, 9), (3, 1)]).unwrap_err();
        assert!(matches!(err, AccessError::Config(_)));
        assert!(!cache.contains(3));
        assert_eq!(TraceCache::close(cache).total_refs, 1);
    }

    #[test]
    fn empty_replay_has_zero_ratio() {
        assert_eq!(Replay::default().hit_ratio(), 0.0);
    }
}
