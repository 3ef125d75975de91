//! Bucket placement strategies for admitted items.
//!
//! The three LFU variants share one skeleton (key index, hit path, eviction
//! loop) and differ only in two things:
//!
//! - how a missed item finds its bucket in the chain, and
//! - whether evicted items are remembered in a ghost index.
//!
//! Both are fixed at construction time by [`Variant`]. Placement is the
//! [`BucketPlacement`] strategy object built by [`Variant::placement`].
//!
//! ```text
//!   Variant        Placement              Cost     Ghosts
//!   ─────────────  ─────────────────────  ───────  ──────
//!   Basic          HeadPlacement          O(1)     no
//!   Perfect        LinearScanPlacement    O(U)     yes
//!   FastPerfect    IndexedPlacement       O(log U) yes
//! ```
//!
//! Strategies are also [`BucketListener`]s: the chain reports every bucket
//! link and unlink to the strategy that placed into it, so
//! [`IndexedPlacement`] stays in lockstep with the chain without the cache
//! having to mirror anything by hand.

use std::fmt;
use std::str::FromStr;

use crate::ds::bucket_chain::{BucketChain, BucketId, BucketListener, Splice};
use crate::ds::frequency_index::FrequencyIndex;
use crate::error::{ConfigError, InvariantError};

/// LFU flavour selected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Classic O(1) LFU: every miss starts at frequency 1, evictions are
    /// forgotten.
    Basic,
    /// Remembers evicted frequencies; restored items are placed by a linear
    /// scan of the chain.
    Perfect,
    /// Same as `Perfect`, with an ordered index for placement.
    #[default]
    FastPerfect,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Basic, Variant::Perfect, Variant::FastPerfect];

    /// Whether evicted items are kept in a ghost index.
    pub fn remembers_evictions(self) -> bool {
        !matches!(self, Variant::Basic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Perfect => "perfect",
            Variant::FastPerfect => "fast-perfect",
        }
    }

    /// Builds the placement strategy for this variant.
    pub fn placement(self) -> Box<dyn BucketPlacement> {
        match self {
            Variant::Basic => Box::new(HeadPlacement),
            Variant::Perfect => Box::new(LinearScanPlacement),
            Variant::FastPerfect => Box::new(IndexedPlacement::default()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "basic" => Ok(Variant::Basic),
            "perfect" => Ok(Variant::Perfect),
            "fast-perfect" | "fastperfect" => Ok(Variant::FastPerfect),
            _ => Err(ConfigError::new(format!(
                "unknown LFU variant '{s}' (expected basic, perfect or fast-perfect)"
            ))),
        }
    }
}

/// Answers "where in the chain does an item of frequency `f` go?".
///
/// Implementations return [`Splice::Existing`] when a bucket of exactly `f`
/// is live, [`Splice::Before`] naming the smallest bucket above `f`, or
/// [`Splice::Tail`] when every bucket is lower.
pub trait BucketPlacement: BucketListener + fmt::Debug + Send {
    fn locate(&self, chain: &BucketChain, frequency: u32) -> Splice;

    /// Checks any state the strategy mirrors from the chain.
    fn check(&self, _chain: &BucketChain) -> Result<(), InvariantError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}

/// Basic LFU placement.
///
/// Misses always enter at frequency 1, which is the chain head whenever a
/// frequency-1 bucket exists; otherwise a new bucket is prepended. Any other
/// frequency falls back to a scan so the strategy never breaks ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadPlacement;

impl BucketListener for HeadPlacement {
    fn bucket_linked(&mut self, _frequency: u32, _bucket: BucketId) {}
    fn bucket_unlinked(&mut self, _frequency: u32, _bucket: BucketId) {}
}

impl BucketPlacement for HeadPlacement {
    fn locate(&self, chain: &BucketChain, frequency: u32) -> Splice {
        let Some(head) = chain.head() else {
            return Splice::Tail;
        };
        match chain.bucket_frequency(head) {
            Some(f) if f == frequency => Splice::Existing(head),
            Some(f) if f > frequency => Splice::Before(head),
            _ => chain.scan_at_least(frequency),
        }
    }

    fn name(&self) -> &'static str {
        "head"
    }
}

/// Perfect LFU placement: walk the chain from the head.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearScanPlacement;

impl BucketListener for LinearScanPlacement {
    fn bucket_linked(&mut self, _frequency: u32, _bucket: BucketId) {}
    fn bucket_unlinked(&mut self, _frequency: u32, _bucket: BucketId) {}
}

impl BucketPlacement for LinearScanPlacement {
    fn locate(&self, chain: &BucketChain, frequency: u32) -> Splice {
        chain.scan_at_least(frequency)
    }

    fn name(&self) -> &'static str {
        "linear-scan"
    }
}

/// Fast-Perfect LFU placement: ceiling lookup in an ordered index that
/// mirrors the chain's buckets.
#[derive(Debug, Default, Clone)]
pub struct IndexedPlacement {
    index: FrequencyIndex,
}

impl IndexedPlacement {
    pub fn index(&self) -> &FrequencyIndex {
        &self.index
    }
}

impl BucketListener for IndexedPlacement {
    fn bucket_linked(&mut self, frequency: u32, bucket: BucketId) {
        self.index.bucket_linked(frequency, bucket);
    }

    fn bucket_unlinked(&mut self, frequency: u32, bucket: BucketId) {
        self.index.bucket_unlinked(frequency, bucket);
    }
}

impl BucketPlacement for IndexedPlacement {
    fn locate(&self, _chain: &BucketChain, frequency: u32) -> Splice {
        self.index.splice_for(frequency)
    }

    fn check(&self, chain: &BucketChain) -> Result<(), InvariantError> {
        self.index.check_mirrors(chain)
    }

    fn name(&self) -> &'static str {
        "indexed"
    }
}
