//! Cache builder.
//!
//! Collects the construction-time choices (size budget, variant,
//! pre-allocation hints) and validates them in one place.
//!
//! ## Example
//!
//! ```rust
//! use lfukit::builder::LfuCacheBuilder;
//! use lfukit::policy::placement::Variant;
//!
//! let mut cache = LfuCacheBuilder::new(1024)
//!     .variant(Variant::Perfect)
//!     .expected_keys(256)
//!     .build()
//!     .unwrap();
//! cache.access(7, 16).unwrap();
//! assert!(cache.contains(7));
//! ```

use crate::error::ConfigError;
use crate::policy::lfu::LfuCache;
use crate::policy::placement::Variant;

/// Default bucket-arena preallocation.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// Builder for [`LfuCache`].
#[derive(Debug, Clone)]
pub struct LfuCacheBuilder {
    capacity: u32,
    variant: Variant,
    expected_keys: usize,
    bucket_hint: usize,
}

impl LfuCacheBuilder {
    /// Create a new builder for a cache with the given size budget.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            variant: Variant::default(),
            expected_keys: 0,
            bucket_hint: DEFAULT_BUCKET_PREALLOC,
        }
    }

    /// LFU flavour. Defaults to [`Variant::FastPerfect`].
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Number of resident keys to pre-allocate for.
    pub fn expected_keys(mut self, expected_keys: usize) -> Self {
        self.expected_keys = expected_keys;
        self
    }

    /// Number of distinct frequencies to pre-allocate buckets for.
    pub fn bucket_hint(mut self, bucket_hint: usize) -> Self {
        self.bucket_hint = bucket_hint;
        self
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Validates the configuration and opens the cache.
    ///
    /// Fails if the capacity is zero or the pre-allocation cannot be made.
    pub fn build(self) -> Result<LfuCache, ConfigError> {
        LfuCache::with_config(
            self.capacity,
            self.variant,
            self.expected_keys,
            self.bucket_hint,
        )
    }
}
