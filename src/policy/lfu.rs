//! # LFU (Least Frequently Used) Cache
//!
//! Size-aware LFU admission/eviction cache with O(1) hits and O(1) evictions,
//! in three flavours selected at construction time by [`Variant`]:
//!
//! - **Basic**: classic LFU. Every miss enters at frequency 1.
//! - **Perfect**: evicted keys leave a ghost (last frequency and size); a key
//!   that comes back resumes at `frequency + 1` instead of starting over.
//!   Restored items are placed by a linear scan of the bucket chain.
//! - **FastPerfect**: Perfect, with an ordered frequency index for placement.
//!
//! The cache tracks keys and logical sizes only; it stores no values. It is
//! meant to be driven by a trace replayer that asks "would this access hit?".
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                               LfuCache                                   │
//!   │                                                                          │
//!   │   keys: FxHashMap<u64, ItemId>          ghosts: Option<GhostIndex>        │
//!   │          │                                       (Perfect, FastPerfect)   │
//!   │          ▼                                                               │
//!   │   chain: BucketChain                                                     │
//!   │   ┌────────┐   ┌────────┐   ┌────────┐                                   │
//!   │   │ freq=1 │ ⇄ │ freq=2 │ ⇄ │ freq=9 │      placement: Box<dyn           │
//!   │   │ k4 k9  │   │ k1     │   │ k5 k8  │        BucketPlacement>           │
//!   │   └────────┘   └────────┘   └────────┘        (head / scan / index)      │
//!   │     ▲ evict oldest of lowest bucket                                      │
//!   │                                                                          │
//!   │   capacity, current_size, total_keys, total_refs, hits, misses, ...      │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Access Flow
//!
//! ```text
//!   access(key, size)
//!        │
//!        ├── key resident? ──► promote to freq+1 (adjacent bucket) ──► Hit
//!        │
//!        ▼ miss
//!   ghost remembered?  ── yes ─► freq = ghost.freq + 1, size = ghost.size
//!        │ no
//!        ▼
//!   freq = 1, size = caller's size
//!        │
//!        ▼
//!   validate (size > 0, size <= capacity)   ──► ConfigError, nothing mutated
//!        │
//!        ▼
//!   evict oldest-of-lowest until current_size + size <= capacity
//!        │   (each victim → ghost, if enabled)
//!        ▼
//!   place via strategy, insert ──► Miss
//! ```
//!
//! ## Performance Characteristics
//!
//! | Operation            | Basic | Perfect | FastPerfect |
//! |----------------------|-------|---------|-------------|
//! | hit                  | O(1)  | O(1)    | O(1)        |
//! | fresh miss           | O(1)  | O(1)*   | O(log U)    |
//! | restored miss        | n/a   | O(U)    | O(log U)    |
//! | each eviction        | O(1)  | O(1)    | O(log U)    |
//!
//! U is the number of distinct frequencies. (*) a fresh miss scans until the
//! first bucket, which is the head.
//!
//! ## Thread Safety
//!
//! `LfuCache` is `Send` but not `Sync`. Every structure is mutated together
//! inside one access, so share it behind a single lock
//! (`parking_lot::Mutex<LfuCache>`).
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::policy::lfu::{Access, LfuCache};
//! use lfukit::policy::placement::Variant;
//!
//! let mut cache = LfuCache::open(2, Variant::Perfect).unwrap();
//! assert_eq!(cache.access(1, 1).unwrap(), Access::Miss);
//! assert_eq!(cache.access(2, 1).unwrap(), Access::Miss);
//! assert_eq!(cache.access(1, 1).unwrap(), Access::Hit);
//! assert_eq!(cache.access(3, 1).unwrap(), Access::Miss); // evicts 2
//!
//! assert_eq!(cache.frequency(1), Some(2));
//! assert!(!cache.contains(2));
//! assert_eq!(cache.ghost(2).map(|g| g.frequency), Some(1));
//!
//! let stats = cache.close();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 3);
//! ```

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::{debug, error, trace, warn};

use crate::builder::LfuCacheBuilder;
use crate::ds::bucket_chain::{BucketChain, BucketId, BucketListener, ItemId, ItemMeta};
use crate::ds::ghost_index::{GhostEntry, GhostIndex};
use crate::error::{AccessError, AllocError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsReset,
    MetricsSnapshotProvider,
};
use crate::policy::placement::{BucketPlacement, Variant};

/// Outcome of a single access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Hit,
    Miss,
}

impl Access {
    #[inline]
    pub fn is_hit(self) -> bool {
        matches!(self, Access::Hit)
    }
}

/// Point-in-time counters and gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub capacity: u32,
    /// Sum of resident item sizes.
    pub current_size: u64,
    /// Distinct keys ever admitted fresh (ghost restorations excluded).
    pub total_keys: u64,
    /// Accepted accesses. Rejected ones are not counted.
    pub total_refs: u64,
    pub distinct_frequencies: usize,
    pub hits: u64,
    pub misses: u64,
    /// Misses admitted from ghost memory.
    pub restored: u64,
    pub evictions: u64,
    pub resident_items: usize,
    pub ghost_entries: usize,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        if self.total_refs == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_refs as f64
        }
    }

    pub fn miss_ratio(&self) -> f64 {
        if self.total_refs == 0 {
            0.0
        } else {
            self.misses as f64 / self.total_refs as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "refs={} hits={} misses={} hit_ratio={:.4} keys={} restored={} evictions={} \
             size={}/{} items={} freqs={} ghosts={}",
            self.total_refs,
            self.hits,
            self.misses,
            self.hit_ratio(),
            self.total_keys,
            self.restored,
            self.evictions,
            self.current_size,
            self.capacity,
            self.resident_items,
            self.distinct_frequencies,
            self.ghost_entries,
        )
    }
}

/// Forwards chain bucket events to the placement strategy (and metrics).
struct BucketObserver<'a> {
    placement: &'a mut dyn BucketPlacement,
    #[cfg(feature = "metrics")]
    metrics: &'a mut LfuMetrics,
}

impl BucketListener for BucketObserver<'_> {
    fn bucket_linked(&mut self, frequency: u32, bucket: BucketId) {
        self.placement.bucket_linked(frequency, bucket);
        #[cfg(feature = "metrics")]
        self.metrics.record_bucket_created();
    }

    fn bucket_unlinked(&mut self, frequency: u32, bucket: BucketId) {
        self.placement.bucket_unlinked(frequency, bucket);
        #[cfg(feature = "metrics")]
        self.metrics.record_bucket_removed();
    }
}

/// Size-aware LFU cache over `u64` keys.
///
/// See module-level documentation for details.
#[derive(Debug)]
pub struct LfuCache {
    keys: FxHashMap<u64, ItemId>,
    chain: BucketChain,
    placement: Box<dyn BucketPlacement>,
    ghosts: Option<GhostIndex>,
    variant: Variant,
    capacity: u32,
    current_size: u64,
    total_keys: u64,
    total_refs: u64,
    hits: u64,
    misses: u64,
    restored: u64,
    evictions: u64,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl LfuCache {
    /// Opens a cache with the given size budget.
    ///
    /// Same as `LfuCacheBuilder::new(capacity).variant(variant).build()`.
    pub fn open(capacity: u32, variant: Variant) -> Result<Self, ConfigError> {
        LfuCacheBuilder::new(capacity).variant(variant).build()
    }

    pub(crate) fn with_config(
        capacity: u32,
        variant: Variant,
        expected_keys: usize,
        bucket_hint: usize,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            let err = ConfigError::new("capacity must be > 0");
            warn!(%variant, error = %err, "refusing to open LFU cache");
            return Err(err);
        }

        let mut keys = FxHashMap::default();
        keys.try_reserve(expected_keys).map_err(|e| {
            ConfigError::new(format!("cannot pre-allocate {expected_keys} keys: {e}"))
        })?;
        let mut chain = BucketChain::new();
        chain.try_reserve(expected_keys, bucket_hint).map_err(|e| {
            ConfigError::new(format!(
                "cannot pre-allocate {expected_keys} items / {bucket_hint} buckets: {e}"
            ))
        })?;
        let ghosts = variant.remembers_evictions().then(GhostIndex::new);

        debug!(capacity, %variant, expected_keys, bucket_hint, "opened LFU cache");

        Ok(Self {
            keys,
            chain,
            placement: variant.placement(),
            ghosts,
            variant,
            capacity,
            current_size: 0,
            total_keys: 0,
            total_refs: 0,
            hits: 0,
            misses: 0,
            restored: 0,
            evictions: 0,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        })
    }

    /// Processes one reference to `key`.
    ///
    /// `size` is ignored on a hit, and on a miss that is restored from ghost
    /// memory (the remembered size wins). On error nothing has been
    /// mutated, except for evictions already performed when an eviction step
    /// fails.
    pub fn access(&mut self, key: u64, size: u32) -> Result<Access, AccessError> {
        match self.keys.get(&key) {
            Some(&id) => self.hit(key, id).map(|()| Access::Hit),
            None => self.miss(key, size).map(|()| Access::Miss),
        }
    }

    fn hit(&mut self, key: u64, id: ItemId) -> Result<(), AccessError> {
        let mut observer = BucketObserver {
            placement: self.placement.as_mut(),
            #[cfg(feature = "metrics")]
            metrics: &mut self.metrics,
        };
        self.chain.promote(id, &mut observer).ok_or_else(|| {
            InvariantError::new(format!("key {key} is indexed but missing from the chain"))
        })?;

        self.total_refs += 1;
        self.hits += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_hit();
        Ok(())
    }

    fn miss(&mut self, key: u64, size: u32) -> Result<(), AccessError> {
        let ghost = self.ghosts.as_ref().and_then(|ghosts| ghosts.peek(key));
        let (frequency, admitted) = match ghost {
            Some(entry) => (entry.frequency.saturating_add(1), entry.size),
            None => (1, size),
        };

        if admitted == 0 {
            return Err(self.reject(key, ConfigError::new(format!(
                "key {key}: item size must be > 0"
            ))));
        }
        if admitted > self.capacity {
            return Err(self.reject(key, ConfigError::new(format!(
                "key {key}: size {admitted} exceeds capacity {}",
                self.capacity
            ))));
        }

        self.reserve_admission()?;
        self.make_room(admitted)?;

        if ghost.is_some()
            && let Some(ghosts) = self.ghosts.as_mut()
        {
            ghosts.recall(key);
        }

        let strategy = self.placement.name();
        let splice = self.placement.locate(&self.chain, frequency);
        let mut observer = BucketObserver {
            placement: self.placement.as_mut(),
            #[cfg(feature = "metrics")]
            metrics: &mut self.metrics,
        };
        let meta = ItemMeta {
            key,
            size: admitted,
            frequency,
        };
        let id = self
            .chain
            .insert(meta, splice, &mut observer)
            .ok_or_else(|| {
                InvariantError::new(format!(
                    "{strategy} placement gave an out-of-order position for frequency {frequency}"
                ))
            })?;

        self.keys.insert(key, id);
        self.current_size += u64::from(admitted);
        self.total_refs += 1;
        self.misses += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_miss();

        if ghost.is_some() {
            self.restored += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_ghost_restore();
            trace!(key, frequency, size = admitted, "restored from ghost");
        } else {
            self.total_keys += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_fresh_admission();
        }
        Ok(())
    }

    fn reject(&mut self, key: u64, err: ConfigError) -> AccessError {
        warn!(key, capacity = self.capacity, error = %err, "rejected cache access");
        #[cfg(feature = "metrics")]
        self.metrics.record_rejected();
        AccessError::Config(err)
    }

    fn reserve_admission(&mut self) -> Result<(), AllocError> {
        self.keys
            .try_reserve(1)
            .map_err(|e| AllocError::new("key index", e))?;
        self.chain
            .try_reserve(1, 1)
            .map_err(|e| AllocError::new("bucket chain", e))
    }

    /// Evicts until an item of `needed` size fits.
    fn make_room(&mut self, needed: u32) -> Result<(), AccessError> {
        let needed = u64::from(needed);
        let limit = u64::from(self.capacity);
        if self.current_size + needed <= limit {
            return Ok(());
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        while self.current_size + needed > limit {
            if let Some(ghosts) = self.ghosts.as_mut() {
                ghosts
                    .try_reserve(1)
                    .map_err(|e| AllocError::new("ghost index", e))?;
            }

            let mut observer = BucketObserver {
                placement: self.placement.as_mut(),
                #[cfg(feature = "metrics")]
                metrics: &mut self.metrics,
            };
            let Some(victim) = self.chain.evict_one(&mut observer) else {
                error!(
                    capacity = self.capacity,
                    current_size = self.current_size,
                    needed,
                    "bucket chain exhausted before the item fits"
                );
                return Err(InvariantError::new(format!(
                    "bucket chain exhausted with current_size={} while admitting size {}",
                    self.current_size, needed
                ))
                .into());
            };

            self.keys.remove(&victim.key);
            self.current_size = self
                .current_size
                .checked_sub(u64::from(victim.size))
                .ok_or_else(|| {
                    InvariantError::new(format!(
                        "evicting key {} (size {}) underflows current_size={}",
                        victim.key, victim.size, self.current_size
                    ))
                })?;
            self.evictions += 1;
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            let remembered = match self.ghosts.as_mut() {
                Some(ghosts) => {
                    ghosts.remember(victim.key, victim.frequency, victim.size);
                    #[cfg(feature = "metrics")]
                    self.metrics.record_ghost_record();
                    true
                },
                None => false,
            };
            trace!(
                key = victim.key,
                frequency = victim.frequency,
                size = victim.size,
                remembered,
                "evicted"
            );
        }
        Ok(())
    }

    /// Drops every resident item and ghost. Cumulative counters are kept.
    pub fn clear(&mut self) {
        let mut observer = BucketObserver {
            placement: self.placement.as_mut(),
            #[cfg(feature = "metrics")]
            metrics: &mut self.metrics,
        };
        self.chain.clear(&mut observer);
        self.keys.clear();
        if let Some(ghosts) = self.ghosts.as_mut() {
            ghosts.clear();
        }
        self.current_size = 0;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Releases the cache and returns its final statistics.
    pub fn close(self) -> CacheStats {
        let stats = self.stats();
        debug!(variant = %self.variant, %stats, "closing LFU cache");
        stats
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.capacity,
            current_size: self.current_size,
            total_keys: self.total_keys,
            total_refs: self.total_refs,
            distinct_frequencies: self.chain.distinct_frequencies(),
            hits: self.hits,
            misses: self.misses,
            restored: self.restored,
            evictions: self.evictions,
            resident_items: self.keys.len(),
            ghost_entries: self.ghost_len(),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Sum of resident item sizes.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Number of resident items.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: u64) -> bool {
        self.keys.contains_key(&key)
    }

    /// Current frequency of a resident key.
    pub fn frequency(&self, key: u64) -> Option<u32> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_frequency_call();
        self.resident(key).map(|meta| meta.frequency)
    }

    /// Logical size of a resident key.
    pub fn item_size(&self, key: u64) -> Option<u32> {
        self.resident(key).map(|meta| meta.size)
    }

    /// Remembered state of an evicted key. Always `None` for `Basic`.
    pub fn ghost(&self, key: u64) -> Option<GhostEntry> {
        self.ghosts.as_ref()?.peek(key)
    }

    pub fn ghost_len(&self) -> usize {
        self.ghosts.as_ref().map_or(0, GhostIndex::len)
    }

    /// Key the next eviction would remove.
    pub fn peek_victim(&self) -> Option<u64> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_victim_call();
        self.chain.peek_victim().map(|meta| meta.key)
    }

    /// Live bucket frequencies, lowest first.
    pub fn frequencies(&self) -> Vec<u32> {
        self.chain.iter_buckets().map(|(_, f, _)| f).collect()
    }

    /// Keys in the bucket for `frequency`, next victim first.
    pub fn bucket_keys(&self, frequency: u32) -> Vec<u64> {
        self.chain
            .iter_buckets()
            .find(|&(_, f, _)| f == frequency)
            .map(|(id, _, _)| self.chain.iter_bucket_items(id).map(|m| m.key).collect())
            .unwrap_or_default()
    }

    /// Approximate heap footprint in bytes, ghosts included.
    pub fn approx_bytes(&self) -> usize {
        self.keys.capacity() * std::mem::size_of::<(u64, ItemId)>()
            + self.chain.approx_bytes()
            + self.ghosts.as_ref().map_or(0, GhostIndex::approx_bytes)
    }

    fn resident(&self, key: u64) -> Option<ItemMeta> {
        self.chain.item(*self.keys.get(&key)?)
    }

    /// Full structural audit.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let audit = self.chain.audit()?;

        if audit.items != self.keys.len() {
            return Err(InvariantError::new(format!(
                "key index holds {} keys, chain holds {} items",
                self.keys.len(),
                audit.items
            )));
        }
        for (&key, &id) in &self.keys {
            match self.chain.item(id) {
                Some(meta) if meta.key == key => {},
                Some(meta) => {
                    return Err(InvariantError::new(format!(
                        "key {key} indexes an item for key {}",
                        meta.key
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "key {key} indexes a freed item"
                    )));
                },
            }
        }
        if audit.total_size != self.current_size {
            return Err(InvariantError::new(format!(
                "current_size={} but resident sizes sum to {}",
                self.current_size, audit.total_size
            )));
        }
        if self.current_size > u64::from(self.capacity) {
            return Err(InvariantError::new(format!(
                "current_size={} exceeds capacity {}",
                self.current_size, self.capacity
            )));
        }
        if self.hits + self.misses != self.total_refs {
            return Err(InvariantError::new(format!(
                "hits ({}) + misses ({}) != total_refs ({})",
                self.hits, self.misses, self.total_refs
            )));
        }

        match &self.ghosts {
            Some(ghosts) => {
                if let Some(key) = ghosts.keys().find(|key| self.keys.contains_key(key)) {
                    return Err(InvariantError::new(format!(
                        "key {key} is both resident and a ghost"
                    )));
                }
            },
            None if self.variant.remembers_evictions() => {
                return Err(InvariantError::new(format!(
                    "{} variant has no ghost index",
                    self.variant
                )));
            },
            None => {},
        }

        self.placement.check(&self.chain)
    }
}

#[cfg(feature = "metrics")]
impl LfuCache {
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            access_calls: self.metrics.access_calls,
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            rejected: self.metrics.rejected,
            fresh_admissions: self.metrics.fresh_admissions,
            ghost_restores: self.metrics.ghost_restores,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            ghost_records: self.metrics.ghost_records,
            buckets_created: self.metrics.buckets_created,
            buckets_removed: self.metrics.buckets_removed,
            clear_calls: self.metrics.clear_calls,
            peek_victim_calls: self.metrics.peek_victim_calls.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            resident_items: self.keys.len(),
            current_size: self.current_size,
            capacity: self.capacity,
            distinct_frequencies: self.chain.distinct_frequencies(),
            ghost_entries: self.ghost_len(),
        }
    }
}

#[cfg(feature = "metrics")]
impl MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache {
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl MetricsReset for LfuCache {
    fn reset_metrics(&mut self) {
        self.metrics.reset_metrics();
    }
}
