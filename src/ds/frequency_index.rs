//! Ordered frequency → bucket index.
//!
//! Accelerates the one lookup the bucket chain cannot do in O(1): "which is
//! the smallest live bucket with frequency ≥ f?". The chain stays the source
//! of truth for adjacency; this index only mirrors its bucket set, updated on
//! every bucket link/unlink through [`BucketListener`].
//!
//! Backed by a `BTreeMap`, so lookups, inserts and removals are O(log U) in
//! the number of distinct frequencies.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::ds::bucket_chain::{BucketChain, BucketId, BucketListener, Splice};
use crate::error::InvariantError;

#[derive(Debug, Default, Clone)]
pub struct FrequencyIndex {
    tree: BTreeMap<u32, BucketId>,
}

impl FrequencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn get(&self, frequency: u32) -> Option<BucketId> {
        self.tree.get(&frequency).copied()
    }

    /// Smallest indexed frequency that is `>= frequency`, with its bucket.
    pub fn ceiling(&self, frequency: u32) -> Option<(u32, BucketId)> {
        self.tree
            .range((Bound::Included(frequency), Bound::Unbounded))
            .next()
            .map(|(&f, &id)| (f, id))
    }

    /// Chain position for an item of `frequency`.
    pub fn splice_for(&self, frequency: u32) -> Splice {
        match self.ceiling(frequency) {
            Some((found, id)) if found == frequency => Splice::Existing(id),
            Some((_, id)) => Splice::Before(id),
            None => Splice::Tail,
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Checks that the index holds exactly the chain's buckets.
    pub fn check_mirrors(&self, chain: &BucketChain) -> Result<(), InvariantError> {
        if self.tree.len() != chain.distinct_frequencies() {
            return Err(InvariantError::new(format!(
                "frequency index holds {} buckets, chain holds {}",
                self.tree.len(),
                chain.distinct_frequencies()
            )));
        }
        for ((indexed_freq, &indexed_id), (chain_id, chain_freq, _)) in
            self.tree.iter().zip(chain.iter_buckets())
        {
            if *indexed_freq != chain_freq || indexed_id != chain_id {
                return Err(InvariantError::new(format!(
                    "frequency index entry freq={} does not match chain bucket freq={}",
                    indexed_freq, chain_freq
                )));
            }
        }
        Ok(())
    }
}

impl BucketListener for FrequencyIndex {
    fn bucket_linked(&mut self, frequency: u32, bucket: BucketId) {
        self.tree.insert(frequency, bucket);
    }

    fn bucket_unlinked(&mut self, frequency: u32, bucket: BucketId) {
        if self.tree.get(&frequency) == Some(&bucket) {
            self.tree.remove(&frequency);
        }
    }
}
