//! Frequency bucket chain for O(1) LFU hit and eviction handling.
//!
//! Every resident item belongs to exactly one bucket, and every bucket holds
//! the items that currently share one access frequency. Buckets are linked in
//! strictly ascending frequency order, so the chain head is always the global
//! minimum and the eviction source.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                              BucketChain                                 │
//! │                                                                          │
//! │  buckets: SlotArena<Bucket>          items: SlotArena<Item>              │
//! │                                                                          │
//! │  head                                                          tail      │
//! │   │                                                              │       │
//! │   ▼                                                              ▼       │
//! │ ┌────────┐  next  ┌────────┐  next  ┌────────┐                           │
//! │ │ freq=1 │ ─────► │ freq=2 │ ─────► │ freq=7 │                           │
//! │ │ count=3│ ◄───── │ count=1│ ◄───── │ count=2│                           │
//! │ └───┬────┘  prev  └───┬────┘  prev  └───┬────┘                           │
//! │     │                 │                 │                                │
//! │     ▼ oldest          ▼                 ▼                                │
//! │   [k4] ◄─► [k9] ◄─► [k2]              [k1]            [k5] ◄─► [k8]      │
//! │    evict first           newest                                          │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation        | Time  | Notes                                            |
//! |------------------|-------|--------------------------------------------------|
//! | `promote`        | O(1)  | Hit path: next bucket is always the neighbour    |
//! | `insert`         | O(1)  | Placement (`Splice`) is computed by the caller   |
//! | `evict_one`      | O(1)  | Oldest item of the head bucket                   |
//! | `detach`         | O(1)  | Arbitrary removal by handle                      |
//! | `scan_at_least`  | O(U)  | Linear walk for the first bucket with freq ≥ f   |
//! | `audit`          | O(n)  | Full structural check                            |
//!
//! Buckets are created and destroyed only inside this module. Each link and
//! unlink is reported to a [`BucketListener`], which is how an ordered index
//! over the chain stays in lockstep with it.

use std::collections::TryReserveError;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Stable handle to a resident item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(SlotId);

/// Stable handle to a live frequency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketId(SlotId);

impl BucketId {
    pub fn index(self) -> usize {
        self.0.index()
    }
}

/// Where an item with a given frequency goes in the chain.
///
/// Produced by a placement strategy from "the smallest bucket whose frequency
/// is at least the item's frequency".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Splice {
    /// A bucket with exactly the item's frequency already exists.
    Existing(BucketId),
    /// No such bucket; create one immediately before this (higher) bucket.
    Before(BucketId),
    /// Every bucket is lower; create one at the tail.
    Tail,
}

/// Observer for bucket creation and removal.
pub trait BucketListener {
    fn bucket_linked(&mut self, frequency: u32, bucket: BucketId);
    fn bucket_unlinked(&mut self, frequency: u32, bucket: BucketId);
}

impl BucketListener for () {
    fn bucket_linked(&mut self, _frequency: u32, _bucket: BucketId) {}
    fn bucket_unlinked(&mut self, _frequency: u32, _bucket: BucketId) {}
}

/// Read-only copy of an item's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMeta {
    pub key: u64,
    pub size: u32,
    pub frequency: u32,
}

/// Summary produced by a successful [`BucketChain::audit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainAudit {
    pub items: usize,
    pub buckets: usize,
    pub total_size: u64,
}

// Link fields first: they are touched on every hit and eviction.
#[derive(Debug)]
#[repr(C)]
struct Item {
    prev: Option<ItemId>,
    next: Option<ItemId>,
    bucket: BucketId,
    frequency: u32,
    size: u32,
    key: u64,
}

#[derive(Debug)]
struct Bucket {
    head: Option<ItemId>,
    tail: Option<ItemId>,
    prev: Option<BucketId>,
    next: Option<BucketId>,
    frequency: u32,
    item_count: u32,
}

/// Ascending chain of frequency buckets, each holding a recency-ordered list.
#[derive(Debug, Default)]
pub struct BucketChain {
    items: SlotArena<Item>,
    buckets: SlotArena<Bucket>,
    head: Option<BucketId>,
    tail: Option<BucketId>,
}

impl BucketChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(items: usize, buckets: usize) -> Self {
        Self {
            items: SlotArena::with_capacity(items),
            buckets: SlotArena::with_capacity(buckets),
            head: None,
            tail: None,
        }
    }

    /// Reserves room so the next `items` inserts and `buckets` bucket
    /// creations cannot fail on allocation.
    pub fn try_reserve(&mut self, items: usize, buckets: usize) -> Result<(), TryReserveError> {
        self.items.try_reserve(items)?;
        self.buckets.try_reserve(buckets)
    }

    /// Number of resident items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of buckets, i.e. distinct frequencies present.
    pub fn distinct_frequencies(&self) -> usize {
        self.buckets.len()
    }

    /// Lowest-frequency bucket.
    pub fn head(&self) -> Option<BucketId> {
        self.head
    }

    /// Highest-frequency bucket.
    pub fn tail(&self) -> Option<BucketId> {
        self.tail
    }

    pub fn next_bucket(&self, bucket: BucketId) -> Option<BucketId> {
        self.buckets.get(bucket.0)?.next
    }

    pub fn prev_bucket(&self, bucket: BucketId) -> Option<BucketId> {
        self.buckets.get(bucket.0)?.prev
    }

    pub fn bucket_frequency(&self, bucket: BucketId) -> Option<u32> {
        self.buckets.get(bucket.0).map(|b| b.frequency)
    }

    pub fn bucket_len(&self, bucket: BucketId) -> Option<u32> {
        self.buckets.get(bucket.0).map(|b| b.item_count)
    }

    pub fn item(&self, id: ItemId) -> Option<ItemMeta> {
        self.items.get(id.0).map(|item| ItemMeta {
            key: item.key,
            size: item.size,
            frequency: item.frequency,
        })
    }

    /// The item `evict_one` would remove next.
    pub fn peek_victim(&self) -> Option<ItemMeta> {
        let bucket = self.buckets.get(self.head?.0)?;
        self.item(bucket.head?)
    }

    /// Iterates buckets from lowest to highest frequency as
    /// `(id, frequency, item_count)`.
    pub fn iter_buckets(&self) -> impl Iterator<Item = (BucketId, u32, u32)> + '_ {
        std::iter::successors(self.head, move |&id| self.next_bucket(id)).filter_map(move |id| {
            self.buckets
                .get(id.0)
                .map(|b| (id, b.frequency, b.item_count))
        })
    }

    /// Iterates a bucket's items from oldest to newest.
    pub fn iter_bucket_items(&self, bucket: BucketId) -> impl Iterator<Item = ItemMeta> + '_ {
        let head = self.buckets.get(bucket.0).and_then(|b| b.head);
        std::iter::successors(head, move |&id| self.items.get(id.0).and_then(|i| i.next))
            .filter_map(move |id| self.item(id))
    }

    /// Finds the first bucket, walking from the head, whose frequency is at
    /// least `frequency`.
    pub fn scan_at_least(&self, frequency: u32) -> Splice {
        let mut current = self.head;
        while let Some(id) = current {
            let Some(bucket) = self.buckets.get(id.0) else {
                break;
            };
            if bucket.frequency == frequency {
                return Splice::Existing(id);
            }
            if bucket.frequency > frequency {
                return Splice::Before(id);
            }
            current = bucket.next;
        }
        Splice::Tail
    }

    /// Inserts a new item at the newest end of the bucket chosen by `splice`,
    /// creating the bucket if needed.
    ///
    /// Returns `None`, without mutating anything, if `splice` does not
    /// describe a position that keeps the chain strictly ascending.
    pub fn insert<L>(
        &mut self,
        meta: ItemMeta,
        splice: Splice,
        listener: &mut L,
    ) -> Option<ItemId>
    where
        L: BucketListener + ?Sized,
    {
        let frequency = meta.frequency.max(1);
        let bucket = self.ensure_bucket(frequency, splice, listener)?;
        let id = ItemId(self.items.insert(Item {
            prev: None,
            next: None,
            bucket,
            frequency,
            size: meta.size,
            key: meta.key,
        }));
        self.append_item(bucket, id)?;
        Some(id)
    }

    /// Hit path: moves `id` to the bucket for `frequency + 1`.
    ///
    /// The target is either the current bucket's immediate successor or a
    /// new bucket spliced right after the current one. At `u32::MAX` the item
    /// stays in its bucket and is re-queued as newest.
    ///
    /// Returns the item's new frequency.
    pub fn promote<L>(&mut self, id: ItemId, listener: &mut L) -> Option<u32>
    where
        L: BucketListener + ?Sized,
    {
        let (current, frequency) = {
            let item = self.items.get(id.0)?;
            (item.bucket, item.frequency)
        };

        if frequency == u32::MAX {
            self.unlink_item(id)?;
            self.append_item(current, id)?;
            return Some(frequency);
        }

        let next_frequency = frequency + 1;
        let next = self.buckets.get(current.0)?.next;
        let target = match next {
            Some(next_id) if self.bucket_frequency(next_id)? == next_frequency => next_id,
            _ => self.link_bucket(next_frequency, Some(current), next, listener),
        };

        self.unlink_item(id)?;
        self.release_if_empty(current, listener)?;
        if let Some(item) = self.items.get_mut(id.0) {
            item.frequency = next_frequency;
        }
        self.append_item(target, id)?;
        Some(next_frequency)
    }

    /// Removes an item by handle, dropping its bucket if it becomes empty.
    pub fn detach<L>(&mut self, id: ItemId, listener: &mut L) -> Option<ItemMeta>
    where
        L: BucketListener + ?Sized,
    {
        let bucket = self.items.get(id.0)?.bucket;
        self.unlink_item(id)?;
        self.release_if_empty(bucket, listener)?;
        let item = self.items.remove(id.0)?;
        Some(ItemMeta {
            key: item.key,
            size: item.size,
            frequency: item.frequency,
        })
    }

    /// Removes the oldest item of the lowest-frequency bucket.
    pub fn evict_one<L>(&mut self, listener: &mut L) -> Option<ItemMeta>
    where
        L: BucketListener + ?Sized,
    {
        let victim = self.buckets.get(self.head?.0)?.head?;
        self.detach(victim, listener)
    }

    /// Drops every item and bucket, reporting each bucket removal.
    pub fn clear<L>(&mut self, listener: &mut L)
    where
        L: BucketListener + ?Sized,
    {
        for (id, frequency, _) in self.iter_buckets().collect::<Vec<_>>() {
            listener.bucket_unlinked(frequency, id);
        }
        self.items.clear();
        self.buckets.clear();
        self.head = None;
        self.tail = None;
    }

    /// Approximate heap footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        self.items.approx_bytes() + self.buckets.approx_bytes()
    }

    /// Walks the whole chain and checks every structural invariant.
    pub fn audit(&self) -> Result<ChainAudit, InvariantError> {
        let mut summary = ChainAudit::default();
        let mut prev: Option<BucketId> = None;
        let mut last_frequency: Option<u32> = None;
        let mut current = self.head;

        while let Some(bucket_id) = current {
            let bucket = self.buckets.get(bucket_id.0).ok_or_else(|| {
                InvariantError::new(format!("chain links to freed bucket {}", bucket_id.index()))
            })?;
            if bucket.prev != prev {
                return Err(InvariantError::new(format!(
                    "bucket freq={} has a stale prev link",
                    bucket.frequency
                )));
            }
            if let Some(last) = last_frequency
                && bucket.frequency <= last
            {
                return Err(InvariantError::new(format!(
                    "chain not strictly ascending: {} follows {}",
                    bucket.frequency, last
                )));
            }
            if bucket.item_count == 0 || bucket.head.is_none() {
                return Err(InvariantError::new(format!(
                    "empty bucket freq={} left in chain",
                    bucket.frequency
                )));
            }

            let mut count = 0u32;
            let mut last_item: Option<ItemId> = None;
            let mut item_cursor = bucket.head;
            while let Some(item_id) = item_cursor {
                let item = self.items.get(item_id.0).ok_or_else(|| {
                    InvariantError::new(format!(
                        "bucket freq={} links to freed item",
                        bucket.frequency
                    ))
                })?;
                if item.bucket != bucket_id {
                    return Err(InvariantError::new(format!(
                        "key {} back-references the wrong bucket",
                        item.key
                    )));
                }
                if item.frequency != bucket.frequency {
                    return Err(InvariantError::new(format!(
                        "key {} has freq={} inside bucket freq={}",
                        item.key, item.frequency, bucket.frequency
                    )));
                }
                if item.prev != last_item {
                    return Err(InvariantError::new(format!(
                        "key {} has a stale prev link",
                        item.key
                    )));
                }
                count += 1;
                summary.total_size += u64::from(item.size);
                last_item = Some(item_id);
                item_cursor = item.next;
            }
            if bucket.tail != last_item {
                return Err(InvariantError::new(format!(
                    "bucket freq={} tail does not match its last item",
                    bucket.frequency
                )));
            }
            if count != bucket.item_count {
                return Err(InvariantError::new(format!(
                    "bucket freq={} counts {} items but holds {}",
                    bucket.frequency, bucket.item_count, count
                )));
            }

            summary.items += count as usize;
            summary.buckets += 1;
            last_frequency = Some(bucket.frequency);
            prev = Some(bucket_id);
            current = bucket.next;
        }

        if self.tail != prev {
            return Err(InvariantError::new("chain tail does not match last bucket"));
        }
        if summary.buckets != self.buckets.len() {
            return Err(InvariantError::new(format!(
                "{} buckets allocated but {} reachable",
                self.buckets.len(),
                summary.buckets
            )));
        }
        if summary.items != self.items.len() {
            return Err(InvariantError::new(format!(
                "{} items allocated but {} reachable",
                self.items.len(),
                summary.items
            )));
        }
        Ok(summary)
    }

    fn ensure_bucket<L>(&mut self, frequency: u32, splice: Splice, listener: &mut L) -> Option<BucketId>
    where
        L: BucketListener + ?Sized,
    {
        match splice {
            Splice::Existing(id) => {
                (self.bucket_frequency(id)? == frequency).then_some(id)
            },
            Splice::Before(next) => {
                let bucket = self.buckets.get(next.0)?;
                if bucket.frequency <= frequency {
                    return None;
                }
                let prev = bucket.prev;
                if let Some(prev_id) = prev
                    && self.bucket_frequency(prev_id)? >= frequency
                {
                    return None;
                }
                Some(self.link_bucket(frequency, prev, Some(next), listener))
            },
            Splice::Tail => {
                if let Some(tail) = self.tail
                    && self.bucket_frequency(tail)? >= frequency
                {
                    return None;
                }
                Some(self.link_bucket(frequency, self.tail, None, listener))
            },
        }
    }

    fn link_bucket<L>(
        &mut self,
        frequency: u32,
        prev: Option<BucketId>,
        next: Option<BucketId>,
        listener: &mut L,
    ) -> BucketId
    where
        L: BucketListener + ?Sized,
    {
        let id = BucketId(self.buckets.insert(Bucket {
            head: None,
            tail: None,
            prev,
            next,
            frequency,
            item_count: 0,
        }));

        match prev.and_then(|p| self.buckets.get_mut(p.0)) {
            Some(prev_bucket) => prev_bucket.next = Some(id),
            None => self.head = Some(id),
        }
        match next.and_then(|n| self.buckets.get_mut(n.0)) {
            Some(next_bucket) => next_bucket.prev = Some(id),
            None => self.tail = Some(id),
        }

        listener.bucket_linked(frequency, id);
        id
    }

    fn release_if_empty<L>(&mut self, id: BucketId, listener: &mut L) -> Option<()>
    where
        L: BucketListener + ?Sized,
    {
        if self.buckets.get(id.0)?.item_count > 0 {
            return Some(());
        }
        let bucket = self.buckets.remove(id.0)?;

        match bucket.prev.and_then(|p| self.buckets.get_mut(p.0)) {
            Some(prev_bucket) => prev_bucket.next = bucket.next,
            None => self.head = bucket.next,
        }
        match bucket.next.and_then(|n| self.buckets.get_mut(n.0)) {
            Some(next_bucket) => next_bucket.prev = bucket.prev,
            None => self.tail = bucket.prev,
        }

        listener.bucket_unlinked(bucket.frequency, id);
        Some(())
    }

    fn append_item(&mut self, bucket_id: BucketId, id: ItemId) -> Option<()> {
        let old_tail = {
            let bucket = self.buckets.get_mut(bucket_id.0)?;
            let old_tail = bucket.tail;
            bucket.tail = Some(id);
            if old_tail.is_none() {
                bucket.head = Some(id);
            }
            bucket.item_count += 1;
            old_tail
        };
        if let Some(tail_id) = old_tail
            && let Some(tail_item) = self.items.get_mut(tail_id.0)
        {
            tail_item.next = Some(id);
        }
        let item = self.items.get_mut(id.0)?;
        item.prev = old_tail;
        item.next = None;
        item.bucket = bucket_id;
        Some(())
    }

    fn unlink_item(&mut self, id: ItemId) -> Option<()> {
        let (prev, next, bucket_id) = {
            let item = self.items.get(id.0)?;
            (item.prev, item.next, item.bucket)
        };
        match prev.and_then(|p| self.items.get_mut(p.0)) {
            Some(prev_item) => prev_item.next = next,
            None => self.buckets.get_mut(bucket_id.0)?.head = next,
        }
        match next.and_then(|n| self.items.get_mut(n.0)) {
            Some(next_item) => next_item.prev = prev,
            None => self.buckets.get_mut(bucket_id.0)?.tail = prev,
        }
        let bucket = self.buckets.get_mut(bucket_id.0)?;
        bucket.item_count = bucket.item_count.saturating_sub(1);
        let item = self.items.get_mut(id.0)?;
        item.prev = None;
        item.next = None;
        Some(())
    }
}
