//! Ghost memory for evicted items.
//!
//! Records the last frequency and size of every evicted key so that a key
//! returning after eviction resumes counting where it left off instead of
//! cold-starting at frequency 1.
//!
//! ## Behavior
//! - `remember(k, freq, size)`: called once per eviction, replaces any older entry
//! - `recall(k)`: removes and returns the entry on re-admission
//! - `peek(k)`: non-destructive lookup
//!
//! The index is deliberately unbounded: entries leave only when their key is
//! recalled. A trace with many one-time keys grows it without limit, so
//! [`GhostIndex::len`] and [`GhostIndex::approx_bytes`] are exposed for hosts
//! that need to watch it.
//!
//! ## Performance
//! - `remember` / `recall` / `peek`: O(1) average

use std::collections::TryReserveError;

use rustc_hash::FxHashMap;

/// Remembered state of an evicted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostEntry {
    pub frequency: u32,
    pub size: u32,
}

#[derive(Debug, Default)]
pub struct GhostIndex {
    entries: FxHashMap<u64, GhostEntry>,
}

impl GhostIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the number of remembered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve(additional)
    }

    /// Records an eviction. Returns the entry it replaced, if any.
    pub fn remember(&mut self, key: u64, frequency: u32, size: u32) -> Option<GhostEntry> {
        self.entries.insert(key, GhostEntry { frequency, size })
    }

    /// Removes and returns the remembered state for `key`.
    pub fn recall(&mut self, key: u64) -> Option<GhostEntry> {
        self.entries.remove(&key)
    }

    pub fn peek(&self, key: u64) -> Option<GhostEntry> {
        self.entries.get(&key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Approximate heap footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<(u64, GhostEntry)>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_index_remember_and_recall() {
        let mut ghosts = GhostIndex::new();
        assert_eq!(ghosts.remember(7, 3, 10), None);
        assert!(ghosts.contains(7));
        assert_eq!(ghosts.len(), 1);

        assert_eq!(
            ghosts.recall(7),
            Some(GhostEntry {
                frequency: 3,
                size: 10
            })
        );
        assert!(!ghosts.contains(7));
        assert_eq!(ghosts.recall(7), None);
        assert!(ghosts.is_empty());
    }

    #[test]
    fn ghost_index_remember_replaces_previous_entry() {
        let mut ghosts = GhostIndex::new();
        ghosts.remember(1, 2, 4);
        let replaced = ghosts.remember(1, 5, 6);

        assert_eq!(
            replaced,
            Some(GhostEntry {
                frequency: 2,
                size: 4
            })
        );
        assert_eq!(ghosts.peek(1).map(|g| g.frequency), Some(5));
        assert_eq!(ghosts.len(), 1);
    }

    #[test]
    fn ghost_index_peek_does_not_remove() {
        let mut ghosts = GhostIndex::with_capacity(4);
        ghosts.remember(9, 1, 1);
        assert!(ghosts.peek(9).is_some());
        assert!(ghosts.peek(9).is_some());
        assert_eq!(ghosts.peek(10), None);
    }

    #[test]
    fn ghost_index_is_unbounded() {
        let mut ghosts = GhostIndex::new();
        for key in 0..10_000u64 {
            ghosts.remember(key, 1, 1);
        }
        assert_eq!(ghosts.len(), 10_000);
        assert!(ghosts.approx_bytes() > 0);

        let mut keys: Vec<_> = ghosts.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys.first(), Some(&0));
        assert_eq!(keys.last(), Some(&9_999));
    }

    #[test]
    fn ghost_index_clear_resets_state() {
        let mut ghosts = GhostIndex::new();
        ghosts.remember(1, 1, 1);
        ghosts.remember(2, 1, 1);
        ghosts.clear();
        assert!(ghosts.is_empty());
        assert!(!ghosts.contains(1));
    }
}
