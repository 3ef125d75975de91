use std::cell::Cell;

/// A metrics-only counter that can be bumped through `&self`.
///
/// Used by read-only cache methods (`peek_victim`, `frequency`) that have no
/// mutable recorder available. `Send` but not `Sync`: a cache shared across
/// threads sits behind one lock, which also serializes these counters.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
