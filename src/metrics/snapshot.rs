#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub access_calls: u64,
    pub hits: u64,
    pub misses: u64,
    pub rejected: u64,

    pub fresh_admissions: u64,
    pub ghost_restores: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub ghost_records: u64,

    pub buckets_created: u64,
    pub buckets_removed: u64,
    pub clear_calls: u64,

    pub peek_victim_calls: u64,
    pub frequency_calls: u64,

    // gauges captured at snapshot time
    pub resident_items: usize,
    pub current_size: u64,
    pub capacity: u32,
    pub distinct_frequencies: usize,
    pub ghost_entries: usize,
}

impl LfuMetricsSnapshot {
    /// Fraction of accepted accesses that hit, or 0.0 before the first one.
    pub fn hit_ratio(&self) -> f64 {
        let accepted = self.hits + self.misses;
        if accepted == 0 {
            0.0
        } else {
            self.hits as f64 / accepted as f64
        }
    }
}
