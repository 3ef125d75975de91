use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsReset,
};

#[derive(Debug, Default)]
pub struct LfuMetrics {
    pub access_calls: u64,
    pub hits: u64,
    pub misses: u64,
    pub fresh_admissions: u64,
    pub ghost_restores: u64,
    pub rejected: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub ghost_records: u64,
    pub buckets_created: u64,
    pub buckets_removed: u64,
    pub clear_calls: u64,
    pub peek_victim_calls: MetricsCell,
    pub frequency_calls: MetricsCell,
}

impl LfuMetrics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoreMetricsRecorder for LfuMetrics {
    fn record_hit(&mut self) {
        self.access_calls += 1;
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.access_calls += 1;
        self.misses += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LfuMetricsRecorder for LfuMetrics {
    fn record_ghost_restore(&mut self) {
        self.ghost_restores += 1;
    }

    fn record_fresh_admission(&mut self) {
        self.fresh_admissions += 1;
    }

    fn record_ghost_record(&mut self) {
        self.ghost_records += 1;
    }

    fn record_bucket_created(&mut self) {
        self.buckets_created += 1;
    }

    fn record_bucket_removed(&mut self) {
        self.buckets_removed += 1;
    }

    fn record_rejected(&mut self) {
        self.access_calls += 1;
        self.rejected += 1;
    }
}

impl LfuMetricsReadRecorder for &LfuMetrics {
    fn record_peek_victim_call(&self) {
        self.peek_victim_calls.incr();
    }

    fn record_frequency_call(&self) {
        self.frequency_calls.incr();
    }
}

impl MetricsReset for LfuMetrics {
    fn reset_metrics(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_and_miss_both_count_as_access() {
        let mut metrics = LfuMetrics::new();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_rejected();
        assert_eq!(metrics.access_calls, 3);
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.rejected, 1);
    }

    #[test]
    fn read_recorder_counts_through_shared_ref() {
        let metrics = LfuMetrics::new();
        (&metrics).record_peek_victim_call();
        (&metrics).record_frequency_call();
        (&metrics).record_frequency_call();
        assert_eq!(metrics.peek_victim_calls.get(), 1);
        assert_eq!(metrics.frequency_calls.get(), 2);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut metrics = LfuMetrics::new();
        metrics.record_bucket_created();
        metrics.record_ghost_record();
        (&metrics).record_frequency_call();
        metrics.reset_metrics();
        assert_eq!(metrics.buckets_created, 0);
        assert_eq!(metrics.ghost_records, 0);
        assert_eq!(metrics.frequency_calls.get(), 0);
    }
}
