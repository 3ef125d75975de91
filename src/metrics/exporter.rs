use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::LfuMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so it can be scraped by
/// Prometheus or forwarded to an OpenTelemetry collector. Write errors are
/// dropped: exporting must never fail the cache.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", &self.metric_name(suffix), value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<LfuMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LfuMetricsSnapshot) {
        self.write_counter("access_calls_total", snapshot.access_calls);
        self.write_counter("hits_total", snapshot.hits);
        self.write_counter("misses_total", snapshot.misses);
        self.write_counter("rejected_total", snapshot.rejected);
        self.write_counter("fresh_admissions_total", snapshot.fresh_admissions);
        self.write_counter("ghost_restores_total", snapshot.ghost_restores);
        self.write_counter("evict_calls_total", snapshot.evict_calls);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter("ghost_records_total", snapshot.ghost_records);
        self.write_counter("buckets_created_total", snapshot.buckets_created);
        self.write_counter("buckets_removed_total", snapshot.buckets_removed);
        self.write_counter("clear_calls_total", snapshot.clear_calls);
        self.write_counter("peek_victim_calls_total", snapshot.peek_victim_calls);
        self.write_counter("frequency_calls_total", snapshot.frequency_calls);
        self.write_gauge("resident_items", snapshot.resident_items as u64);
        self.write_gauge("current_size", snapshot.current_size);
        self.write_gauge("capacity", u64::from(snapshot.capacity));
        self.write_gauge(
            "distinct_frequencies",
            snapshot.distinct_frequencies as u64,
        );
        self.write_gauge("ghost_entries", snapshot.ghost_entries as u64);
    }
}
