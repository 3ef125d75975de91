//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting*, and *export* responsibilities into
//! small, composable traits, so production monitoring and bench/testing do
//! not leak into the access path.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │     CoreMetricsRecorder     │
//!                 │  hit/miss/evict/clear       │
//!                 └──────────────┬──────────────┘
//!                                │
//!                                ▼
//!                 ┌─────────────────────────────┐      ┌───────────────────────────┐
//!                 │     LfuMetricsRecorder      │      │  LfuMetricsReadRecorder   │
//!                 │  ghost restore/record       │      │  (&self: peek_victim,     │
//!                 │  bucket created/removed     │      │   frequency)              │
//!                 │  fresh admission, rejected  │      └───────────────────────────┘
//!                 └─────────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! ## Design Goals
//! - **Single responsibility**: recorders only write counters; providers only
//!   read/snapshot; exporters only publish to monitoring systems.
//! - **Environment split**:
//!   - Production: recorder + exporter.
//!   - Bench/Test: snapshot provider + reset.

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_hit(&mut self);
    fn record_miss(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LFU-specific counters.
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    /// A miss resumed from ghost memory.
    fn record_ghost_restore(&mut self);
    /// A miss admitted at frequency 1.
    fn record_fresh_admission(&mut self);
    /// An evicted item was remembered.
    fn record_ghost_record(&mut self);
    fn record_bucket_created(&mut self);
    fn record_bucket_removed(&mut self);
    /// An access refused before any mutation.
    fn record_rejected(&mut self);
}

/// Read-only LFU metrics for &self methods (uses interior mutability).
pub trait LfuMetricsReadRecorder {
    fn record_peek_victim_call(&self);
    fn record_frequency_call(&self);
}

/// Snapshot provider for tests and benchmarks.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Reset metrics between tests or benchmark iterations.
pub trait MetricsReset {
    fn reset_metrics(&mut self);
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
