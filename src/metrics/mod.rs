//! Optional cache metrics (`metrics` feature).
//!
//! Recording, snapshotting and export are split into separate traits; see
//! [`traits`] for the hierarchy.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
