//! lfukit: size-aware LFU caches with ghost memory, built on a frequency
//! bucket chain.
//!
//! - [`policy::lfu::LfuCache`]: the cache, in Basic, Perfect and FastPerfect
//!   variants.
//! - [`ds`]: the arena, bucket chain, frequency index and ghost index it is
//!   made of.
//! - [`traits::TraceCache`]: the contract a trace replayer drives.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
