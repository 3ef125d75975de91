//! Error types for the lfukit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration or an access request
//!   can never be satisfied (zero capacity, zero-size item, item larger than
//!   the whole cache).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants`, or an eviction loop that runs out of items
//!   before the incoming item fits).
//! - [`AllocError`]: Returned when reserving room for an access fails.
//! - [`AccessError`]: What [`LfuCache::access`](crate::policy::lfu::LfuCache::access)
//!   returns; wraps the three kinds above.
//!
//! None of these are retryable. Capacity is fixed for the lifetime of a
//! cache, so a request that fails once fails every time.
//!
//! ## Example Usage
//!
//! ```
//! use lfukit::error::AccessError;
//! use lfukit::policy::lfu::LfuCache;
//! use lfukit::policy::placement::Variant;
//!
//! let mut cache = LfuCache::open(5, Variant::Perfect).unwrap();
//!
//! // An item larger than the whole cache is a configuration error
//! let err = cache.access(1, 10).unwrap_err();
//! assert!(matches!(err, AccessError::Config(_)));
//! assert!(err.is_fatal());
//!
//! // ...and nothing was mutated
//! assert_eq!(cache.stats().total_refs, 0);
//! ```

use std::collections::TryReserveError;
use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants)
/// and by the eviction loop when size accounting disagrees with the chain.
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`LfuCacheBuilder::build`](crate::builder::LfuCacheBuilder::build),
/// [`LfuCache::open`](crate::policy::lfu::LfuCache::open), and by `access`
/// when an item can never be admitted.
///
/// # Example
///
/// ```
/// use lfukit::policy::lfu::LfuCache;
/// use lfukit::policy::placement::Variant;
///
/// let err = LfuCache::open(0, Variant::Basic).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// AllocError
// ---------------------------------------------------------------------------

/// Error returned when the cache cannot reserve memory for an access.
///
/// The reservation happens before any mutation, so the cache is still
/// consistent when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocError {
    context: &'static str,
    source: TryReserveError,
}

impl AllocError {
    pub fn new(context: &'static str, source: TryReserveError) -> Self {
        Self { context, source }
    }

    /// Which structure failed to grow.
    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allocation failed for {}: {}", self.context, self.source)
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ---------------------------------------------------------------------------
// AccessError
// ---------------------------------------------------------------------------

/// Error returned by a cache access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The item can never be admitted.
    Config(ConfigError),
    /// Size accounting disagrees with the cache contents.
    Invariant(InvariantError),
    /// Memory for the access could not be reserved.
    Allocation(AllocError),
}

impl AccessError {
    /// Every access error is fatal for the request that produced it: none of
    /// them go away on retry.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// Short stable label, used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::Config(_) => "config",
            AccessError::Invariant(_) => "invariant",
            AccessError::Allocation(_) => "allocation",
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::Config(err) => write!(f, "configuration error: {err}"),
            AccessError::Invariant(err) => write!(f, "invariant violation: {err}"),
            AccessError::Allocation(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccessError::Config(err) => Some(err),
            AccessError::Invariant(err) => Some(err),
            AccessError::Allocation(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AccessError {
    fn from(err: ConfigError) -> Self {
        AccessError::Config(err)
    }
}

impl From<InvariantError> for AccessError {
    fn from(err: InvariantError) -> Self {
        AccessError::Invariant(err)
    }
}

impl From<AllocError> for AccessError {
    fn from(err: AllocError) -> Self {
        AccessError::Allocation(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
