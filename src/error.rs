//! Error types for the lirsim library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a cache configuration is invalid (zero
//!   size, out-of-range HIR ratio, empty LIR partition).
//! - [`InvariantError`]: Returned when a policy's internal state contradicts
//!   itself. Always an internal defect, never a consequence of input.
//! - [`TraceError`]: Returned when a trace cannot be opened, read, or parsed.
//! - [`SimError`]: Union of the above for a single experiment run.
//!
//! ## Example Usage
//!
//! ```
//! use lirsim::config::CacheConfig;
//! use lirsim::error::ConfigError;
//!
//! let ok: Result<CacheConfig, ConfigError> = CacheConfig::try_new(100, 1);
//! assert!(ok.is_ok());
//!
//! let bad = CacheConfig::try_new(100, 101).unwrap_err();
//! assert!(bad.to_string().contains("hir ratio"));
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when a replacement policy's internal invariants are violated.
///
/// Produced by [`ReplacementPolicy::access`](crate::traits::ReplacementPolicy::access)
/// (e.g. stack pruning on an empty recency stack) and by the debug-only
/// `check_invariants` methods. Carries a description of what failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
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

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`CacheConfig::try_new`](crate::config::CacheConfig::try_new)
/// and [`CacheConfig::try_with_capacities`](crate::config::CacheConfig::try_with_capacities).
///
/// # Example
///
/// ```
/// use lirsim::config::CacheConfig;
///
/// let err = CacheConfig::try_new(0, 1).unwrap_err();
/// assert!(err.to_string().contains("size"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
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

// ---------------------------------------------------------------------------
// TraceError
// ---------------------------------------------------------------------------

/// Error raised while opening or reading a block-access trace.
///
/// Any variant aborts the run that encountered it; records are never skipped
/// or defaulted, so reported access counts always match the trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot open trace {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed after line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: invalid block id {text:?}")]
    InvalidBlockId { line: usize, text: String },
}

impl TraceError {
    /// Returns the 1-based line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            TraceError::Open { .. } => None,
            TraceError::Io { line, .. } | TraceError::InvalidBlockId { line, .. } => Some(*line),
        }
    }
}

// ---------------------------------------------------------------------------
// SimError
// ---------------------------------------------------------------------------

/// Failure of one experiment. Sibling experiments are unaffected.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantError),

    #[error("cancelled after {accesses} accesses")]
    Cancelled { accesses: u64 },

    #[error("experiment worker panicked: {message}")]
    WorkerPanicked { message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
