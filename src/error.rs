//! Error types for the hotspot core

use thiserror::Error;

/// Errors raised by partitioning and summarization.
///
/// Every variant is terminal for the current request: nothing is retried
/// and no partial result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotspotError {
    /// No usable points were supplied
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A caller-supplied parameter is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A malformed value reached the core from upstream
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result alias for core operations
pub type CoreResult<T> = std::result::Result<T, HotspotError>;
