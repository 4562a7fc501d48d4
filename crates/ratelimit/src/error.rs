//! Rate limiter error types.

use thiserror::Error;

/// Result type for rate limiter operations.
pub type RateLimitResult<T> = Result<T, RateLimitError>;

/// Error type for rate limiter operations.
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Counter store unavailable or failed. Surfaced to the caller; whether
    /// to fail open or closed is the caller's policy.
    #[error("Store error: {0}")]
    Store(String),
}
