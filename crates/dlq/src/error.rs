//! DLQ error types.

use thiserror::Error;

/// Result type for DLQ operations.
pub type DlqResult<T> = Result<T, DlqError>;

/// Error type for DLQ operations.
#[derive(Debug, Error)]
pub enum DlqError {
    /// Delivery failed (non-2xx response or transport error).
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Delivery attempt exceeded its timeout.
    #[error("Request timeout")]
    Timeout,

    /// Payload could not be serialized.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// DLQ store unavailable or failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Configuration error. Fatal at processor startup; never retried.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DlqError {
    fn from(err: serde_json::Error) -> Self {
        DlqError::InvalidPayload(err.to_string())
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for DlqError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DlqError::Timeout
        } else {
            DlqError::Delivery(err.to_string())
        }
    }
}
