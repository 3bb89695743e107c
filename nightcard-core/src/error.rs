//! Core error types for `NightCard`.

use thiserror::Error;

/// Core error type for `NightCard` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data, e.g. a stored session outside its invariants.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
