//! Error types for persistence operations.

use thiserror::Error;

/// Errors that can occur while writing to a claim store.
///
/// Reads never surface these: a missing or unreadable record falls back to
/// its default and the problem is logged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error from a file-backed store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend-specific storage failure (e.g. localStorage unavailable)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Create a storage error with a message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}
