//! Error types for the memory store.

use thiserror::Error;

/// Errors returned by memory store operations.
///
/// A missing record on update/delete is not an error; those operations
/// report it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The stored document for a user exists but does not parse.
    /// The document is left on disk untouched.
    #[error("corrupt memory document for user {user_id}: {source}")]
    Corrupt {
        user_id: String,
        #[source]
        source: serde_json::Error,
    },

    /// I/O failure while loading or saving a document.
    #[error("memory storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The per-user lock could not be acquired within the configured bound.
    #[error("memory store busy for user {user_id}")]
    Busy { user_id: String },
}

pub type Result<T> = std::result::Result<T, MemoryError>;
