//! Error types for the metadata store.

use thiserror::Error;

/// Errors that can occur during metadata persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this resource id already exists (records are
    /// append-only).
    #[error("resource already recorded: {0}")]
    DuplicateResource(String),

    /// Transport-level failure against the collaborator API.
    #[error("metadata transport error: {0}")]
    Transport(String),

    /// The collaborator answered with a non-2xx status.
    #[error("metadata API returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Response body did not deserialize.
    #[error("malformed metadata response: {0}")]
    BadResponse(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
