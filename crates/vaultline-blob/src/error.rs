//! Error types for the blob module.

use thiserror::Error;

/// Errors that can occur while talking to the storage network.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Every publisher in the ranked list failed; carries the last
    /// endpoint's error.
    #[error("all {attempts} storage endpoints failed; last error: {last_error}")]
    StorageUnavailable { attempts: usize, last_error: String },

    /// Transport-level failure against one endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// An endpoint answered with a non-2xx status.
    #[error("unexpected status {status} from {endpoint}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The per-attempt timeout elapsed.
    #[error("request to {0} timed out")]
    Timeout(String),

    /// A 200 response that did not match either store-reply variant.
    #[error("unrecognized storage response: {0}")]
    BadResponse(String),
}

/// Result type for blob operations.
pub type Result<T> = std::result::Result<T, BlobError>;
