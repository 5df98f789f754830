//! Error types for the pipeline.

use thiserror::Error;

use vaultline_blob::BlobError;
use vaultline_crypt::CryptError;
use vaultline_store::StoreError;

/// Errors crossing the pipeline boundary.
///
/// These are the discriminated failure surface UI-facing callers render
/// inline; nothing in the pipeline panics across this boundary. Note the
/// deliberate asymmetry on the write path: metadata persistence failure is
/// *not* here — it is a warning inside a successful
/// [`crate::StoreOutcome`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The session key's ttl has elapsed; the holder must sign a new
    /// personal message. No retry without re-signing.
    #[error("session key has expired; sign a new personal message")]
    SessionExpired,

    /// decrypt_many was called with no records.
    #[error("no resources provided for decryption")]
    EmptyBatch,

    /// Every record in the batch failed to download or decrypt.
    #[error("failed to decrypt any of {failed} resources; check authorization")]
    BatchFailed { failed: usize },

    /// Encryption/decryption layer failure.
    #[error("crypt error: {0}")]
    Crypt(#[from] CryptError),

    /// Storage-network failure.
    #[error("storage error: {0}")]
    Blob(#[from] BlobError),

    /// Metadata read failure (write-path persistence failures are soft).
    #[error("metadata error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
