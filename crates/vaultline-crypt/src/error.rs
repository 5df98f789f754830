//! Error types for the crypt module.

use thiserror::Error;

/// Errors that can occur during encryption, decryption, and session
/// handling.
#[derive(Debug, Error)]
pub enum CryptError {
    /// The session key's ttl has elapsed. Fails closed; the holder must
    /// sign a new session.
    #[error("session key expired")]
    SessionExpired,

    /// The quorum could not produce a ciphertext.
    #[error("encryption failed: {0}")]
    EncryptionFailure(String),

    /// The quorum refused or failed to release the plaintext.
    #[error("decryption failed: {0}")]
    DecryptionFailure(String),

    /// Fewer key servers are configured or reachable than the threshold
    /// requires.
    #[error("threshold unmet: need {needed} servers, have {available}")]
    ThresholdUnmet { needed: u8, available: usize },

    /// The authorization call could not be built or serialized.
    #[error("authorization proof build failed: {0}")]
    ProofBuild(String),

    /// Envelope bytes did not parse.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Core error.
    #[error("core error: {0}")]
    CoreError(#[from] vaultline_core::CoreError),
}

/// Result type for crypt operations.
pub type Result<T> = std::result::Result<T, CryptError>;
