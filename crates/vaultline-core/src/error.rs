//! Error types for Vaultline Core.

use thiserror::Error;

/// Core errors that can occur while handling ids, records, and payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid object reference: {0}")]
    InvalidObjectRef(String),

    #[error("invalid encryption id: {0}")]
    InvalidEncryptionId(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid access level: {0}")]
    InvalidAccessLevel(u8),

    #[error("payload does not match resource kind: {0}")]
    PayloadKindMismatch(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
