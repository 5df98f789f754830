//! Key-server quorum capability.
//!
//! The threshold cryptography itself is supplied by an external quorum of
//! key servers. This crate only constructs correct call parameters;
//! implementations live at the composition root (a real network client) or
//! in the testkit (an in-process quorum).

use async_trait::async_trait;

use vaultline_core::{EncryptionId, PackageId};

use crate::error::Result;
use crate::session::SessionKey;

/// Parameters for one quorum decrypt round.
///
/// The `id` here always originates from a parsed envelope; see
/// [`crate::ThresholdCodec::decrypt`].
#[derive(Debug)]
pub struct DecryptRequest<'a> {
    /// The policy package the ciphertext is bound to.
    pub package_id: PackageId,
    /// The envelope-recovered encryption id.
    pub id: &'a EncryptionId,
    /// Minimum number of cooperating servers.
    pub threshold: u8,
    /// The quorum ciphertext from the envelope.
    pub ciphertext: &'a [u8],
    /// The holder's session credential.
    pub session: &'a SessionKey,
    /// Transaction-kind bytes each server dry-runs against the ledger.
    pub proof_tx_bytes: &'a [u8],
}

/// External key-server quorum.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait KeyServerQuorum: Send + Sync {
    /// Encrypt plaintext under the given policy binding.
    ///
    /// Fails when the quorum is unreachable or `threshold` exceeds the
    /// number of cooperating servers; callers must not upload anything on
    /// failure.
    async fn encrypt(
        &self,
        threshold: u8,
        package_id: PackageId,
        id: &EncryptionId,
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Release the plaintext for an authorized request.
    ///
    /// Fails when the proof does not verify, the session is invalid, or
    /// fewer than `threshold` servers respond.
    async fn decrypt(&self, request: DecryptRequest<'_>) -> Result<Vec<u8>>;
}
