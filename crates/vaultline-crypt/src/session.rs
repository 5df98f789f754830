//! Session keys: short-lived, holder-signed decryption credentials.
//!
//! A session key lets the holder batch many decrypt calls behind one
//! personal-message signature. The credential is immutable once issued and
//! expires deterministically at `issued_at + ttl`; every use checks expiry
//! first and fails closed. There is no server-side session table and no
//! silent refresh.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vaultline_core::{Ed25519PublicKey, Ed25519Signature, PackageId, SigningIdentity};

use crate::error::{CryptError, Result};

/// Signs personal (non-transaction) messages on behalf of a principal.
///
/// In production this is a wallet prompt; in tests it is a local keypair.
#[async_trait]
pub trait PersonalMessageSigner: Send + Sync {
    /// The identity that will appear as the session holder.
    fn public_key(&self) -> Ed25519PublicKey;

    /// Sign the given personal message.
    async fn sign_personal(&self, message: &[u8]) -> Result<Ed25519Signature>;
}

#[async_trait]
impl PersonalMessageSigner for SigningIdentity {
    fn public_key(&self) -> Ed25519PublicKey {
        SigningIdentity::public_key(self)
    }

    async fn sign_personal(&self, message: &[u8]) -> Result<Ed25519Signature> {
        Ok(SigningIdentity::sign_personal(self, message))
    }
}

/// A time-bounded decryption credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKey {
    holder: Ed25519PublicKey,
    package_id: PackageId,
    issued_at_ms: i64,
    ttl_min: u32,
    signature: Ed25519Signature,
}

impl SessionKey {
    /// Mint a session key, prompting the holder for a personal-message
    /// signature.
    pub async fn create(
        package_id: PackageId,
        ttl_min: u32,
        signer: &dyn PersonalMessageSigner,
    ) -> Result<Self> {
        Self::create_at(package_id, ttl_min, signer, now_millis()).await
    }

    /// Mint a session key with an explicit issue timestamp.
    ///
    /// Exists so tests can construct already-expired credentials; the
    /// signature still covers the backdated timestamp.
    pub async fn create_at(
        package_id: PackageId,
        ttl_min: u32,
        signer: &dyn PersonalMessageSigner,
        issued_at_ms: i64,
    ) -> Result<Self> {
        let holder = signer.public_key();
        let message = Self::personal_message(&holder, &package_id, issued_at_ms, ttl_min);
        let signature = signer.sign_personal(&message).await?;

        Ok(Self {
            holder,
            package_id,
            issued_at_ms,
            ttl_min,
            signature,
        })
    }

    /// The canonical personal message the holder signs.
    fn personal_message(
        holder: &Ed25519PublicKey,
        package_id: &PackageId,
        issued_at_ms: i64,
        ttl_min: u32,
    ) -> Vec<u8> {
        format!(
            "Authorize decryption sessions for package {} held by {} from {} for {} minutes",
            package_id.to_hex(),
            holder.to_hex(),
            issued_at_ms,
            ttl_min
        )
        .into_bytes()
    }

    /// Whether the key is expired at the given instant.
    ///
    /// Pure function: true iff `now >= issued_at + ttl`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.issued_at_ms + i64::from(self.ttl_min) * 60_000
    }

    /// Whether the key is expired now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    /// Verify the holder's signature over the session parameters.
    pub fn verify(&self) -> Result<()> {
        let message =
            Self::personal_message(&self.holder, &self.package_id, self.issued_at_ms, self.ttl_min);
        self.holder
            .verify_personal(&message, &self.signature)
            .map_err(CryptError::from)
    }

    /// The holder identity.
    pub fn holder(&self) -> &Ed25519PublicKey {
        &self.holder
    }

    /// The policy package this session is scoped to.
    pub fn package_id(&self) -> PackageId {
        self.package_id
    }

    /// Issue timestamp, unix milliseconds.
    pub fn issued_at_ms(&self) -> i64 {
        self.issued_at_ms
    }

    /// Time-to-live in minutes.
    pub fn ttl_min(&self) -> u32 {
        self.ttl_min
    }
}

/// Get current time in milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
