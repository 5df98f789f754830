//! Threshold codec: encrypt/decrypt orchestration around the quorum.

use std::sync::Arc;

use tracing::debug;

use vaultline_core::{EncryptionId, PackageId};

use crate::envelope::SealedEnvelope;
use crate::error::{CryptError, Result};
use crate::proof::AuthorizationProofBuilder;
use crate::quorum::{DecryptRequest, KeyServerQuorum};
use crate::session::SessionKey;

/// Wraps plaintext into sealed envelopes and back.
pub struct ThresholdCodec {
    quorum: Arc<dyn KeyServerQuorum>,
    package_id: PackageId,
}

impl ThresholdCodec {
    /// Create a codec bound to one policy package.
    pub fn new(quorum: Arc<dyn KeyServerQuorum>, package_id: PackageId) -> Self {
        Self { quorum, package_id }
    }

    /// The policy package this codec encrypts under.
    pub fn package_id(&self) -> PackageId {
        self.package_id
    }

    /// Encrypt plaintext under a freshly allocated encryption id.
    ///
    /// Any quorum failure aborts before a single byte could reach storage.
    pub async fn encrypt(
        &self,
        plaintext: &[u8],
        id: &EncryptionId,
        threshold: u8,
    ) -> Result<SealedEnvelope> {
        let ciphertext = self
            .quorum
            .encrypt(threshold, self.package_id, id, plaintext)
            .await?;

        debug!(
            id = %id,
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "sealed plaintext"
        );

        Ok(SealedEnvelope::new(
            self.package_id,
            id.clone(),
            threshold,
            ciphertext,
        ))
    }

    /// Decrypt stored envelope bytes.
    ///
    /// Order is fixed: session expiry check (zero quorum calls on expiry),
    /// envelope parse, proof build from the *parsed* id, quorum decrypt.
    /// The record's claimed encryption id plays no part here.
    pub async fn decrypt(
        &self,
        envelope_bytes: &[u8],
        session: &SessionKey,
        proof: &AuthorizationProofBuilder,
    ) -> Result<Vec<u8>> {
        if session.is_expired() {
            return Err(CryptError::SessionExpired);
        }

        let envelope = SealedEnvelope::parse(envelope_bytes)?;
        let proof_tx_bytes = proof.build(envelope.id()).await?;

        debug!(
            id = %envelope.id(),
            threshold = envelope.threshold,
            "requesting quorum decrypt"
        );

        self.quorum
            .decrypt(DecryptRequest {
                package_id: envelope.package_id,
                id: envelope.id(),
                threshold: envelope.threshold,
                ciphertext: &envelope.ciphertext,
                session,
                proof_tx_bytes: &proof_tx_bytes,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::{AuthorizationCall, AuthorizationTemplate, LedgerClient};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use vaultline_core::{ObjectRef, SigningIdentity};

    /// Quorum double: "encrypts" by prefixing a marker, records decrypt
    /// requests for assertions.
    #[derive(Default)]
    struct RecordingQuorum {
        decrypt_calls: AtomicUsize,
        last_decrypt_id: Mutex<Option<String>>,
    }

    #[async_trait]
    impl KeyServerQuorum for RecordingQuorum {
        async fn encrypt(
            &self,
            _threshold: u8,
            _package_id: PackageId,
            _id: &EncryptionId,
            plaintext: &[u8],
        ) -> Result<Vec<u8>> {
            let mut out = b"sealed:".to_vec();
            out.extend_from_slice(plaintext);
            Ok(out)
        }

        async fn decrypt(&self, request: DecryptRequest<'_>) -> Result<Vec<u8>> {
            self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_decrypt_id.lock().unwrap() = Some(request.id.to_hex());
            assert!(!request.proof_tx_bytes.is_empty());
            Ok(request.ciphertext[b"sealed:".len()..].to_vec())
        }
    }

    struct CborLedger;

    #[async_trait]
    impl LedgerClient for CborLedger {
        async fn transaction_kind_bytes(&self, call: &AuthorizationCall) -> Result<Vec<u8>> {
            let mut buf = Vec::new();
            ciborium::into_writer(call, &mut buf)
                .map_err(|e| CryptError::ProofBuild(e.to_string()))?;
            Ok(buf)
        }
    }

    fn package() -> PackageId {
        PackageId::new(ObjectRef::from_bytes([0x21; 32]))
    }

    fn proof_builder() -> AuthorizationProofBuilder {
        AuthorizationProofBuilder::new(
            Arc::new(CborLedger),
            package(),
            AuthorizationTemplate::Allowlist {
                allowlist: ObjectRef::from_bytes([0x31; 32]),
            },
        )
    }

    #[tokio::test]
    async fn test_encrypt_decrypt_roundtrip() {
        let quorum = Arc::new(RecordingQuorum::default());
        let codec = ThresholdCodec::new(quorum.clone(), package());
        let identity = SigningIdentity::generate();
        let session = SessionKey::create(package(), 10, &identity).await.unwrap();

        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x41; 32]));
        let envelope = codec.encrypt(b"payload", &id, 2).await.unwrap();

        let plaintext = codec
            .decrypt(&envelope.to_bytes(), &session, &proof_builder())
            .await
            .unwrap();
        assert_eq!(plaintext, b"payload");
    }

    #[tokio::test]
    async fn test_decrypt_uses_envelope_id_not_caller_metadata() {
        let quorum = Arc::new(RecordingQuorum::default());
        let codec = ThresholdCodec::new(quorum.clone(), package());
        let identity = SigningIdentity::generate();
        let session = SessionKey::create(package(), 10, &identity).await.unwrap();

        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x42; 32]));
        let envelope = codec.encrypt(b"x", &id, 2).await.unwrap();

        codec
            .decrypt(&envelope.to_bytes(), &session, &proof_builder())
            .await
            .unwrap();

        // The quorum saw the id recovered from the envelope itself.
        let seen = quorum.last_decrypt_id.lock().unwrap().clone().unwrap();
        assert_eq!(seen, id.to_hex());
    }

    #[tokio::test]
    async fn test_expired_session_makes_zero_quorum_calls() {
        let quorum = Arc::new(RecordingQuorum::default());
        let codec = ThresholdCodec::new(quorum.clone(), package());
        let identity = SigningIdentity::generate();
        let session = SessionKey::create_at(package(), 1, &identity, 0).await.unwrap();
        assert!(session.is_expired());

        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x43; 32]));
        let envelope = codec.encrypt(b"x", &id, 2).await.unwrap();

        let err = codec
            .decrypt(&envelope.to_bytes(), &session, &proof_builder())
            .await
            .unwrap_err();

        assert!(matches!(err, CryptError::SessionExpired));
        assert_eq!(quorum.decrypt_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_envelope_fails_before_proof() {
        let quorum = Arc::new(RecordingQuorum::default());
        let codec = ThresholdCodec::new(quorum.clone(), package());
        let identity = SigningIdentity::generate();
        let session = SessionKey::create(package(), 10, &identity).await.unwrap();

        let err = codec
            .decrypt(b"garbage", &session, &proof_builder())
            .await
            .unwrap_err();

        assert!(matches!(err, CryptError::MalformedEnvelope(_)));
        assert_eq!(quorum.decrypt_calls.load(Ordering::SeqCst), 0);
    }
}
