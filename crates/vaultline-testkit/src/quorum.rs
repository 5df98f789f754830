//! In-process key-server quorum.
//!
//! Stands in for the external threshold-encryption service. It performs
//! real AEAD encryption with a key derived per (package, encryption id),
//! and enforces the same authorization semantics a live quorum would:
//! session validity, proof/id binding, and threshold availability.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;

use vaultline_core::{EncryptionId, PackageId};
use vaultline_crypt::{CryptError, DecryptRequest, KeyServerQuorum, Result};

use crate::ledger::decode_call;

/// Length of the AEAD nonce prepended to every ciphertext.
const AEAD_NONCE_LEN: usize = 12;

/// A simulated quorum of key servers sharing one master secret.
///
/// Servers can be taken offline to make a threshold unmeetable, and
/// individual encryption ids can be denied to simulate an authorization
/// check failing on the ledger.
pub struct LocalQuorum {
    servers: usize,
    offline: AtomicUsize,
    master_key: [u8; 32],
    denied: Mutex<HashSet<String>>,
    encrypt_calls: AtomicUsize,
    decrypt_calls: AtomicUsize,
}

impl LocalQuorum {
    /// Create a quorum of `servers` key servers with a random master
    /// secret.
    pub fn new(servers: usize) -> Self {
        let mut master_key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut master_key);
        Self::with_master_key(servers, master_key)
    }

    /// Create with a fixed master secret, for deterministic fixtures.
    pub fn with_master_key(servers: usize, master_key: [u8; 32]) -> Self {
        Self {
            servers,
            offline: AtomicUsize::new(0),
            master_key,
            denied: Mutex::new(HashSet::new()),
            encrypt_calls: AtomicUsize::new(0),
            decrypt_calls: AtomicUsize::new(0),
        }
    }

    /// Take `count` servers offline; they stop counting toward thresholds.
    pub fn set_offline(&self, count: usize) {
        self.offline.store(count.min(self.servers), Ordering::SeqCst);
    }

    /// Deny authorization for one encryption id.
    pub fn deny(&self, id: &EncryptionId) {
        self.denied
            .lock()
            .expect("deny table lock poisoned")
            .insert(id.to_hex());
    }

    /// Lift a previous denial.
    pub fn allow(&self, id: &EncryptionId) {
        self.denied
            .lock()
            .expect("deny table lock poisoned")
            .remove(&id.to_hex());
    }

    /// How many encrypt rounds the quorum has served.
    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    /// How many decrypt rounds the quorum has served.
    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }

    fn available(&self) -> usize {
        self.servers - self.offline.load(Ordering::SeqCst)
    }

    fn check_threshold(&self, threshold: u8) -> Result<()> {
        let available = self.available();
        if threshold == 0 || usize::from(threshold) > available {
            return Err(CryptError::ThresholdUnmet {
                needed: threshold,
                available,
            });
        }
        Ok(())
    }

    /// Derive the AEAD key for one (package, id) binding.
    fn derive_key(&self, package_id: PackageId, id: &EncryptionId) -> [u8; 32] {
        let mut input = Vec::with_capacity(32 + id.as_bytes().len());
        input.extend_from_slice(package_id.as_bytes());
        input.extend_from_slice(id.as_bytes());
        *blake3::keyed_hash(&self.master_key, &input).as_bytes()
    }
}

#[async_trait]
impl KeyServerQuorum for LocalQuorum {
    async fn encrypt(
        &self,
        threshold: u8,
        package_id: PackageId,
        id: &EncryptionId,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        self.check_threshold(threshold)?;

        let key = self.derive_key(package_id, id);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));

        let mut nonce = [0u8; AEAD_NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CryptError::EncryptionFailure(e.to_string()))?;

        let mut out = nonce.to_vec();
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    async fn decrypt(&self, request: DecryptRequest<'_>) -> Result<Vec<u8>> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);

        if request.session.is_expired() {
            return Err(CryptError::SessionExpired);
        }
        request.session.verify()?;
        if request.session.package_id() != request.package_id {
            return Err(CryptError::DecryptionFailure(
                "session is scoped to a different package".to_string(),
            ));
        }
        self.check_threshold(request.threshold)?;

        // The proof must be a well-formed ledger call claiming exactly the
        // id the ciphertext is bound to.
        let call = decode_call(request.proof_tx_bytes).ok_or_else(|| {
            CryptError::DecryptionFailure("proof bytes are not a ledger call".to_string())
        })?;
        if call.id != request.id.as_bytes() {
            return Err(CryptError::DecryptionFailure(
                "proof does not match the ciphertext's encryption id".to_string(),
            ));
        }

        let denied = self
            .denied
            .lock()
            .expect("deny table lock poisoned")
            .contains(&request.id.to_hex());
        if denied {
            return Err(CryptError::DecryptionFailure(format!(
                "access denied for id {}",
                request.id
            )));
        }

        if request.ciphertext.len() < AEAD_NONCE_LEN {
            return Err(CryptError::DecryptionFailure(
                "ciphertext shorter than its nonce".to_string(),
            ));
        }
        let (nonce, sealed) = request.ciphertext.split_at(AEAD_NONCE_LEN);

        let key = self.derive_key(request.package_id, request.id);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|e| CryptError::DecryptionFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::StaticLedger;
    use std::sync::Arc;
    use vaultline_core::{ObjectRef, SigningIdentity};
    use vaultline_crypt::{AuthorizationProofBuilder, AuthorizationTemplate, SessionKey};

    fn package() -> PackageId {
        PackageId::new(ObjectRef::from_bytes([0x77; 32]))
    }

    async fn proof_for(id: &EncryptionId) -> Vec<u8> {
        AuthorizationProofBuilder::new(
            Arc::new(StaticLedger),
            package(),
            AuthorizationTemplate::Allowlist {
                allowlist: ObjectRef::from_bytes([0x78; 32]),
            },
        )
        .build(id)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_roundtrip_through_local_quorum() {
        let quorum = LocalQuorum::new(3);
        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x01; 32]));
        let identity = SigningIdentity::generate();
        let session = SessionKey::create(package(), 10, &identity).await.unwrap();

        let ciphertext = quorum.encrypt(2, package(), &id, b"secret").await.unwrap();
        assert_ne!(ciphertext, b"secret");

        let proof = proof_for(&id).await;
        let plaintext = quorum
            .decrypt(DecryptRequest {
                package_id: package(),
                id: &id,
                threshold: 2,
                ciphertext: &ciphertext,
                session: &session,
                proof_tx_bytes: &proof,
            })
            .await
            .unwrap();
        assert_eq!(plaintext, b"secret");
    }

    #[tokio::test]
    async fn test_threshold_exceeding_available_servers_fails() {
        let quorum = LocalQuorum::new(3);
        quorum.set_offline(2);
        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x02; 32]));

        let err = quorum.encrypt(2, package(), &id, b"x").await.unwrap_err();
        assert!(matches!(
            err,
            CryptError::ThresholdUnmet {
                needed: 2,
                available: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_proof_for_other_id_is_rejected() {
        let quorum = LocalQuorum::new(3);
        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x03; 32]));
        let other = EncryptionId::allocate(&ObjectRef::from_bytes([0x03; 32]));
        let identity = SigningIdentity::generate();
        let session = SessionKey::create(package(), 10, &identity).await.unwrap();

        let ciphertext = quorum.encrypt(2, package(), &id, b"x").await.unwrap();
        let wrong_proof = proof_for(&other).await;

        let err = quorum
            .decrypt(DecryptRequest {
                package_id: package(),
                id: &id,
                threshold: 2,
                ciphertext: &ciphertext,
                session: &session,
                proof_tx_bytes: &wrong_proof,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CryptError::DecryptionFailure(_)));
    }

    #[tokio::test]
    async fn test_denied_id_fails_until_allowed() {
        let quorum = LocalQuorum::new(3);
        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x04; 32]));
        let identity = SigningIdentity::generate();
        let session = SessionKey::create(package(), 10, &identity).await.unwrap();

        let ciphertext = quorum.encrypt(2, package(), &id, b"x").await.unwrap();
        let proof = proof_for(&id).await;
        quorum.deny(&id);

        let err = quorum
            .decrypt(DecryptRequest {
                package_id: package(),
                id: &id,
                threshold: 2,
                ciphertext: &ciphertext,
                session: &session,
                proof_tx_bytes: &proof,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CryptError::DecryptionFailure(_)));

        quorum.allow(&id);
        let plaintext = quorum
            .decrypt(DecryptRequest {
                package_id: package(),
                id: &id,
                threshold: 2,
                ciphertext: &ciphertext,
                session: &session,
                proof_tx_bytes: &proof,
            })
            .await
            .unwrap();
        assert_eq!(plaintext, b"x");
    }

    #[tokio::test]
    async fn test_session_for_other_package_is_rejected() {
        let quorum = LocalQuorum::new(3);
        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x05; 32]));
        let identity = SigningIdentity::generate();
        let other_package = PackageId::new(ObjectRef::from_bytes([0x99; 32]));
        let session = SessionKey::create(other_package, 10, &identity)
            .await
            .unwrap();

        let ciphertext = quorum.encrypt(2, package(), &id, b"x").await.unwrap();
        let proof = proof_for(&id).await;

        let err = quorum
            .decrypt(DecryptRequest {
                package_id: package(),
                id: &id,
                threshold: 2,
                ciphertext: &ciphertext,
                session: &session,
                proof_tx_bytes: &proof,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CryptError::DecryptionFailure(_)));
    }

    #[tokio::test]
    async fn test_keys_differ_per_id() {
        let quorum = LocalQuorum::with_master_key(3, [0x55; 32]);
        let a = EncryptionId::allocate(&ObjectRef::from_bytes([0x06; 32]));
        let b = EncryptionId::allocate(&ObjectRef::from_bytes([0x06; 32]));
        assert_ne!(
            quorum.derive_key(package(), &a),
            quorum.derive_key(package(), &b)
        );
    }
}
