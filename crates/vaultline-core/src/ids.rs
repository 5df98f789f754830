//! Encryption-id allocation.
//!
//! Every ciphertext is scoped to exactly one access-control policy object.
//! The binding lives in the encryption id: the policy object's bytes
//! followed by a random nonce. The id is generated once at encrypt time,
//! embedded in the envelope, and never reused for another resource.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::ObjectRef;

/// Length of the random nonce suffix in bytes.
pub const NONCE_LEN: usize = 5;

/// A policy-bound identifier for one encrypted resource.
///
/// Layout: `policy_ref (32 bytes) ++ nonce (5 bytes)`. Collisions within a
/// policy scope are tolerated probabilistically; the nonce space is large
/// enough that the allocator never checks for duplicates.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptionId(Vec<u8>);

impl EncryptionId {
    /// Total length of an encryption id in bytes.
    pub const LEN: usize = ObjectRef::LEN + NONCE_LEN;

    /// Allocate a fresh id bound to the given policy object.
    ///
    /// Pure function of its random source; no side effects.
    pub fn allocate(policy_ref: &ObjectRef) -> Self {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::from_parts(policy_ref, &nonce)
    }

    /// Reassemble an id from its policy reference and nonce.
    pub fn from_parts(policy_ref: &ObjectRef, nonce: &[u8; NONCE_LEN]) -> Self {
        let mut bytes = Vec::with_capacity(Self::LEN);
        bytes.extend_from_slice(policy_ref.as_bytes());
        bytes.extend_from_slice(nonce);
        Self(bytes)
    }

    /// Reconstruct from raw bytes, validating the layout.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.len() != Self::LEN {
            return Err(CoreError::InvalidEncryptionId(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// The raw id bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The policy object this id is bound to.
    pub fn policy_ref(&self) -> ObjectRef {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&self.0[..ObjectRef::LEN]);
        ObjectRef::from_bytes(arr)
    }

    /// The random nonce suffix.
    pub fn nonce(&self) -> [u8; NONCE_LEN] {
        let mut arr = [0u8; NONCE_LEN];
        arr.copy_from_slice(&self.0[ObjectRef::LEN..]);
        arr
    }

    /// Hex encoding used on the wire and in metadata rows.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse the hex transport encoding.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| CoreError::InvalidEncryptionId(e.to_string()))?;
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for EncryptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EncryptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for EncryptionId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_allocate_binds_policy_ref() {
        let policy = ObjectRef::from_bytes([0x11; 32]);
        let id = EncryptionId::allocate(&policy);
        assert_eq!(id.policy_ref(), policy);
        assert_eq!(id.as_bytes().len(), EncryptionId::LEN);
    }

    #[test]
    fn test_allocate_never_repeats_within_policy_scope() {
        let policy = ObjectRef::from_bytes([0x22; 32]);
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = EncryptionId::allocate(&policy);
            assert!(seen.insert(id.to_hex()), "duplicate encryption id");
        }
    }

    #[test]
    fn test_hex_roundtrip() {
        let policy = ObjectRef::from_bytes([0x33; 32]);
        let id = EncryptionId::allocate(&policy);
        let recovered = EncryptionId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        assert!(EncryptionId::from_bytes(vec![0u8; 36]).is_err());
        assert!(EncryptionId::from_bytes(vec![0u8; 38]).is_err());
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let policy = ObjectRef::from_bytes([0x44; 32]);
        let nonce = [1, 2, 3, 4, 5];
        let id = EncryptionId::from_parts(&policy, &nonce);
        assert_eq!(id.nonce(), nonce);
        assert_eq!(id.policy_ref(), policy);
    }
}
