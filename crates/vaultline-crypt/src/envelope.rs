//! Self-describing ciphertext envelope.
//!
//! The envelope carries its own encryption id, package binding, and
//! threshold alongside the ciphertext. Metadata loss on the record side
//! never strands a blob: everything a decrypt request needs (beyond the
//! authorization proof) is recoverable by parsing the blob itself.

use serde::{Deserialize, Serialize};

use vaultline_core::{EncryptionId, PackageId};

use crate::error::{CryptError, Result};

/// Format identifier for sealed envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnvelopeFormat {
    /// Threshold encryption, version 1.
    ThresholdV1 = 1,
}

/// A threshold-encrypted payload envelope.
///
/// Serialized as CBOR; the byte blob stored on the storage network is
/// exactly `to_bytes()` of this structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// Envelope format version.
    pub format: EnvelopeFormat,

    /// The policy package this ciphertext is bound to.
    pub package_id: PackageId,

    /// The embedded encryption id. Private: decryption code must go
    /// through [`SealedEnvelope::id`] on a *parsed* envelope.
    id: EncryptionId,

    /// Minimum number of key servers required to decrypt.
    pub threshold: u8,

    /// The quorum-produced ciphertext.
    pub ciphertext: Vec<u8>,
}

impl SealedEnvelope {
    /// Assemble an envelope around a quorum ciphertext.
    pub fn new(
        package_id: PackageId,
        id: EncryptionId,
        threshold: u8,
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            format: EnvelopeFormat::ThresholdV1,
            package_id,
            id,
            threshold,
            ciphertext,
        }
    }

    /// The encryption id embedded at encrypt time.
    pub fn id(&self) -> &EncryptionId {
        &self.id
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("CBOR serialization failed");
        buf
    }

    /// Parse an envelope from stored bytes.
    ///
    /// This is the only way to obtain the id for a decrypt request; the
    /// id is validated against the expected layout on the way in.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let envelope: SealedEnvelope = ciborium::from_reader(bytes)
            .map_err(|e| CryptError::MalformedEnvelope(e.to_string()))?;
        // Re-validate the embedded id layout; serde alone does not check it.
        EncryptionId::from_bytes(envelope.id.as_bytes().to_vec())?;
        Ok(envelope)
    }

    /// Size of the ciphertext in bytes.
    pub fn ciphertext_len(&self) -> usize {
        self.ciphertext.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultline_core::ObjectRef;

    fn sample_id() -> EncryptionId {
        EncryptionId::allocate(&ObjectRef::from_bytes([0x55; 32]))
    }

    fn sample_package() -> PackageId {
        PackageId::new(ObjectRef::from_bytes([0x77; 32]))
    }

    #[test]
    fn test_envelope_roundtrip() {
        let id = sample_id();
        let envelope = SealedEnvelope::new(sample_package(), id.clone(), 2, vec![9, 8, 7]);

        let bytes = envelope.to_bytes();
        let recovered = SealedEnvelope::parse(&bytes).unwrap();

        assert_eq!(recovered, envelope);
        assert_eq!(recovered.id(), &id);
        assert_eq!(recovered.threshold, 2);
    }

    #[test]
    fn test_envelope_self_describes_id() {
        // The id must be recoverable from the bytes alone, with no record
        // metadata in sight.
        let id = sample_id();
        let bytes =
            SealedEnvelope::new(sample_package(), id.clone(), 2, vec![0u8; 64]).to_bytes();

        let parsed = SealedEnvelope::parse(&bytes).unwrap();
        assert_eq!(parsed.id().to_hex(), id.to_hex());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SealedEnvelope::parse(b"not an envelope").is_err());
        assert!(SealedEnvelope::parse(&[]).is_err());
    }
}
