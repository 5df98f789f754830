//! Ledger client double.

use async_trait::async_trait;

use vaultline_crypt::{AuthorizationCall, CryptError, LedgerClient, Result};

/// Serializes authorization calls to CBOR transaction-kind bytes.
///
/// No network and no signing; the bytes are self-describing so test
/// quorums can decode and inspect the claimed call.
pub struct StaticLedger;

#[async_trait]
impl LedgerClient for StaticLedger {
    async fn transaction_kind_bytes(&self, call: &AuthorizationCall) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(call, &mut buf).map_err(|e| CryptError::ProofBuild(e.to_string()))?;
        Ok(buf)
    }
}

/// Decode proof bytes produced by [`StaticLedger`] back into the call.
pub fn decode_call(bytes: &[u8]) -> Option<AuthorizationCall> {
    ciborium::from_reader(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultline_core::{EncryptionId, ObjectRef};

    #[tokio::test]
    async fn test_call_roundtrip() {
        let id = EncryptionId::allocate(&ObjectRef::from_bytes([0x12; 32]));
        let call = AuthorizationCall {
            target: "0xpkg::crm_access_control::seal_approve".to_string(),
            id: id.as_bytes().to_vec(),
            objects: vec![ObjectRef::from_bytes([0x13; 32])],
        };

        let bytes = StaticLedger.transaction_kind_bytes(&call).await.unwrap();
        assert_eq!(decode_call(&bytes).unwrap(), call);
    }

    #[test]
    fn test_garbage_does_not_decode() {
        assert!(decode_call(b"not cbor at all \xff").is_none());
    }
}
