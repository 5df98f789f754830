//! Proptest generators for property-based testing.

use proptest::prelude::*;

use vaultline_core::{
    AccessLevel, EncryptionId, ObjectRef, PackageId, ResourceKind, ResourcePayload, NONCE_LEN,
};

/// Generate a random ObjectRef.
pub fn object_ref() -> impl Strategy<Value = ObjectRef> {
    any::<[u8; 32]>().prop_map(ObjectRef::from_bytes)
}

/// Generate a random PackageId.
pub fn package_id() -> impl Strategy<Value = PackageId> {
    object_ref().prop_map(PackageId::new)
}

/// Generate a structurally valid EncryptionId.
pub fn encryption_id() -> impl Strategy<Value = EncryptionId> {
    (any::<[u8; 32]>(), any::<[u8; NONCE_LEN]>())
        .prop_map(|(policy, nonce)| EncryptionId::from_parts(&ObjectRef::from_bytes(policy), &nonce))
}

/// Generate an AccessLevel.
pub fn access_level() -> impl Strategy<Value = AccessLevel> {
    prop_oneof![
        Just(AccessLevel::Viewer),
        Just(AccessLevel::Manager),
        Just(AccessLevel::Admin),
    ]
}

/// Generate a ResourceKind.
pub fn resource_kind() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![Just(ResourceKind::Note), Just(ResourceKind::File)]
}

/// Generate payload bytes of specified max length.
pub fn payload_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a file name with a common extension.
pub fn file_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,24}\\.(txt|pdf|png|csv)".prop_map(String::from)
}

/// Generate a resource payload of either kind.
pub fn resource_payload(max_len: usize) -> impl Strategy<Value = ResourcePayload> {
    prop_oneof![
        "[ -~]{0,256}".prop_map(ResourcePayload::Note),
        (file_name(), payload_bytes(max_len)).prop_map(|(name, bytes)| ResourcePayload::File {
            name,
            content_type: None,
            bytes,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_encryption_ids_have_valid_layout(id in encryption_id()) {
            prop_assert_eq!(id.as_bytes().len(), EncryptionId::LEN);
            let recovered = EncryptionId::from_hex(&id.to_hex()).unwrap();
            prop_assert_eq!(id, recovered);
        }

        #[test]
        fn access_level_ordering_is_total(a in access_level(), b in access_level()) {
            prop_assert_eq!(a.permits(b) || b.permits(a), true);
        }

        #[test]
        fn normalized_payload_preserves_bytes(payload in resource_payload(512)) {
            let kind = payload.kind();
            let normalized = payload.normalize();
            match kind {
                ResourceKind::Note => prop_assert_eq!(normalized.content_type, "text/plain"),
                ResourceKind::File => prop_assert!(normalized.size == normalized.bytes.len() as u64),
            }
        }
    }
}
