//! Publisher store replies.
//!
//! A successful store returns one of two JSON variants: the blob was
//! already certified on the network, or it was newly created. Both carry a
//! locator and a ledger reference; the pool normalizes them into a single
//! [`StoredBlob`] exactly once, and nothing downstream re-checks the
//! variant tags.

use serde::{Deserialize, Serialize};

use vaultline_core::BlobLocator;

/// Raw publisher response, as the storage network serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreReply {
    /// The network already holds this (content-addressed) blob.
    AlreadyCertified(AlreadyCertified),
    /// The blob was stored for the first time.
    NewlyCreated(NewlyCreated),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyCertified {
    pub blob_id: String,
    pub event: CertificationEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEvent {
    pub tx_digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewlyCreated {
    pub blob_object: BlobObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobObject {
    pub blob_id: String,
    pub id: String,
}

/// The normalized result of a successful store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// The blob's locator on the network.
    pub locator: BlobLocator,
    /// Ledger reference: certification event digest or blob object id.
    pub reference: String,
}

impl StoreReply {
    /// Collapse both variants into locator + reference.
    pub fn into_stored(self) -> StoredBlob {
        match self {
            StoreReply::AlreadyCertified(reply) => StoredBlob {
                locator: BlobLocator::new(reply.blob_id),
                reference: reply.event.tx_digest,
            },
            StoreReply::NewlyCreated(reply) => StoredBlob {
                locator: BlobLocator::new(reply.blob_object.blob_id),
                reference: reply.blob_object.id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_already_certified() {
        let json = r#"{"alreadyCertified":{"blobId":"blob-1","event":{"txDigest":"0xd1"}}}"#;
        let reply: StoreReply = serde_json::from_str(json).unwrap();

        let stored = reply.into_stored();
        assert_eq!(stored.locator.as_str(), "blob-1");
        assert_eq!(stored.reference, "0xd1");
    }

    #[test]
    fn test_parse_newly_created() {
        let json = r#"{"newlyCreated":{"blobObject":{"blobId":"blob-2","id":"0xobj"}}}"#;
        let reply: StoreReply = serde_json::from_str(json).unwrap();

        let stored = reply.into_stored();
        assert_eq!(stored.locator.as_str(), "blob-2");
        assert_eq!(stored.reference, "0xobj");
    }

    #[test]
    fn test_unknown_shape_fails() {
        assert!(serde_json::from_str::<StoreReply>(r#"{"certified":{}}"#).is_err());
    }
}
