//! In-memory metadata store for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use vaultline_core::{ObjectRef, ResourceDraft, ResourceId, ResourceRecord};

use crate::error::{Result, StoreError};
use crate::traits::MetadataStore;

/// RwLock-guarded map of records, with insertion order preserved for
/// stable profile listings.
///
/// Resource ids are derived from the blob locator and encryption id, which
/// keeps them deterministic for fixtures and shaped like ledger object
/// addresses (32-byte hex), matching what the authorization call expects.
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: RwLock<HashMap<String, ResourceRecord>>,
    order: RwLock<Vec<String>>,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn derive_id(draft: &ResourceDraft) -> ResourceId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(draft.blob_id.as_str().as_bytes());
        hasher.update(draft.encryption_id.as_bytes());
        ResourceId::new(format!("0x{}", hasher.finalize().to_hex()))
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn persist(&self, draft: &ResourceDraft) -> Result<ResourceRecord> {
        let resource_id = Self::derive_id(draft);
        let key = resource_id.as_str().to_string();

        let mut records = self.records.write().await;
        if records.contains_key(&key) {
            return Err(StoreError::DuplicateResource(key));
        }

        let record = ResourceRecord::from_draft(draft.clone(), resource_id, now_millis());
        records.insert(key.clone(), record.clone());
        self.order.write().await.push(key);
        Ok(record)
    }

    async fn fetch_for_profile(&self, profile_id: &ObjectRef) -> Result<Vec<ResourceRecord>> {
        let records = self.records.read().await;
        let order = self.order.read().await;
        Ok(order
            .iter()
            .filter_map(|key| records.get(key))
            .filter(|record| &record.profile_id == profile_id)
            .cloned()
            .collect())
    }

    async fn get(&self, resource_id: &ResourceId) -> Result<Option<ResourceRecord>> {
        Ok(self.records.read().await.get(resource_id.as_str()).cloned())
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultline_core::{AccessLevel, BlobLocator, ResourceKind};

    fn draft(profile: u8, blob: &str) -> ResourceDraft {
        ResourceDraft {
            profile_id: ObjectRef::from_bytes([profile; 32]),
            org_id: ObjectRef::from_bytes([0xee; 32]),
            resource_type: ResourceKind::Note,
            blob_id: BlobLocator::new(blob),
            encryption_id: format!("id-{blob}"),
            access_level: AccessLevel::Viewer,
            file_name: None,
            file_size: None,
            content_type: None,
            ledger_ref: "0xref".to_string(),
            created_by: "0xme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_persist_assigns_parseable_id() {
        let store = MemoryMetadataStore::new();
        let record = store.persist(&draft(1, "blob-a")).await.unwrap();

        // Derived ids double as ledger object addresses.
        assert!(ObjectRef::from_hex(record.resource_id.as_str()).is_ok());
        assert!(record.created_at > 0);
    }

    #[tokio::test]
    async fn test_persist_is_append_only() {
        let store = MemoryMetadataStore::new();
        store.persist(&draft(1, "blob-a")).await.unwrap();

        let err = store.persist(&draft(1, "blob-a")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateResource(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_for_profile_filters_and_preserves_order() {
        let store = MemoryMetadataStore::new();
        store.persist(&draft(1, "blob-a")).await.unwrap();
        store.persist(&draft(2, "blob-b")).await.unwrap();
        store.persist(&draft(1, "blob-c")).await.unwrap();

        let records = store
            .fetch_for_profile(&ObjectRef::from_bytes([1; 32]))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].blob_id.as_str(), "blob-a");
        assert_eq!(records[1].blob_id.as_str(), "blob-c");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryMetadataStore::new();
        let missing = store.get(&ResourceId::new("0xnope")).await.unwrap();
        assert!(missing.is_none());
    }
}
