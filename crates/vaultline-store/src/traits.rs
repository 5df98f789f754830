//! MetadataStore trait: the abstract interface for record persistence.
//!
//! The pipeline only ever creates and reads records; everything else
//! (idempotency, retention, indexing) belongs to the collaborator behind
//! the implementation.

use async_trait::async_trait;

use vaultline_core::{ObjectRef, ResourceDraft, ResourceId, ResourceRecord};

use crate::error::Result;

/// Async create/read interface over resource records.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Persist a draft, returning the stored record with its assigned id
    /// and creation timestamp.
    async fn persist(&self, draft: &ResourceDraft) -> Result<ResourceRecord>;

    /// All records for one contact profile, in creation order.
    async fn fetch_for_profile(&self, profile_id: &ObjectRef) -> Result<Vec<ResourceRecord>>;

    /// Look up a single record.
    async fn get(&self, resource_id: &ResourceId) -> Result<Option<ResourceRecord>>;
}
