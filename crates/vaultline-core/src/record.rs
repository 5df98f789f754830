//! Resource metadata records.
//!
//! A [`ResourceDraft`] is what the pipeline hands to the metadata store
//! after a blob is durably stored; a [`ResourceRecord`] is what the store
//! hands back. Records are immutable once stored: `blob_id` and
//! `encryption_id` are set exactly once at creation, and an "update" is a
//! new resource superseding the old record.

use serde::{Deserialize, Serialize};

use crate::types::{AccessLevel, BlobLocator, ObjectRef, ResourceId, ResourceKind};

/// A resource record before the metadata store assigns identity.
///
/// Field names match the metadata collaborator's JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    /// Owning contact profile.
    pub profile_id: ObjectRef,
    /// Organization the resource belongs to.
    pub org_id: ObjectRef,
    /// Note or file.
    pub resource_type: ResourceKind,
    /// Storage-network locator for the ciphertext blob.
    pub blob_id: BlobLocator,
    /// Hex encoding of the encryption id embedded in the envelope.
    pub encryption_id: String,
    /// Minimum role required to decrypt.
    pub access_level: AccessLevel,
    /// Display filename, when the payload was a named file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Plaintext size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Declared content type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Ledger reference for the stored blob (certification event or object).
    pub ledger_ref: String,
    /// Address of the principal that created the resource.
    pub created_by: String,
}

/// A persisted resource record as returned by the metadata store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Store-assigned identifier.
    pub resource_id: ResourceId,
    /// Unix milliseconds at creation.
    pub created_at: i64,
    pub profile_id: ObjectRef,
    pub org_id: ObjectRef,
    pub resource_type: ResourceKind,
    pub blob_id: BlobLocator,
    pub encryption_id: String,
    pub access_level: AccessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub ledger_ref: String,
    pub created_by: String,
    /// Ledger object backing this resource, when one has been minted.
    ///
    /// This is the object the decrypt-time authorization call receives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_object: Option<ObjectRef>,
}

impl ResourceRecord {
    /// Promote a draft to a stored record.
    pub fn from_draft(draft: ResourceDraft, resource_id: ResourceId, created_at: i64) -> Self {
        Self {
            resource_id,
            created_at,
            profile_id: draft.profile_id,
            org_id: draft.org_id,
            resource_type: draft.resource_type,
            blob_id: draft.blob_id,
            encryption_id: draft.encryption_id,
            access_level: draft.access_level,
            file_name: draft.file_name,
            file_size: draft.file_size,
            content_type: draft.content_type,
            ledger_ref: draft.ledger_ref,
            created_by: draft.created_by,
            resource_object: None,
        }
    }

    /// Display name for user-facing progress and diagnostics.
    pub fn display_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.resource_type, self.resource_id))
    }
}
