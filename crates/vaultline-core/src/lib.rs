//! # Vaultline Core
//!
//! Pure primitives for the Vaultline encrypted-resource pipeline.
//!
//! This crate contains no I/O, no networking, no key-server calls. It is
//! plain computation over the identifiers and records that flow through the
//! pipeline.
//!
//! ## Key Types
//!
//! - [`EncryptionId`] - Policy-bound identifier embedded in every ciphertext
//! - [`ObjectRef`] - 32-byte reference to an on-ledger object
//! - [`ResourceRecord`] - Metadata row describing one stored resource
//! - [`AccessLevel`] - Ordered viewer/manager/admin role ladder
//! - [`ResourcePayload`] - Note or file input, normalized to bytes

pub mod crypto;
pub mod error;
pub mod ids;
pub mod payload;
pub mod record;
pub mod types;

pub use crypto::{Ed25519PublicKey, Ed25519Signature, SigningIdentity};
pub use error::{CoreError, Result};
pub use ids::{EncryptionId, NONCE_LEN};
pub use payload::{NormalizedPayload, ResourcePayload};
pub use record::{ResourceDraft, ResourceRecord};
pub use types::{AccessLevel, BlobLocator, ObjectRef, PackageId, ResourceId, ResourceKind};
