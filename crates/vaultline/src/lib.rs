//! # Vaultline
//!
//! The encrypted-resource pipeline: turn a plaintext note or file into a
//! threshold-encrypted blob on a decentralized storage network, record its
//! locator, and later retrieve and decrypt it under policy-based
//! authorization — tolerating partial failure across many unreliable
//! storage endpoints.
//!
//! ## Write path
//!
//! plaintext → allocate encryption id → threshold encrypt → upload with
//! publisher fallback → persist metadata record.
//!
//! Encryption or upload failure aborts the operation with nothing stored.
//! Metadata persistence failure after a successful upload is deliberately
//! *soft*: the blob exists and the expensive work is done, so the outcome
//! reports success with a warning and the locator, letting the caller retry
//! persistence separately.
//!
//! ## Read path
//!
//! fetch records → download with aggregator fallback → decrypt, gated by a
//! session key and a per-resource authorization proof simulated by the
//! key-server quorum.
//!
//! The read path is a best-effort batch: each record is independent, one
//! failure never aborts the rest, and partial success is a first-class
//! outcome. Only the zero-successes case is promoted to a batch failure.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vaultline::{Pipeline, PipelineConfig};
//! use vaultline::core::{AccessLevel, ObjectRef, PackageId, ResourcePayload};
//! use vaultline_blob::HttpBlobTransport;
//! use vaultline_store::HttpMetadataStore;
//!
//! async fn example(
//!     quorum: Arc<dyn vaultline::crypt::KeyServerQuorum>,
//!     ledger: Arc<dyn vaultline::crypt::LedgerClient>,
//! ) {
//!     let config = PipelineConfig::from_env().unwrap();
//!     let store = HttpMetadataStore::new(config.metadata_url.clone().unwrap());
//!     let pipeline = Pipeline::new(
//!         quorum,
//!         ledger,
//!         Arc::new(HttpBlobTransport::new()),
//!         store,
//!         config,
//!     );
//!
//!     let outcome = pipeline
//!         .encrypt_and_store(
//!             ResourcePayload::Note("meeting recap".into()),
//!             ObjectRef::from_hex("0x11").unwrap_or(ObjectRef::from_bytes([0x11; 32])),
//!             ObjectRef::from_bytes([0x22; 32]),
//!             ObjectRef::from_bytes([0x33; 32]),
//!             AccessLevel::Manager,
//!             "0xme",
//!         )
//!         .await
//!         .unwrap();
//!     println!("stored as {}", outcome.locator);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `vaultline::core` - ids, records, payloads
//! - `vaultline::crypt` - envelope, codec, sessions, proofs
//! - `vaultline::blob` - storage-network endpoint pool
//! - `vaultline::store` - metadata store interface

pub mod config;
pub mod error;
pub mod pipeline;

// Re-export component crates
pub use vaultline_blob as blob;
pub use vaultline_core as core;
pub use vaultline_crypt as crypt;
pub use vaultline_store as store;

// Re-export main types for convenience
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{BatchOutcome, DecryptedResource, Pipeline, StoreOutcome};

// Re-export commonly used component types
pub use vaultline_core::{
    AccessLevel, BlobLocator, EncryptionId, ObjectRef, PackageId, ResourceKind, ResourcePayload,
    ResourceRecord,
};
pub use vaultline_crypt::SessionKey;
