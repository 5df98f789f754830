//! # Vaultline Store
//!
//! Metadata persistence for resource records.
//!
//! The metadata database itself is an external collaborator; this crate
//! defines the narrow create/read interface the pipeline consumes
//! ([`MetadataStore`]) plus two implementations: an HTTP client for the
//! collaborator's JSON API and an in-memory store for tests.
//!
//! Records are append-only per resource: persistence is idempotency- and
//! durability-wise the collaborator's responsibility, and "updating" a
//! resource means persisting a new record that supersedes the old one.

pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use http::HttpMetadataStore;
pub use memory::MemoryMetadataStore;
pub use traits::MetadataStore;
