//! # Vaultline Blob
//!
//! Client for the content-addressed storage network that holds encrypted
//! resource blobs.
//!
//! ## Overview
//!
//! The network is reached through many independent third-party HTTP
//! endpoints with uncorrelated uptime: *publishers* accept uploads,
//! *aggregators* serve downloads. No single endpoint is trusted to be up,
//! so every operation walks a ranked endpoint list until one succeeds.
//!
//! - [`EndpointPool`] - ordered fallback iteration with per-attempt timeouts
//! - [`BlobTransport`] - the wire seam; [`HttpBlobTransport`] for production,
//!   [`memory::MemoryBlobNetwork`] for tests
//! - [`StoreReply`] - the publisher's two-variant response
//!   (already stored vs newly stored), normalized once at the pool boundary
//!
//! Fallback is strictly sequential by design: concurrent probing of dozens
//! of free third-party endpoints would amplify load and muddy first-success
//! semantics. Worst-case latency is bounded by `endpoints x timeout`.

pub mod endpoint;
pub mod error;
pub mod pool;
pub mod reply;
pub mod transport;

pub use endpoint::{EndpointRole, StorageEndpoint};
pub use error::{BlobError, Result};
pub use pool::{EndpointPool, PoolConfig, UploadReceipt};
pub use reply::{StoreReply, StoredBlob};
pub use transport::{memory::MemoryBlobNetwork, BlobTransport, HttpBlobTransport};
