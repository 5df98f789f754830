//! Blob transport abstraction.
//!
//! The transport is the wire seam under the endpoint pool: one attempt
//! against one endpoint. Implementations may use HTTP or anything else;
//! the pool owns fallback and timeouts.

use async_trait::async_trait;
use bytes::Bytes;

use vaultline_core::BlobLocator;

use crate::endpoint::StorageEndpoint;
use crate::error::{BlobError, Result};
use crate::reply::StoreReply;

/// Transport trait for single-endpoint blob operations.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait BlobTransport: Send + Sync {
    /// Store bytes on one publisher endpoint.
    async fn put_blob(
        &self,
        endpoint: &StorageEndpoint,
        epochs: u64,
        bytes: &[u8],
    ) -> Result<StoreReply>;

    /// Fetch a blob from one aggregator endpoint.
    async fn get_blob(&self, endpoint: &StorageEndpoint, locator: &BlobLocator) -> Result<Bytes>;
}

/// Production transport over HTTP.
pub struct HttpBlobTransport {
    client: reqwest::Client,
}

impl HttpBlobTransport {
    /// Create a transport with a default client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport around an existing client (shared connection
    /// pools, custom TLS config).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpBlobTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobTransport for HttpBlobTransport {
    async fn put_blob(
        &self,
        endpoint: &StorageEndpoint,
        epochs: u64,
        bytes: &[u8],
    ) -> Result<StoreReply> {
        let url = endpoint.store_url(epochs);
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::UnexpectedStatus {
                endpoint: endpoint.base_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<StoreReply>()
            .await
            .map_err(|e| BlobError::BadResponse(e.to_string()))
    }

    async fn get_blob(&self, endpoint: &StorageEndpoint, locator: &BlobLocator) -> Result<Bytes> {
        let url = endpoint.blob_url(locator);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/octet-stream, */*")
            .send()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::UnexpectedStatus {
                endpoint: endpoint.base_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))
    }
}

/// An in-memory storage network for testing.
///
/// Content-addressed like the real network: the locator is the blake3 hash
/// of the blob bytes, so storing the same content twice yields the
/// "already certified" reply. Individual endpoints can be marked as failing
/// to script fallback scenarios.
pub mod memory {
    use super::*;
    use crate::reply::{AlreadyCertified, BlobObject, CertificationEvent, NewlyCreated};
    use std::collections::{HashMap, HashSet};
    use tokio::sync::RwLock;

    /// Shared state for the simulated network.
    #[derive(Default)]
    pub struct MemoryBlobNetwork {
        blobs: RwLock<HashMap<String, Bytes>>,
        failing: RwLock<HashSet<String>>,
        attempts: RwLock<Vec<String>>,
    }

    impl MemoryBlobNetwork {
        /// Create an empty network.
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark an endpoint (by base URL) as down.
        pub async fn fail_endpoint(&self, base_url: &str) {
            self.failing.write().await.insert(base_url.to_string());
        }

        /// Bring a failed endpoint back.
        pub async fn restore_endpoint(&self, base_url: &str) {
            self.failing.write().await.remove(base_url);
        }

        /// The base URLs attempted so far, in order.
        pub async fn attempts(&self) -> Vec<String> {
            self.attempts.read().await.clone()
        }

        /// Number of blobs currently stored.
        pub async fn blob_count(&self) -> usize {
            self.blobs.read().await.len()
        }

        async fn record_attempt(&self, endpoint: &StorageEndpoint) -> Result<()> {
            self.attempts
                .write()
                .await
                .push(endpoint.base_url.clone());
            if self.failing.read().await.contains(&endpoint.base_url) {
                return Err(BlobError::Transport(format!(
                    "simulated outage at {}",
                    endpoint.base_url
                )));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BlobTransport for MemoryBlobNetwork {
        async fn put_blob(
            &self,
            endpoint: &StorageEndpoint,
            _epochs: u64,
            bytes: &[u8],
        ) -> Result<StoreReply> {
            self.record_attempt(endpoint).await?;

            let locator = blake3::hash(bytes).to_hex().to_string();
            let mut blobs = self.blobs.write().await;

            if blobs.contains_key(&locator) {
                Ok(StoreReply::AlreadyCertified(AlreadyCertified {
                    blob_id: locator.clone(),
                    event: CertificationEvent {
                        tx_digest: format!("0xcert{}", &locator[..8]),
                    },
                }))
            } else {
                blobs.insert(locator.clone(), Bytes::copy_from_slice(bytes));
                Ok(StoreReply::NewlyCreated(NewlyCreated {
                    blob_object: BlobObject {
                        blob_id: locator.clone(),
                        id: format!("0xblob{}", &locator[..8]),
                    },
                }))
            }
        }

        async fn get_blob(
            &self,
            endpoint: &StorageEndpoint,
            locator: &BlobLocator,
        ) -> Result<Bytes> {
            self.record_attempt(endpoint).await?;

            self.blobs
                .read()
                .await
                .get(locator.as_str())
                .cloned()
                .ok_or_else(|| BlobError::UnexpectedStatus {
                    endpoint: endpoint.base_url.clone(),
                    status: 404,
                    body: "blob not found".to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryBlobNetwork;
    use super::*;

    #[tokio::test]
    async fn test_memory_network_store_and_fetch() {
        let network = MemoryBlobNetwork::new();
        let publisher = StorageEndpoint::publisher("https://pub-1.test");
        let aggregator = StorageEndpoint::aggregator("https://agg-1.test");

        let reply = network.put_blob(&publisher, 1, b"ciphertext").await.unwrap();
        let stored = reply.into_stored();

        let fetched = network.get_blob(&aggregator, &stored.locator).await.unwrap();
        assert_eq!(fetched.as_ref(), b"ciphertext");
    }

    #[tokio::test]
    async fn test_memory_network_is_content_addressed() {
        let network = MemoryBlobNetwork::new();
        let publisher = StorageEndpoint::publisher("https://pub-1.test");

        let first = network.put_blob(&publisher, 1, b"same bytes").await.unwrap();
        let second = network.put_blob(&publisher, 1, b"same bytes").await.unwrap();

        assert!(matches!(first, StoreReply::NewlyCreated(_)));
        assert!(matches!(second, StoreReply::AlreadyCertified(_)));
        assert_eq!(
            first.into_stored().locator,
            second.into_stored().locator
        );
        assert_eq!(network.blob_count().await, 1);
    }

    #[tokio::test]
    async fn test_memory_network_scripted_failure() {
        let network = MemoryBlobNetwork::new();
        let publisher = StorageEndpoint::publisher("https://pub-down.test");
        network.fail_endpoint("https://pub-down.test").await;

        let err = network.put_blob(&publisher, 1, b"x").await.unwrap_err();
        assert!(matches!(err, BlobError::Transport(_)));

        network.restore_endpoint("https://pub-down.test").await;
        assert!(network.put_blob(&publisher, 1, b"x").await.is_ok());
    }
}
