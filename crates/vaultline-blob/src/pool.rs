//! Ranked endpoint pool with sequential fallback.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

use vaultline_core::BlobLocator;

use crate::endpoint::StorageEndpoint;
use crate::error::{BlobError, Result};
use crate::reply::StoredBlob;
use crate::transport::BlobTransport;

/// Timeouts and storage duration for pool operations.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Storage epochs requested on upload.
    pub epochs: u64,
    /// Per-endpoint upload timeout.
    pub upload_timeout: Duration,
    /// Per-endpoint download timeout.
    pub download_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            upload_timeout: Duration::from_secs(30),
            download_timeout: Duration::from_secs(15),
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// The blob's locator on the network.
    pub locator: BlobLocator,
    /// Ledger reference for the stored blob.
    pub reference: String,
    /// Base URL of the publisher that accepted the upload.
    pub endpoint_used: String,
    /// How many publishers were tried, including the successful one.
    pub attempts: usize,
}

/// Ranked list of storage endpoints, tried in order until one succeeds.
///
/// Order is fixed configuration and does not adapt to past successes; the
/// endpoints are free, redundant third-party infrastructure and simplicity
/// wins over optimality here.
pub struct EndpointPool {
    transport: Arc<dyn BlobTransport>,
    publishers: Vec<StorageEndpoint>,
    aggregators: Vec<StorageEndpoint>,
    config: PoolConfig,
}

impl EndpointPool {
    /// Build a pool over the given endpoint URL lists.
    pub fn new(
        transport: Arc<dyn BlobTransport>,
        publisher_urls: impl IntoIterator<Item = String>,
        aggregator_urls: impl IntoIterator<Item = String>,
        config: PoolConfig,
    ) -> Self {
        Self {
            transport,
            publishers: publisher_urls
                .into_iter()
                .map(StorageEndpoint::publisher)
                .collect(),
            aggregators: aggregator_urls
                .into_iter()
                .map(StorageEndpoint::aggregator)
                .collect(),
            config,
        }
    }

    /// Configured publishers, in rank order.
    pub fn publishers(&self) -> &[StorageEndpoint] {
        &self.publishers
    }

    /// Configured aggregators, in rank order.
    pub fn aggregators(&self) -> &[StorageEndpoint] {
        &self.aggregators
    }

    /// Store bytes on the first publisher that accepts them.
    ///
    /// Walks the ranked list strictly in order; a failed endpoint is logged
    /// and skipped, never retried within the call. If every publisher
    /// fails, returns [`BlobError::StorageUnavailable`] carrying the last
    /// endpoint's error.
    pub async fn upload(&self, bytes: &[u8]) -> Result<UploadReceipt> {
        let mut last_error: Option<BlobError> = None;

        for (rank, endpoint) in self.publishers.iter().enumerate() {
            let attempt = tokio::time::timeout(
                self.config.upload_timeout,
                self.transport.put_blob(endpoint, self.config.epochs, bytes),
            )
            .await;

            let error = match attempt {
                Ok(Ok(reply)) => {
                    let StoredBlob { locator, reference } = reply.into_stored();
                    info!(
                        endpoint = %endpoint,
                        %locator,
                        attempts = rank + 1,
                        "blob stored"
                    );
                    return Ok(UploadReceipt {
                        locator,
                        reference,
                        endpoint_used: endpoint.base_url.clone(),
                        attempts: rank + 1,
                    });
                }
                Ok(Err(e)) => e,
                Err(_) => BlobError::Timeout(endpoint.base_url.clone()),
            };

            warn!(endpoint = %endpoint, error = %error, "publisher attempt failed");
            last_error = Some(error);
        }

        Err(BlobError::StorageUnavailable {
            attempts: self.publishers.len(),
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no publishers configured".to_string()),
        })
    }

    /// Fetch a blob from the first aggregator that has it.
    ///
    /// A total miss across every aggregator is `None`, not an error; the
    /// caller decides how to treat it.
    pub async fn download(&self, locator: &BlobLocator) -> Option<Bytes> {
        for endpoint in &self.aggregators {
            let attempt = tokio::time::timeout(
                self.config.download_timeout,
                self.transport.get_blob(endpoint, locator),
            )
            .await;

            let error = match attempt {
                Ok(Ok(bytes)) => {
                    info!(endpoint = %endpoint, %locator, "blob fetched");
                    return Some(bytes);
                }
                Ok(Err(e)) => e,
                Err(_) => BlobError::Timeout(endpoint.base_url.clone()),
            };

            warn!(endpoint = %endpoint, %locator, error = %error, "aggregator attempt failed");
        }

        warn!(
            %locator,
            aggregators = self.aggregators.len(),
            "blob unavailable on every aggregator"
        );
        None
    }
}
