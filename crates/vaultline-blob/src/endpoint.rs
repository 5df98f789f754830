//! Storage endpoint configuration.
//!
//! Endpoints are pure configuration: a ranked, ordered list consumed
//! left-to-right. No health state is persisted across calls; each
//! operation re-attempts the full ranked list from the top.

use serde::{Deserialize, Serialize};
use std::fmt;

use vaultline_core::BlobLocator;

/// What an endpoint can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    /// Accepts blob uploads.
    Publisher,
    /// Serves blob downloads.
    Aggregator,
}

/// One storage-network endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEndpoint {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Upload or download role.
    pub role: EndpointRole,
}

impl StorageEndpoint {
    /// Create a publisher endpoint.
    pub fn publisher(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_slash(base_url.into()),
            role: EndpointRole::Publisher,
        }
    }

    /// Create an aggregator endpoint.
    pub fn aggregator(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_slash(base_url.into()),
            role: EndpointRole::Aggregator,
        }
    }

    /// Upload URL for this publisher.
    pub fn store_url(&self, epochs: u64) -> String {
        format!("{}/v1/blobs?epochs={}", self.base_url, epochs)
    }

    /// Download URL for a blob on this aggregator.
    pub fn blob_url(&self, locator: &BlobLocator) -> String {
        format!("{}/v1/blobs/{}", self.base_url, locator)
    }
}

impl fmt::Display for StorageEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_url() {
        let publisher = StorageEndpoint::publisher("https://pub.example.com/");
        assert_eq!(
            publisher.store_url(1),
            "https://pub.example.com/v1/blobs?epochs=1"
        );
    }

    #[test]
    fn test_blob_url() {
        let aggregator = StorageEndpoint::aggregator("https://agg.example.com");
        assert_eq!(
            aggregator.blob_url(&BlobLocator::new("abc123")),
            "https://agg.example.com/v1/blobs/abc123"
        );
    }
}
