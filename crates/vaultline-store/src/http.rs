//! HTTP client for the metadata collaborator API.
//!
//! Wire surface: `POST {base}/resources` with the draft as JSON,
//! `GET {base}/resources?profile_id={hex}`, `GET {base}/resources/{id}`.

use async_trait::async_trait;
use tracing::debug;

use vaultline_core::{ObjectRef, ResourceDraft, ResourceId, ResourceRecord};

use crate::error::{Result, StoreError};
use crate::traits::MetadataStore;

/// Metadata store backed by the collaborator's JSON API.
pub struct HttpMetadataStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetadataStore {
    /// Create a store client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a store client around an existing HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn resources_url(&self) -> String {
        format!("{}/resources", self.base_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl MetadataStore for HttpMetadataStore {
    async fn persist(&self, draft: &ResourceDraft) -> Result<ResourceRecord> {
        debug!(blob_id = %draft.blob_id, "persisting resource record");

        let response = self
            .client
            .post(self.resources_url())
            .json(draft)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::check(response)
            .await?
            .json::<ResourceRecord>()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))
    }

    async fn fetch_for_profile(&self, profile_id: &ObjectRef) -> Result<Vec<ResourceRecord>> {
        let response = self
            .client
            .get(self.resources_url())
            .query(&[("profile_id", profile_id.to_hex())])
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Self::check(response)
            .await?
            .json::<Vec<ResourceRecord>>()
            .await
            .map_err(|e| StoreError::BadResponse(e.to_string()))
    }

    async fn get(&self, resource_id: &ResourceId) -> Result<Option<ResourceRecord>> {
        let url = format!("{}/{}", self.resources_url(), resource_id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::check(response)
            .await?
            .json::<ResourceRecord>()
            .await
            .map(Some)
            .map_err(|e| StoreError::BadResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpMetadataStore::new("https://api.example.com///");
        assert_eq!(store.resources_url(), "https://api.example.com/resources");
    }
}
