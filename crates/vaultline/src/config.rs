//! Pipeline configuration.
//!
//! Everything environment-specific is injected here: package and registry
//! identifiers, endpoint URL lists, collaborator URLs. Core logic never
//! hard-codes any of it.

use vaultline_blob::PoolConfig;
use vaultline_core::{ObjectRef, PackageId};

use crate::error::{PipelineError, Result};

/// Configuration for a [`crate::Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The access-policy package on the ledger.
    pub package_id: PackageId,
    /// The shared profile registry consulted by authorization checks.
    pub profile_registry: ObjectRef,
    /// Minimum key servers required to decrypt.
    pub threshold: u8,
    /// Session-key lifetime in minutes.
    pub session_ttl_min: u32,
    /// Endpoint timeouts and storage epochs.
    pub pool: PoolConfig,
    /// Ranked publisher base URLs.
    pub publishers: Vec<String>,
    /// Ranked aggregator base URLs.
    pub aggregators: Vec<String>,
    /// Metadata collaborator API base URL.
    pub metadata_url: Option<String>,
    /// Ledger RPC endpoint for the composition root's clients.
    pub rpc_url: Option<String>,
}

impl PipelineConfig {
    /// Defaults for the given deployment's package and profile registry:
    /// threshold 2, 10-minute sessions, standard pool timeouts.
    pub fn new(package_id: PackageId, profile_registry: ObjectRef) -> Self {
        Self {
            package_id,
            profile_registry,
            threshold: 2,
            session_ttl_min: 10,
            pool: PoolConfig::default(),
            publishers: Vec::new(),
            aggregators: Vec::new(),
            metadata_url: None,
            rpc_url: None,
        }
    }

    /// Read configuration from the environment.
    ///
    /// Required: `VAULTLINE_PACKAGE_ID`, `VAULTLINE_PROFILE_REGISTRY`,
    /// `VAULTLINE_PUBLISHERS`, `VAULTLINE_AGGREGATORS` (comma-separated).
    /// Optional: `VAULTLINE_METADATA_URL`, `VAULTLINE_RPC_URL`,
    /// `VAULTLINE_THRESHOLD`, `VAULTLINE_SESSION_TTL_MIN`.
    pub fn from_env() -> Result<Self> {
        let package_id = PackageId::from_hex(&require("VAULTLINE_PACKAGE_ID")?)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let profile_registry = ObjectRef::from_hex(&require("VAULTLINE_PROFILE_REGISTRY")?)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config = Self::new(package_id, profile_registry);
        config.publishers = split_urls(&require("VAULTLINE_PUBLISHERS")?);
        config.aggregators = split_urls(&require("VAULTLINE_AGGREGATORS")?);
        config.metadata_url = std::env::var("VAULTLINE_METADATA_URL").ok();
        config.rpc_url = std::env::var("VAULTLINE_RPC_URL").ok();

        if let Ok(raw) = std::env::var("VAULTLINE_THRESHOLD") {
            config.threshold = raw
                .parse()
                .map_err(|_| PipelineError::Config(format!("bad VAULTLINE_THRESHOLD: {raw}")))?;
        }
        if let Ok(raw) = std::env::var("VAULTLINE_SESSION_TTL_MIN") {
            config.session_ttl_min = raw.parse().map_err(|_| {
                PipelineError::Config(format!("bad VAULTLINE_SESSION_TTL_MIN: {raw}"))
            })?;
        }

        Ok(config)
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| PipelineError::Config(format!("{name} is not set")))
}

fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new(
            PackageId::new(ObjectRef::from_bytes([1; 32])),
            ObjectRef::from_bytes([2; 32]),
        );
        assert_eq!(config.threshold, 2);
        assert_eq!(config.session_ttl_min, 10);
        assert!(config.publishers.is_empty());
    }

    #[test]
    fn test_split_urls() {
        let urls = split_urls("https://a.test, https://b.test ,,https://c.test");
        assert_eq!(urls, vec!["https://a.test", "https://b.test", "https://c.test"]);
    }
}
