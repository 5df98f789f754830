//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a fully wired pipeline over
//! the in-memory quorum, blob network, and metadata store.

use std::sync::Arc;

use vaultline::{Pipeline, PipelineConfig};
use vaultline_blob::MemoryBlobNetwork;
use vaultline_core::{ObjectRef, PackageId, ResourcePayload, SigningIdentity};
use vaultline_crypt::SessionKey;
use vaultline_store::MemoryMetadataStore;

use crate::ledger::StaticLedger;
use crate::quorum::LocalQuorum;

/// Publisher base URLs every fixture pipeline is configured with.
pub const PUBLISHERS: [&str; 3] = [
    "https://pub-1.test",
    "https://pub-2.test",
    "https://pub-3.test",
];

/// Aggregator base URLs every fixture pipeline is configured with.
pub const AGGREGATORS: [&str; 3] = [
    "https://agg-1.test",
    "https://agg-2.test",
    "https://agg-3.test",
];

/// A wired-up test environment: quorum, blob network, identity, config.
///
/// The quorum and network handles are shared with any pipeline built from
/// the fixture, so tests can flip failure knobs mid-scenario.
pub struct TestFixture {
    pub quorum: Arc<LocalQuorum>,
    pub network: Arc<MemoryBlobNetwork>,
    pub identity: SigningIdentity,
    pub config: PipelineConfig,
}

impl TestFixture {
    /// Three key servers, three publishers, three aggregators.
    pub fn new() -> Self {
        Self::with_servers(3)
    }

    /// Same, with an explicit key-server count.
    pub fn with_servers(servers: usize) -> Self {
        let mut config = PipelineConfig::new(
            PackageId::new(ObjectRef::from_bytes([0xa1; 32])),
            ObjectRef::from_bytes([0xa2; 32]),
        );
        config.publishers = PUBLISHERS.iter().map(|s| s.to_string()).collect();
        config.aggregators = AGGREGATORS.iter().map(|s| s.to_string()).collect();

        Self {
            quorum: Arc::new(LocalQuorum::with_master_key(servers, [0xc3; 32])),
            network: Arc::new(MemoryBlobNetwork::new()),
            identity: SigningIdentity::from_seed(&[0xd4; 32]),
            config,
        }
    }

    /// Build a pipeline over this fixture's collaborators and a fresh
    /// in-memory metadata store.
    pub fn pipeline(&self) -> Pipeline<MemoryMetadataStore> {
        Pipeline::new(
            self.quorum.clone(),
            Arc::new(StaticLedger),
            self.network.clone(),
            MemoryMetadataStore::new(),
            self.config.clone(),
        )
    }

    /// A fresh, valid session for the fixture identity.
    pub async fn session(&self) -> SessionKey {
        SessionKey::create(
            self.config.package_id,
            self.config.session_ttl_min,
            &self.identity,
        )
        .await
        .expect("session creation should not fail with a local signer")
    }

    /// A session whose ttl elapsed before the test started.
    pub async fn expired_session(&self) -> SessionKey {
        SessionKey::create_at(self.config.package_id, 1, &self.identity, 0)
            .await
            .expect("session creation should not fail with a local signer")
    }

    /// The organization registry object used across fixture scenarios.
    pub fn org_registry(&self) -> ObjectRef {
        ObjectRef::from_bytes([0xb1; 32])
    }

    /// A contact profile object.
    pub fn profile(&self) -> ObjectRef {
        ObjectRef::from_bytes([0xb2; 32])
    }

    /// The owning organization object.
    pub fn org(&self) -> ObjectRef {
        ObjectRef::from_bytes([0xb3; 32])
    }

    /// A note payload.
    pub fn note(text: &str) -> ResourcePayload {
        ResourcePayload::Note(text.to_string())
    }

    /// A named file payload.
    pub fn file(name: &str, bytes: &[u8]) -> ResourcePayload {
        ResourcePayload::File {
            name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: bytes.to_vec(),
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaultline_core::AccessLevel;

    #[tokio::test]
    async fn test_fixture_pipeline_roundtrips_a_note() {
        let fixture = TestFixture::new();
        let pipeline = fixture.pipeline();

        let outcome = pipeline
            .encrypt_and_store(
                TestFixture::note("hello"),
                fixture.profile(),
                fixture.org(),
                fixture.org_registry(),
                AccessLevel::Viewer,
                "0xme",
            )
            .await
            .unwrap();
        assert!(outcome.metadata_persisted);

        let records = pipeline
            .resources_for_profile(&fixture.profile())
            .await
            .unwrap();
        let session = fixture.session().await;
        let batch = pipeline
            .decrypt_many(&records, fixture.org_registry(), &session)
            .await
            .unwrap();
        assert_eq!(batch.succeeded[0].bytes, b"hello");
    }
}
