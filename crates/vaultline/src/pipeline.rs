//! The resource pipeline: encrypt→upload→persist and
//! download→decrypt→materialize.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vaultline_blob::{BlobTransport, EndpointPool};
use vaultline_core::{
    AccessLevel, BlobLocator, EncryptionId, ObjectRef, ResourceDraft, ResourcePayload,
    ResourceRecord,
};
use vaultline_crypt::{
    AuthorizationProofBuilder, AuthorizationTemplate, CryptError, KeyServerQuorum, LedgerClient,
    PersonalMessageSigner, SessionKey, ThresholdCodec,
};
use vaultline_store::MetadataStore;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Outcome of a successful write-path invocation.
///
/// `metadata_persisted == false` is the soft-failure shape: the blob is
/// durably stored and decryptable, only the record is missing. The caller
/// holds everything needed to retry persistence.
#[derive(Debug, Clone)]
pub struct StoreOutcome {
    /// The persisted record, when metadata persistence succeeded.
    pub record: Option<ResourceRecord>,
    /// Storage-network locator of the ciphertext blob.
    pub locator: BlobLocator,
    /// The id the ciphertext is bound to.
    pub encryption_id: EncryptionId,
    /// Ledger reference for the stored blob.
    pub ledger_ref: String,
    /// Publisher that accepted the upload.
    pub endpoint_used: String,
    /// Whether the metadata record was persisted.
    pub metadata_persisted: bool,
    /// Soft-failure diagnostic when it was not.
    pub warning: Option<String>,
}

/// One decrypted resource, materialized for the caller.
#[derive(Debug, Clone)]
pub struct DecryptedResource {
    /// The record this plaintext belongs to.
    pub record: ResourceRecord,
    /// The decrypted payload.
    pub bytes: Vec<u8>,
}

/// Result of a best-effort decryption batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Decrypted resources, in the input order of the records that
    /// succeeded.
    pub succeeded: Vec<DecryptedResource>,
    /// How many records were skipped (download miss or decrypt failure).
    pub failed: usize,
}

impl BatchOutcome {
    /// Total records the batch attempted.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed
    }

    /// Human-readable summary, e.g. "3 of 5 decrypted".
    pub fn summary(&self) -> String {
        format!("{} of {} decrypted", self.succeeded.len(), self.total())
    }
}

/// Orchestrates the write and read paths over injected collaborators.
///
/// All clients are constructed by the composition root and passed in; the
/// pipeline holds no process-wide singletons and no mutable shared state,
/// so concurrent invocations are independent.
pub struct Pipeline<S: MetadataStore> {
    codec: ThresholdCodec,
    ledger: Arc<dyn LedgerClient>,
    pool: EndpointPool,
    store: Arc<S>,
    config: PipelineConfig,
}

impl<S: MetadataStore> Pipeline<S> {
    /// Assemble a pipeline from its collaborators and configuration.
    pub fn new(
        quorum: Arc<dyn KeyServerQuorum>,
        ledger: Arc<dyn LedgerClient>,
        transport: Arc<dyn BlobTransport>,
        store: S,
        config: PipelineConfig,
    ) -> Self {
        let codec = ThresholdCodec::new(quorum, config.package_id);
        let pool = EndpointPool::new(
            transport,
            config.publishers.iter().cloned(),
            config.aggregators.iter().cloned(),
            config.pool.clone(),
        );
        Self {
            codec,
            ledger,
            pool,
            store: Arc::new(store),
            config,
        }
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The metadata store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mint a session key for the holder, scoped to this pipeline's
    /// package and ttl.
    pub async fn create_session(&self, signer: &dyn PersonalMessageSigner) -> Result<SessionKey> {
        Ok(SessionKey::create(
            self.config.package_id,
            self.config.session_ttl_min,
            signer,
        )
        .await?)
    }

    /// Fetch all resource records for a contact profile.
    pub async fn resources_for_profile(
        &self,
        profile_id: &ObjectRef,
    ) -> Result<Vec<ResourceRecord>> {
        Ok(self.store.fetch_for_profile(profile_id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Path
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt a payload, store the ciphertext, and record its metadata.
    ///
    /// Failure ordering matters here:
    /// - encryption failure aborts before anything is uploaded;
    /// - upload failure aborts before any metadata is persisted (no record
    ///   may point at a blob that exists nowhere);
    /// - metadata failure after a durable upload is soft — the outcome is
    ///   still a success, carrying a warning and the locator so the caller
    ///   can retry persistence without re-encrypting.
    pub async fn encrypt_and_store(
        &self,
        payload: ResourcePayload,
        profile_id: ObjectRef,
        org_id: ObjectRef,
        org_registry: ObjectRef,
        access_level: AccessLevel,
        created_by: &str,
    ) -> Result<StoreOutcome> {
        let encryption_id = EncryptionId::allocate(&org_registry);
        let resource_type = payload.kind();
        let normalized = payload.normalize();

        debug!(
            %encryption_id,
            %resource_type,
            size = normalized.size,
            "encrypting resource"
        );

        let envelope = self
            .codec
            .encrypt(&normalized.bytes, &encryption_id, self.config.threshold)
            .await?;

        let receipt = self.pool.upload(&envelope.to_bytes()).await?;

        let draft = ResourceDraft {
            profile_id,
            org_id,
            resource_type,
            blob_id: receipt.locator.clone(),
            encryption_id: encryption_id.to_hex(),
            access_level,
            file_name: Some(normalized.file_name),
            file_size: Some(normalized.size),
            content_type: Some(normalized.content_type),
            ledger_ref: receipt.reference.clone(),
            created_by: created_by.to_string(),
        };

        match self.store.persist(&draft).await {
            Ok(record) => {
                info!(
                    resource_id = %record.resource_id,
                    locator = %receipt.locator,
                    "resource stored and recorded"
                );
                Ok(StoreOutcome {
                    record: Some(record),
                    locator: receipt.locator,
                    encryption_id,
                    ledger_ref: receipt.reference,
                    endpoint_used: receipt.endpoint_used,
                    metadata_persisted: true,
                    warning: None,
                })
            }
            Err(e) => {
                // The blob is already durable; losing the whole operation
                // over a record write would discard paid-for encryption and
                // storage work.
                warn!(locator = %receipt.locator, error = %e, "metadata persistence failed");
                Ok(StoreOutcome {
                    record: None,
                    locator: receipt.locator,
                    encryption_id,
                    ledger_ref: receipt.reference,
                    endpoint_used: receipt.endpoint_used,
                    metadata_persisted: false,
                    warning: Some(format!("metadata persistence failed: {e}")),
                })
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Path
    // ─────────────────────────────────────────────────────────────────────────

    /// Download and decrypt a batch of resources, best-effort.
    ///
    /// Records are processed independently in input order; a download miss
    /// or decrypt failure skips that record and counts it, never aborting
    /// the batch. Only the zero-successes case becomes a batch failure.
    pub async fn decrypt_many(
        &self,
        records: &[ResourceRecord],
        org_registry: ObjectRef,
        session: &SessionKey,
    ) -> Result<BatchOutcome> {
        if records.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        // Fast-path check; the codec re-checks before every quorum call.
        if session.is_expired() {
            return Err(PipelineError::SessionExpired);
        }

        let mut succeeded = Vec::new();
        let mut failed = 0usize;

        for record in records {
            match self.decrypt_one(record, org_registry, session).await {
                Ok(bytes) => succeeded.push(DecryptedResource {
                    record: record.clone(),
                    bytes,
                }),
                Err(e) => {
                    warn!(
                        resource = %record.display_name(),
                        blob_id = %record.blob_id,
                        error = %e,
                        "skipping resource"
                    );
                    failed += 1;
                }
            }
        }

        if succeeded.is_empty() {
            return Err(PipelineError::BatchFailed { failed });
        }

        let outcome = BatchOutcome { succeeded, failed };
        info!(summary = %outcome.summary(), "decryption batch finished");
        Ok(outcome)
    }

    /// Decrypt a single record: download, parse, prove, decrypt.
    async fn decrypt_one(
        &self,
        record: &ResourceRecord,
        org_registry: ObjectRef,
        session: &SessionKey,
    ) -> Result<Vec<u8>> {
        let encrypted = self
            .pool
            .download(&record.blob_id)
            .await
            .ok_or_else(|| {
                PipelineError::Crypt(CryptError::DecryptionFailure(format!(
                    "blob {} unavailable on every aggregator",
                    record.blob_id
                )))
            })?;

        // Prefer the minted ledger object; stores that derive record ids
        // from object references let the id itself stand in.
        let resource = match record.resource_object {
            Some(object) => object,
            None => ObjectRef::from_hex(record.resource_id.as_str()).map_err(|_| {
                PipelineError::Crypt(CryptError::ProofBuild(format!(
                    "resource {} has no ledger object reference",
                    record.resource_id
                )))
            })?,
        };

        let proof = AuthorizationProofBuilder::new(
            Arc::clone(&self.ledger),
            self.config.package_id,
            AuthorizationTemplate::CrmResource {
                resource,
                org_registry,
                profile_registry: self.config.profile_registry,
            },
        );

        // The proof inside is built from the envelope's own id, not
        // record.encryption_id.
        Ok(self.codec.decrypt(&encrypted, session, &proof).await?)
    }
}
