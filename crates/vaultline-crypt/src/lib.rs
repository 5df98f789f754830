//! # Vaultline Crypt
//!
//! Threshold-encryption plumbing for the resource pipeline.
//!
//! ## Overview
//!
//! The threshold primitives themselves live behind the [`KeyServerQuorum`]
//! capability: an external quorum of key servers that releases decryption
//! material only after dry-running an authorization call against the ledger.
//! This crate owns everything around that capability:
//!
//! - **SealedEnvelope**: the self-describing ciphertext container. The
//!   envelope embeds its own encryption id so decryption can proceed even if
//!   external metadata is partially lost.
//! - **ThresholdCodec**: encrypt/decrypt orchestration. On decrypt it
//!   *always* recovers the id by parsing the envelope and builds the
//!   authorization proof from that recovered id; a caller-supplied id is
//!   never trusted.
//! - **SessionKey**: a short-lived, holder-signed credential that batches
//!   authorization checks. Expiry fails closed, with no auto-renewal.
//! - **AuthorizationProofBuilder**: constructs the transaction-kind bytes
//!   each key server simulates. Parameterized per domain (CRM resource
//!   check, plain allowlist check).
//!
//! ## Ordering invariant
//!
//! Proof building happens strictly after envelope parsing. The codec
//! enforces this by doing both internally; there is no public way to feed a
//! hand-picked id into the proof for a decrypt call.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod proof;
pub mod quorum;
pub mod session;

pub use codec::ThresholdCodec;
pub use envelope::{EnvelopeFormat, SealedEnvelope};
pub use error::{CryptError, Result};
pub use proof::{AuthorizationCall, AuthorizationProofBuilder, AuthorizationTemplate, LedgerClient};
pub use quorum::{DecryptRequest, KeyServerQuorum};
pub use session::{now_millis, PersonalMessageSigner, SessionKey};
