//! # Vaultline Testkit
//!
//! Testing utilities for the Vaultline pipeline.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **LocalQuorum**: a deterministic in-process key-server quorum that
//!   enforces real authorization semantics (session validity, proof/id
//!   binding, threshold availability) over real AEAD encryption
//! - **StaticLedger**: a ledger client that serializes authorization calls
//!   without any network
//! - **Fixtures**: one-call setup for a fully wired pipeline over in-memory
//!   collaborators
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up a pipeline scenario:
//!
//! ```rust,ignore
//! use vaultline_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let pipeline = fixture.pipeline();
//! let session = fixture.session().await;
//! ```
//!
//! ## Simulating failure
//!
//! The quorum and blob network doubles expose failure knobs:
//!
//! ```rust,ignore
//! fixture.quorum.set_offline(2);                       // threshold unmet
//! fixture.quorum.deny(&encryption_id);                 // authorization denied
//! fixture.network.fail_endpoint("https://pub-1.test"); // endpoint down
//! ```

pub mod fixtures;
pub mod generators;
pub mod ledger;
pub mod quorum;

pub use fixtures::TestFixture;
pub use ledger::{decode_call, StaticLedger};
pub use quorum::LocalQuorum;
