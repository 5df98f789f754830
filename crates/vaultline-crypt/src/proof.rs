//! Authorization proof construction.
//!
//! Each key server decides whether to release key material by dry-running a
//! ledger call that encodes the requester's claim. This module builds that
//! call: the target entry function, the encryption id being claimed, and
//! the policy objects the contract inspects. The call is serialized to
//! transaction-kind bytes by a [`LedgerClient`] and never submitted as a
//! state-changing transaction.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use vaultline_core::{EncryptionId, ObjectRef, PackageId};

use crate::error::Result;

/// A fully parameterized authorization call, ready for serialization.
///
/// The encryption id is always part of the call so the serialized bytes
/// bind the proof to exactly one ciphertext; a proof for one id cannot be
/// replayed against another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCall {
    /// Entry function, `{package}::{module}::{function}`.
    pub target: String,
    /// The claimed encryption id, as raw bytes.
    pub id: Vec<u8>,
    /// Ledger objects the entry function receives.
    pub objects: Vec<ObjectRef>,
}

/// Serializes authorization calls into transaction-kind bytes.
///
/// This is a read/simulate capability only; nothing built here is ever
/// executed for effects.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Build the transaction-kind-only byte serialization of a call.
    async fn transaction_kind_bytes(&self, call: &AuthorizationCall) -> Result<Vec<u8>>;
}

/// Domain-specific shapes of the authorization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationTemplate {
    /// CRM access check: the resource object plus the organization and
    /// profile registries the contract consults for role membership.
    CrmResource {
        resource: ObjectRef,
        org_registry: ObjectRef,
        profile_registry: ObjectRef,
    },
    /// Plain allowlist check: a single whitelist object.
    Allowlist { allowlist: ObjectRef },
}

impl AuthorizationTemplate {
    /// Bind the template to a concrete encryption id.
    fn call_for(&self, package_id: PackageId, id: &EncryptionId) -> AuthorizationCall {
        match self {
            AuthorizationTemplate::CrmResource {
                resource,
                org_registry,
                profile_registry,
            } => AuthorizationCall {
                target: format!("{}::crm_access_control::seal_approve", package_id.to_hex()),
                id: id.as_bytes().to_vec(),
                objects: vec![*resource, *org_registry, *profile_registry],
            },
            AuthorizationTemplate::Allowlist { allowlist } => AuthorizationCall {
                target: format!("{}::allowlist::seal_approve", package_id.to_hex()),
                id: id.as_bytes().to_vec(),
                objects: vec![*allowlist],
            },
        }
    }
}

/// Builds proof bytes for the quorum to simulate.
///
/// The `id` handed to [`AuthorizationProofBuilder::build`] must come from a
/// parsed envelope; the codec owns that ordering and is the only decrypt
/// path through this builder.
pub struct AuthorizationProofBuilder {
    ledger: Arc<dyn LedgerClient>,
    package_id: PackageId,
    template: AuthorizationTemplate,
}

impl AuthorizationProofBuilder {
    /// Create a builder for one resource's authorization check.
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        package_id: PackageId,
        template: AuthorizationTemplate,
    ) -> Self {
        Self {
            ledger,
            package_id,
            template,
        }
    }

    /// Build transaction-kind proof bytes bound to the given id.
    pub async fn build(&self, id: &EncryptionId) -> Result<Vec<u8>> {
        let call = self.template.call_for(self.package_id, id);
        self.ledger.transaction_kind_bytes(&call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> PackageId {
        PackageId::new(ObjectRef::from_bytes([0xaa; 32]))
    }

    #[test]
    fn test_crm_template_call_shape() {
        let resource = ObjectRef::from_bytes([1; 32]);
        let org = ObjectRef::from_bytes([2; 32]);
        let profiles = ObjectRef::from_bytes([3; 32]);
        let id = EncryptionId::allocate(&org);

        let template = AuthorizationTemplate::CrmResource {
            resource,
            org_registry: org,
            profile_registry: profiles,
        };
        let call = template.call_for(package(), &id);

        assert!(call.target.ends_with("::crm_access_control::seal_approve"));
        assert_eq!(call.id, id.as_bytes());
        assert_eq!(call.objects, vec![resource, org, profiles]);
    }

    #[test]
    fn test_allowlist_template_call_shape() {
        let allowlist = ObjectRef::from_bytes([4; 32]);
        let id = EncryptionId::allocate(&allowlist);

        let call = AuthorizationTemplate::Allowlist { allowlist }.call_for(package(), &id);

        assert!(call.target.ends_with("::allowlist::seal_approve"));
        assert_eq!(call.objects, vec![allowlist]);
    }

    #[test]
    fn test_calls_for_different_ids_differ() {
        let allowlist = ObjectRef::from_bytes([5; 32]);
        let template = AuthorizationTemplate::Allowlist { allowlist };

        let a = template.call_for(package(), &EncryptionId::allocate(&allowlist));
        let b = template.call_for(package(), &EncryptionId::allocate(&allowlist));
        assert_ne!(a, b);
    }
}
