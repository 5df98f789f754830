//! Strong type definitions for the Vaultline pipeline.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A 32-byte reference to an on-ledger object.
///
/// Used for organization registries, profile registries, resource objects,
/// and any other policy object the authorization layer touches. Rendered as
/// hex with a `0x` prefix, matching the ledger's address format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef(pub [u8; 32]);

impl ObjectRef {
    /// Length of an object reference in bytes.
    pub const LEN: usize = 32;

    /// Create a new ObjectRef from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| CoreError::InvalidObjectRef(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(CoreError::InvalidObjectRef(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef(0x{})", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", &hex::encode(self.0)[..16])
    }
}

impl AsRef<[u8]> for ObjectRef {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for ObjectRef {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The ledger package that holds the access-control policy logic.
///
/// A thin wrapper over [`ObjectRef`]; the separate type keeps package ids
/// from being confused with registry or resource objects at call sites.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub ObjectRef);

impl PackageId {
    /// Create from an object reference.
    pub const fn new(inner: ObjectRef) -> Self {
        Self(inner)
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Ok(Self(ObjectRef::from_hex(s)?))
    }

    /// Convert to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageId({})", self.0)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque locator for a blob stored on the storage network.
///
/// The network assigns these; this core never inspects their structure.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobLocator(pub String);

impl BlobLocator {
    /// Wrap a raw locator string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobLocator({})", self.0)
    }
}

impl fmt::Display for BlobLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BlobLocator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier assigned by the metadata store to a persisted resource record.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Wrap a raw id string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of content a resource holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A plaintext note authored in the dashboard.
    Note,
    /// An uploaded file attachment.
    File,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Note => write!(f, "note"),
            ResourceKind::File => write!(f, "file"),
        }
    }
}

/// Ordered access roles for resources.
///
/// The ordering is the access-control invariant: a principal authorized at
/// level L can decrypt any resource whose required level is <= L. Serialized
/// as the numeric role codes the ledger contract uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum AccessLevel {
    Viewer = 1,
    Manager = 2,
    Admin = 3,
}

impl AccessLevel {
    /// Whether a principal at this level may access a resource requiring
    /// `required`.
    pub fn permits(&self, required: AccessLevel) -> bool {
        *self >= required
    }
}

impl From<AccessLevel> for u8 {
    fn from(level: AccessLevel) -> u8 {
        level as u8
    }
}

impl TryFrom<u8> for AccessLevel {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, CoreError> {
        match value {
            1 => Ok(AccessLevel::Viewer),
            2 => Ok(AccessLevel::Manager),
            3 => Ok(AccessLevel::Admin),
            other => Err(CoreError::InvalidAccessLevel(other)),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Viewer => write!(f, "viewer"),
            AccessLevel::Manager => write!(f, "manager"),
            AccessLevel::Admin => write!(f, "admin"),
        }
    }
}
