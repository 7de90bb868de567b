//! # Space Identity
//!
//! Every scope space instance is an identity anchor. Two spaces built by
//! the same rules over the same token type are still different spaces, and
//! scopes from one must never be compared with scopes from the other.
//!
//! `SpaceId` is drawn once, at space construction, and is shared by every
//! clone of that space's handle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scope space instance.
///
/// Ids are only drawn by [`SpaceId::new`]; the inner UUID is read-only.
///
/// ```compile_fail
/// let forged = scope_core::SpaceId(uuid::Uuid::nil());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceId(Uuid);

impl SpaceId {
    /// Generate a new random space identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SpaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SpaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
