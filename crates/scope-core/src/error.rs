//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Incompatible-space violations name the operation and both space ids.
//!   They are programming errors and are never retried or swallowed.
//! - Malformed mementos carry a description of the offending node.
//! - Codec and canonicalization failures wrap their own error types.

use thiserror::Error;

use crate::identity::SpaceId;

/// The operation that detected a cross-space violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceOperation {
    /// `is_satisfied_by` between two scopes.
    Compare,
    /// `union` of two scopes.
    Union,
    /// `intersection` of two scopes.
    Intersect,
}

impl SpaceOperation {
    /// The verb used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compare => "compare",
            Self::Union => "union",
            Self::Intersect => "intersect",
        }
    }
}

impl std::fmt::Display for SpaceOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for scope selection.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// Operands were built by a different space than the one performing
    /// the operation.
    #[error("cannot {operation} scopes from different spaces (expected space {expected}, found space {found})")]
    IncompatibleSpace {
        /// The operation that was refused.
        operation: SpaceOperation,
        /// The space the operation runs in (or the receiver's origin).
        expected: SpaceId,
        /// The origin of the offending operand.
        found: SpaceId,
    },

    /// A memento structure matched none of the recognized node shapes.
    #[error("malformed memento: {0}")]
    MalformedMemento(String),

    /// A token could not be encoded or decoded.
    #[error("token codec error: {0}")]
    Codec(#[from] CodecError),

    /// Canonical text production failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

impl ScopeError {
    /// Whether this error is the cross-space violation.
    pub fn is_incompatible_space(&self) -> bool {
        matches!(self, Self::IncompatibleSpace { .. })
    }
}

/// Error raised by a token codec.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The token could not be turned into a structured value.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The structured value does not describe a token.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
