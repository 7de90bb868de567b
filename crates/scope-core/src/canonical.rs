//! # Canonical Text: JCS Memento Rendering
//!
//! This module defines `CanonicalText`, the sole construction path for the
//! textual form of a memento.
//!
//! ## Invariant
//!
//! The `CanonicalText` newtype has a private inner field. The only way to
//! construct it is through `CanonicalText::new()`, which serializes the value
//! to a `serde_json::Value` tree and then renders it with `serde_jcs`
//! (RFC 8785): sorted keys, compact separators, deterministic byte sequence.
//!
//! Memento equivalence is defined as equality of canonical text. Because
//! every comparison path accepts `&CanonicalText`, two mementos built from
//! the same factory calls cannot render differently due to map ordering or
//! whitespace.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::CanonicalizationError;

/// Text produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalText::new()`.
/// - Object keys are sorted, separators are compact (RFC 8785).
/// - The text is valid JSON and re-parses to the serialized value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalText(String);

impl CanonicalText {
    /// Construct canonical text from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let text = serde_jcs::to_string(&value)?;
        Ok(Self(text))
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical text as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Lowercase hex SHA-256 of the canonical bytes.
    ///
    /// Two equivalent mementos share a fingerprint, so it can key a store
    /// of persisted scopes.
    pub fn sha256_hex(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Consume the wrapper and return the text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
