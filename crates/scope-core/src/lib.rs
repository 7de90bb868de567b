//! # scope-core: Foundational Contracts for Scope Selection
//!
//! This crate is the leaf of the scope-selection workspace. It defines the
//! contracts every scope kind implements and the machinery that keeps scopes
//! from different spaces apart. It knows nothing about tokens, mementos of
//! any particular kind, or composition; those live in `scope-algebra`.
//!
//! ## Key Design Principles
//!
//! 1. **Directional satisfaction.** `demander.is_satisfied_by(&supplier)`.
//!    The receiver states the requirement, the argument offers capability.
//!
//! 2. **Spaces are identity anchors.** Each space instance owns a `SpaceId`
//!    drawn at construction. Scopes remember the id of the space that built
//!    them, and the [`distinct`] blanket impls refuse to compare or combine
//!    scopes whose origins differ.
//!
//! 3. **`CanonicalText` newtype.** Memento text that is compared for
//!    equivalence flows through `CanonicalText::new()` (RFC 8785 JCS), so two
//!    equivalent mementos always render to identical bytes.
//!
//! 4. **One error type.** [`ScopeError`] carries the incompatible-space
//!    violation, malformed mementos, and codec failures.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scope-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Test doubles live behind the `mock` feature.

pub mod canonical;
pub mod distinct;
pub mod error;
pub mod identity;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod scope;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalText;
pub use distinct::{require_same_space, DistinctScope, DistinctSpace};
pub use error::{CanonicalizationError, CodecError, ScopeError, SpaceOperation};
pub use identity::SpaceId;
pub use scope::{MementoSpace, Scope, ScopeSpace};
