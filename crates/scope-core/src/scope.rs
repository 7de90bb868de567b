//! # Scope and Scope-Space Contracts
//!
//! A scope expresses a requirement, a capability, or both. A scope space is
//! the algebra governing one family of scopes: two distinguished elements
//! and two binary operators.
//!
//! ```text
//! ScopeSpace
//!   ├── any()          demand always met, supplies everything
//!   ├── unspecified()  demand always met, supplies nothing
//!   ├── union(l, r)
//!   └── intersection(l, r)
//! ```
//!
//! Satisfaction is directional: the receiver plays demander, the argument
//! plays supplier.

use serde_json::Value;

use crate::error::ScopeError;

/// A value that can be asked whether another value of its kind satisfies it.
///
/// Scopes are immutable. Cloning is expected to be cheap (shared structure).
pub trait Scope: Clone + Send + Sync {
    /// Treat `self` as a requirement and check whether `other` meets it.
    ///
    /// # Errors
    ///
    /// Kinds that enforce space identity return
    /// [`ScopeError::IncompatibleSpace`] when `other` comes from a different
    /// space. Other kinds always return `Ok`.
    fn is_satisfied_by(&self, other: &Self) -> Result<bool, ScopeError>;
}

/// The set of rules governing a [`Scope`] kind.
pub trait ScopeSpace: Send + Sync {
    /// The kind of scope this space produces.
    type Scope: Scope;

    /// A scope that is satisfied by every scope and supplies everything.
    fn any(&self) -> Self::Scope;

    /// A scope with no declarations: its demand is always met, and it
    /// supplies nothing.
    fn unspecified(&self) -> Self::Scope;

    /// The union of `l` and `r`.
    fn union(&self, l: &Self::Scope, r: &Self::Scope) -> Result<Self::Scope, ScopeError>;

    /// The intersection of `l` and `r`.
    fn intersection(&self, l: &Self::Scope, r: &Self::Scope) -> Result<Self::Scope, ScopeError>;
}

/// A space whose scopes can be captured as a structural memento and
/// rebuilt from one.
///
/// Mementos are plain JSON trees so spaces of different kinds can nest
/// each other's mementos (a composite stores one per dimension).
pub trait MementoSpace: ScopeSpace {
    /// Capture how `scope` was built.
    fn memento_of(&self, scope: &Self::Scope) -> Result<Value, ScopeError>;

    /// Rebuild a scope by replaying the factory calls recorded in `memento`.
    fn scope_from_memento(&self, memento: &Value) -> Result<Self::Scope, ScopeError>;
}
