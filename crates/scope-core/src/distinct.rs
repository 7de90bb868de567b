//! # Distinct-Space Enforcement
//!
//! Generic scope algebras are easy to misuse across independently
//! constructed spaces of the same shape: two supply-and-demand spaces over
//! `String` built in different fixtures have identical types. Comparing a
//! scope from one with a scope from the other yields a meaningless answer.
//!
//! A kind opts into enforcement by implementing [`DistinctScope`] and
//! [`DistinctSpace`]. The blanket impls in this module then provide
//! [`Scope`] and [`ScopeSpace`], checking identity before delegating to
//! the kind's own algebra:
//!
//! | Operation | Check |
//! |---|---|
//! | `is_satisfied_by` | `self.origin() == other.origin()` |
//! | `union` / `intersection` | both operand origins equal the space's id |
//!
//! A mismatch is returned as [`ScopeError::IncompatibleSpace`] naming the
//! refused operation.

use crate::error::{ScopeError, SpaceOperation};
use crate::identity::SpaceId;
use crate::scope::{Scope, ScopeSpace};

/// A scope that belongs to exactly one space instance.
pub trait DistinctScope: Clone + Send + Sync {
    /// The space instance that created this scope.
    fn origin(&self) -> &SpaceId;

    /// Satisfaction, evaluated once both scopes are known to share a space.
    fn is_satisfied_by_within_space(&self, other: &Self) -> Result<bool, ScopeError>;
}

/// A space whose scopes cannot be mixed with scopes of the same type from
/// another space.
pub trait DistinctSpace: Send + Sync {
    /// The kind of scope this space produces.
    type Scope: DistinctScope;

    /// This space's identity.
    fn space_id(&self) -> &SpaceId;

    /// See [`ScopeSpace::any`].
    fn any_in_space(&self) -> Self::Scope;

    /// See [`ScopeSpace::unspecified`].
    fn unspecified_in_space(&self) -> Self::Scope;

    /// Union of two scopes already known to belong to this space.
    fn union_within_space(
        &self,
        l: &Self::Scope,
        r: &Self::Scope,
    ) -> Result<Self::Scope, ScopeError>;

    /// Intersection of two scopes already known to belong to this space.
    fn intersection_within_space(
        &self,
        l: &Self::Scope,
        r: &Self::Scope,
    ) -> Result<Self::Scope, ScopeError>;
}

/// Fail with [`ScopeError::IncompatibleSpace`] unless `found` is `expected`.
pub fn require_same_space(
    operation: SpaceOperation,
    expected: &SpaceId,
    found: &SpaceId,
) -> Result<(), ScopeError> {
    if expected == found {
        return Ok(());
    }
    tracing::warn!(
        operation = %operation,
        expected = %expected,
        found = %found,
        "refused to mix scopes from different spaces"
    );
    Err(ScopeError::IncompatibleSpace {
        operation,
        expected: expected.clone(),
        found: found.clone(),
    })
}

fn require_this_space<Sp: DistinctSpace>(
    space: &Sp,
    operation: SpaceOperation,
    l: &Sp::Scope,
    r: &Sp::Scope,
) -> Result<(), ScopeError> {
    require_same_space(operation, space.space_id(), l.origin())?;
    require_same_space(operation, space.space_id(), r.origin())
}

impl<S: DistinctScope> Scope for S {
    fn is_satisfied_by(&self, other: &Self) -> Result<bool, ScopeError> {
        require_same_space(SpaceOperation::Compare, self.origin(), other.origin())?;
        self.is_satisfied_by_within_space(other)
    }
}

impl<Sp: DistinctSpace> ScopeSpace for Sp {
    type Scope = Sp::Scope;

    fn any(&self) -> Self::Scope {
        self.any_in_space()
    }

    fn unspecified(&self) -> Self::Scope {
        self.unspecified_in_space()
    }

    fn union(&self, l: &Self::Scope, r: &Self::Scope) -> Result<Self::Scope, ScopeError> {
        require_this_space(self, SpaceOperation::Union, l, r)?;
        self.union_within_space(l, r)
    }

    fn intersection(&self, l: &Self::Scope, r: &Self::Scope) -> Result<Self::Scope, ScopeError> {
        require_this_space(self, SpaceOperation::Intersect, l, r)?;
        self.intersection_within_space(l, r)
    }
}
