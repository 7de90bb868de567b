//! # Composite Scopes
//!
//! A product of two scope spaces. A composite scope pairs a scope from the
//! left space with one from the right space and is satisfied only when
//! both dimensions are satisfied independently.
//!
//! ```text
//! CompositeSpace<LS, RS>
//!   ├── any()            (LS::any, RS::any)
//!   ├── unspecified()    (LS::unspecified, RS::unspecified)
//!   ├── union(a, b)      (LS::union(a.l, b.l), RS::union(a.r, b.r))
//!   └── intersection     likewise, per dimension
//! ```
//!
//! The composite has its own origin and refuses pairs built by another
//! composite space. Each dimension space enforces its own rules on top of
//! that. Dimensions may themselves be composites.

use std::sync::Arc;

use scope_core::{
    DistinctScope, DistinctSpace, MementoSpace, Scope, ScopeError, ScopeSpace, SpaceId,
};
use serde_json::{Map, Value};

const LEFT: &str = "Left";
const RIGHT: &str = "Right";

/// A pair of scopes, one per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScope<L, R> {
    origin: SpaceId,
    left: L,
    right: R,
}

impl<L, R> CompositeScope<L, R> {
    /// The left dimension.
    pub fn left(&self) -> &L {
        &self.left
    }

    /// The right dimension.
    pub fn right(&self) -> &R {
        &self.right
    }
}

impl<L: Scope, R: Scope> DistinctScope for CompositeScope<L, R> {
    fn origin(&self) -> &SpaceId {
        &self.origin
    }

    fn is_satisfied_by_within_space(&self, other: &Self) -> Result<bool, ScopeError> {
        let left = self.left.is_satisfied_by(&other.left)?;
        let right = self.right.is_satisfied_by(&other.right)?;
        Ok(left && right)
    }
}

struct CompositeInner<LS: ScopeSpace, RS: ScopeSpace> {
    id: SpaceId,
    left: LS,
    right: RS,
    any: CompositeScope<LS::Scope, RS::Scope>,
    unspecified: CompositeScope<LS::Scope, RS::Scope>,
}

/// The product of two scope spaces.
pub struct CompositeSpace<LS: ScopeSpace, RS: ScopeSpace> {
    inner: Arc<CompositeInner<LS, RS>>,
}

impl<LS: ScopeSpace, RS: ScopeSpace> Clone for CompositeSpace<LS, RS> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<LS: ScopeSpace, RS: ScopeSpace> std::fmt::Debug for CompositeSpace<LS, RS> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeSpace")
            .field("id", &self.inner.id)
            .finish_non_exhaustive()
    }
}

impl<LS: ScopeSpace, RS: ScopeSpace> CompositeSpace<LS, RS> {
    /// Combine `left` and `right` into a fresh product space.
    pub fn new(left: LS, right: RS) -> Self {
        let id = SpaceId::new();
        tracing::debug!(
            space = %id,
            left = std::any::type_name::<LS>(),
            right = std::any::type_name::<RS>(),
            "created composite space"
        );
        let any = CompositeScope {
            origin: id.clone(),
            left: left.any(),
            right: right.any(),
        };
        let unspecified = CompositeScope {
            origin: id.clone(),
            left: left.unspecified(),
            right: right.unspecified(),
        };
        Self {
            inner: Arc::new(CompositeInner {
                id,
                left,
                right,
                any,
                unspecified,
            }),
        }
    }

    /// Pair a left scope with a right scope.
    pub fn combine(
        &self,
        left: LS::Scope,
        right: RS::Scope,
    ) -> CompositeScope<LS::Scope, RS::Scope> {
        CompositeScope {
            origin: self.inner.id.clone(),
            left,
            right,
        }
    }

    /// This space's identity.
    pub fn id(&self) -> &SpaceId {
        &self.inner.id
    }

    /// The left dimension space.
    pub fn left_space(&self) -> &LS {
        &self.inner.left
    }

    /// The right dimension space.
    pub fn right_space(&self) -> &RS {
        &self.inner.right
    }
}

impl<LS: ScopeSpace, RS: ScopeSpace> DistinctSpace for CompositeSpace<LS, RS> {
    type Scope = CompositeScope<LS::Scope, RS::Scope>;

    fn space_id(&self) -> &SpaceId {
        &self.inner.id
    }

    fn any_in_space(&self) -> Self::Scope {
        self.inner.any.clone()
    }

    fn unspecified_in_space(&self) -> Self::Scope {
        self.inner.unspecified.clone()
    }

    fn union_within_space(
        &self,
        l: &Self::Scope,
        r: &Self::Scope,
    ) -> Result<Self::Scope, ScopeError> {
        let left = self.inner.left.union(&l.left, &r.left)?;
        let right = self.inner.right.union(&l.right, &r.right)?;
        Ok(self.combine(left, right))
    }

    fn intersection_within_space(
        &self,
        l: &Self::Scope,
        r: &Self::Scope,
    ) -> Result<Self::Scope, ScopeError> {
        let left = self.inner.left.intersection(&l.left, &r.left)?;
        let right = self.inner.right.intersection(&l.right, &r.right)?;
        Ok(self.combine(left, right))
    }
}

impl<LS: MementoSpace, RS: MementoSpace> MementoSpace for CompositeSpace<LS, RS> {
    fn memento_of(&self, scope: &Self::Scope) -> Result<Value, ScopeError> {
        let mut node = Map::new();
        node.insert(LEFT.to_string(), self.inner.left.memento_of(&scope.left)?);
        node.insert(RIGHT.to_string(), self.inner.right.memento_of(&scope.right)?);
        Ok(Value::Object(node))
    }

    fn scope_from_memento(&self, memento: &Value) -> Result<Self::Scope, ScopeError> {
        let pair = match memento {
            Value::Object(node) if node.len() == 2 => node.get(LEFT).zip(node.get(RIGHT)),
            _ => None,
        };
        let Some((left, right)) = pair else {
            let detail = format!("composite memento must hold exactly `{LEFT}` and `{RIGHT}`");
            tracing::warn!(space = %self.inner.id, %detail, "rejected malformed memento");
            return Err(ScopeError::MalformedMemento(detail));
        };
        tracing::trace!(space = %self.inner.id, "replaying composite memento");
        Ok(self.combine(
            self.inner.left.scope_from_memento(left)?,
            self.inner.right.scope_from_memento(right)?,
        ))
    }
}
