//! # Null Scope
//!
//! A scope kind with a single element, for callers that want no
//! partitioning at all. Every null scope satisfies every other, and the set
//! operations return the same element. There is no identity to violate.

use scope_core::{MementoSpace, Scope, ScopeError, ScopeSpace};
use serde_json::{Map, Value};

/// The only null scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NullScope;

impl Scope for NullScope {
    fn is_satisfied_by(&self, _other: &Self) -> Result<bool, ScopeError> {
        Ok(true)
    }
}

/// The space of [`NullScope`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpace;

impl ScopeSpace for NullSpace {
    type Scope = NullScope;

    fn any(&self) -> NullScope {
        NullScope
    }

    fn unspecified(&self) -> NullScope {
        NullScope
    }

    fn union(&self, _l: &NullScope, _r: &NullScope) -> Result<NullScope, ScopeError> {
        Ok(NullScope)
    }

    fn intersection(&self, _l: &NullScope, _r: &NullScope) -> Result<NullScope, ScopeError> {
        Ok(NullScope)
    }
}

impl MementoSpace for NullSpace {
    fn memento_of(&self, _scope: &NullScope) -> Result<Value, ScopeError> {
        Ok(Value::Object(Map::new()))
    }

    fn scope_from_memento(&self, memento: &Value) -> Result<NullScope, ScopeError> {
        match memento {
            Value::Object(node) if node.is_empty() => Ok(NullScope),
            other => {
                let detail = format!("null memento must be an empty object, found {other}");
                tracing::warn!(%detail, "rejected malformed memento");
                Err(ScopeError::MalformedMemento(detail))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn everything_is_satisfied() {
        let space = NullSpace;
        assert!(space.any().is_satisfied_by(&space.unspecified()).unwrap());
        assert!(space.unspecified().is_satisfied_by(&space.any()).unwrap());
    }

    #[test]
    fn set_operations_return_the_single_element() {
        let space = NullSpace;
        assert_eq!(space.union(&NullScope, &NullScope).unwrap(), NullScope);
        assert_eq!(space.intersection(&NullScope, &NullScope).unwrap(), NullScope);
    }

    #[test]
    fn memento_is_an_empty_object() {
        let space = NullSpace;
        assert_eq!(space.memento_of(&NullScope).unwrap(), json!({}));
        assert_eq!(space.scope_from_memento(&json!({})).unwrap(), NullScope);
        assert!(matches!(
            space.scope_from_memento(&json!({"IsAny": true})),
            Err(ScopeError::MalformedMemento(_))
        ));
    }
}
