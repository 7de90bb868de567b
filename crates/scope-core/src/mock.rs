//! # Mock Scopes
//!
//! Scripted, label-based scope doubles for exercising combinators such as
//! the composite space without depending on a real token algebra.
//!
//! - `MockScope::satisfied_by` lists the labels that satisfy the scope.
//! - `MockSpace` answers unions and intersections from scripted tables.
//!   Unscripted pairs produce a synthesised `(l|r)` / `(l&r)` label with
//!   no satisfiers, so a forgotten script shows up as a failed assertion
//!   rather than a panic.
//!
//! Mock scopes are not distinct: they carry no origin and never raise the
//! incompatible-space error.

use std::collections::{BTreeSet, HashMap};

use crate::error::ScopeError;
use crate::scope::{Scope, ScopeSpace};

/// A scope identified by a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockScope {
    /// Identity of this scope.
    pub label: String,
    /// Labels of the scopes that satisfy this one.
    pub satisfied_by: BTreeSet<String>,
}

impl MockScope {
    /// A scope satisfied by nothing.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            satisfied_by: BTreeSet::new(),
        }
    }

    /// Add `other` to the scopes that satisfy this one.
    pub fn satisfied_by(mut self, other: &MockScope) -> Self {
        self.satisfied_by.insert(other.label.clone());
        self
    }
}

impl Scope for MockScope {
    fn is_satisfied_by(&self, other: &Self) -> Result<bool, ScopeError> {
        Ok(self.satisfied_by.contains(&other.label))
    }
}

/// A space of [`MockScope`]s with scripted set operations.
#[derive(Debug, Clone)]
pub struct MockSpace {
    any: MockScope,
    unspecified: MockScope,
    unions: HashMap<(String, String), MockScope>,
    intersections: HashMap<(String, String), MockScope>,
}

impl MockSpace {
    /// A space whose distinguished elements are labelled `prefix:any` and
    /// `prefix:unspecified`.
    pub fn new(prefix: &str) -> Self {
        Self {
            any: MockScope::new(format!("{prefix}:any")),
            unspecified: MockScope::new(format!("{prefix}:unspecified")),
            unions: HashMap::new(),
            intersections: HashMap::new(),
        }
    }

    /// Script `union(l, r)` to return `result`.
    pub fn script_union(&mut self, l: &MockScope, r: &MockScope, result: MockScope) {
        self.unions
            .insert((l.label.clone(), r.label.clone()), result);
    }

    /// Script `intersection(l, r)` to return `result`.
    pub fn script_intersection(&mut self, l: &MockScope, r: &MockScope, result: MockScope) {
        self.intersections
            .insert((l.label.clone(), r.label.clone()), result);
    }
}

impl ScopeSpace for MockSpace {
    type Scope = MockScope;

    fn any(&self) -> MockScope {
        self.any.clone()
    }

    fn unspecified(&self) -> MockScope {
        self.unspecified.clone()
    }

    fn union(&self, l: &MockScope, r: &MockScope) -> Result<MockScope, ScopeError> {
        Ok(self
            .unions
            .get(&(l.label.clone(), r.label.clone()))
            .cloned()
            .unwrap_or_else(|| MockScope::new(format!("({}|{})", l.label, r.label))))
    }

    fn intersection(&self, l: &MockScope, r: &MockScope) -> Result<MockScope, ScopeError> {
        Ok(self
            .intersections
            .get(&(l.label.clone(), r.label.clone()))
            .cloned()
            .unwrap_or_else(|| MockScope::new(format!("({}&{})", l.label, r.label))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfaction_is_scripted() {
        let supplier = MockScope::new("s");
        let demander = MockScope::new("d").satisfied_by(&supplier);
        assert!(demander.is_satisfied_by(&supplier).unwrap());
        assert!(!supplier.is_satisfied_by(&demander).unwrap());
    }

    #[test]
    fn scripted_union_wins_over_fallback() {
        let mut space = MockSpace::new("m");
        let l = MockScope::new("l");
        let r = MockScope::new("r");
        space.script_union(&l, &r, MockScope::new("lr"));

        assert_eq!(space.union(&l, &r).unwrap().label, "lr");
        assert_eq!(space.union(&r, &l).unwrap().label, "(r|l)");
        assert_eq!(space.intersection(&l, &r).unwrap().label, "(l&r)");
    }

    #[test]
    fn distinguished_elements_are_labelled() {
        let space = MockSpace::new("dim");
        assert_eq!(space.any().label, "dim:any");
        assert_eq!(space.unspecified().label, "dim:unspecified");
    }
}
