//! Fixtures shared by the scope-selection integration tests.
//!
//! The step-binding fixture models a consumer that matches behaviour
//! bindings to requests along two dimensions: the statement type a binding
//! handles and the tags it is attached to.

use scope_algebra::{
    CompositeScope, CompositeSpace, ScopeSpace, ScopeSpaces, SupplyAndDemandScope,
    SupplyAndDemandSpace,
};
use serde::{Deserialize, Serialize};

/// Clause kinds of a behaviour-driven scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClauseType {
    Given,
    When,
    Then,
}

/// Marker type used as a statement-type token.
#[derive(Debug)]
pub struct Statement;

/// Marker type used as a second statement-type token.
#[derive(Debug)]
pub struct Query;

/// Install a fmt subscriber honouring `RUST_LOG`. Safe to call from every
/// test; only the first call takes effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Token naming the Rust type `T`.
pub fn type_token<T: ?Sized>() -> String {
    std::any::type_name::<T>().to_string()
}

/// A string-token space using serde encoding.
pub fn string_space() -> SupplyAndDemandSpace<String> {
    ScopeSpaces::serde_supply_and_demand()
}

/// Owned copies of `tags`.
pub fn tags(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

type Dimension = SupplyAndDemandSpace<String>;

/// Scope of a step binding or a step request.
pub type StepScope = CompositeScope<SupplyAndDemandScope<String>, SupplyAndDemandScope<String>>;

/// Type dimension composed with a tag dimension.
pub struct StepScopes {
    pub types: Dimension,
    pub tags: Dimension,
    pub space: CompositeSpace<Dimension, Dimension>,
}

impl StepScopes {
    pub fn new() -> Self {
        let types: Dimension = SupplyAndDemandSpace::builder()
            .label("statement-types")
            .codec(scope_algebra::SerdeCodec::new())
            .build();
        let tags: Dimension = SupplyAndDemandSpace::builder()
            .label("tags")
            .codec(scope_algebra::SerdeCodec::new())
            .build();
        let space = ScopeSpaces::composite(types.clone(), tags.clone());
        tracing::debug!(space = %space.id(), "step scopes ready");
        Self { types, tags, space }
    }

    /// A binding handling statement type `T` under `with_tags`.
    pub fn binding<T: ?Sized>(&self, with_tags: &[&str]) -> StepScope {
        self.space.combine(
            self.types.supply([type_token::<T>()]),
            self.tags.supply(tags(with_tags)),
        )
    }

    /// A request for any statement type carrying all of `with_tags`.
    pub fn request_any_type(&self, with_tags: &[&str]) -> StepScope {
        self.space
            .combine(self.types.any(), self.tags.demand(tags(with_tags)))
    }

    /// A request for statement type `T` carrying all of `with_tags`.
    pub fn request<T: ?Sized>(&self, with_tags: &[&str]) -> StepScope {
        self.space.combine(
            self.types.demand([type_token::<T>()]),
            self.tags.demand(tags(with_tags)),
        )
    }
}

impl Default for StepScopes {
    fn default() -> Self {
        Self::new()
    }
}
