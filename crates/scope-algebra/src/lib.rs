//! # scope-algebra: Concrete Scope Algebras
//!
//! Builds on the contracts in `scope-core`:
//!
//! - **Supply-and-demand** ([`supply_demand`]): token scopes that demand,
//!   supply, or both, closed under union and intersection. Each scope is
//!   its [`Memento`], evaluated directly.
//! - **Composite** ([`composite`]): the product of two spaces; satisfied
//!   only when both dimensions are.
//! - **Null** ([`null`]): one element, satisfied by itself.
//! - **Factory** ([`ScopeSpaces`]).
//!
//! ## Example
//!
//! ```
//! use scope_algebra::{Scope, ScopeSpace, ScopeSpaces};
//!
//! let tags = ScopeSpaces::serde_supply_and_demand::<String>();
//! let binding = tags.supply(["@ui".to_string(), "@login".to_string()]);
//! let wanted = tags.demand(["@login".to_string()]);
//!
//! assert!(wanted.is_satisfied_by(&binding).unwrap());
//! assert!(!tags.demand(["@billing".to_string()]).is_satisfied_by(&binding).unwrap());
//! assert!(tags.any().is_satisfied_by(&binding).unwrap());
//! ```
//!
//! ## Crate Policy
//!
//! - Libraries never install a tracing subscriber.
//! - No `.unwrap()` outside tests.

pub mod codec;
pub mod composite;
pub mod memento;
pub mod null;
pub mod spaces;
pub mod supply_demand;

pub use codec::{FnCodec, SerdeCodec, TokenCodec};
pub use composite::{CompositeScope, CompositeSpace};
pub use memento::Memento;
pub use null::{NullScope, NullSpace};
pub use spaces::ScopeSpaces;
pub use supply_demand::{
    HasCodec, NoCodec, SpaceBuilder, SupplyAndDemandScope, SupplyAndDemandSpace,
};

pub use scope_core::{
    CanonicalText, CodecError, DistinctScope, DistinctSpace, MementoSpace, Scope, ScopeError,
    ScopeSpace, SpaceId, SpaceOperation,
};
