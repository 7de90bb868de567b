//! Convenience constructors for the built-in space kinds.

use serde::de::DeserializeOwned;
use serde::Serialize;

use scope_core::ScopeSpace;

use crate::codec::{SerdeCodec, TokenCodec};
use crate::composite::CompositeSpace;
use crate::null::NullSpace;
use crate::supply_demand::SupplyAndDemandSpace;

/// Factory for scope spaces.
pub struct ScopeSpaces;

impl ScopeSpaces {
    /// The single-element space, for "no partitioning".
    pub fn null() -> NullSpace {
        NullSpace
    }

    /// A fresh supply-and-demand space. Every call yields a new origin.
    pub fn supply_and_demand<T>(codec: impl TokenCodec<T> + 'static) -> SupplyAndDemandSpace<T>
    where
        T: PartialEq + Send + Sync + 'static,
    {
        SupplyAndDemandSpace::new(codec)
    }

    /// A fresh supply-and-demand space encoding tokens with serde.
    pub fn serde_supply_and_demand<T>() -> SupplyAndDemandSpace<T>
    where
        T: Serialize + DeserializeOwned + PartialEq + Send + Sync + 'static,
    {
        SupplyAndDemandSpace::new(SerdeCodec::new())
    }

    /// The product of `left` and `right`.
    pub fn composite<LS, RS>(left: LS, right: RS) -> CompositeSpace<LS, RS>
    where
        LS: ScopeSpace,
        RS: ScopeSpace,
    {
        CompositeSpace::new(left, right)
    }
}
