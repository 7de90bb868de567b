//! # Supply-and-Demand Scopes
//!
//! The principal concrete algebra. Scopes are built from tokens and say
//! "I demand these", "I supply these", or both:
//!
//! | Factory | Demand met when the supplier offers | Supplies |
//! |---|---|---|
//! | `any()` | nothing (always met) | everything |
//! | `unspecified()` | nothing (always met) | nothing |
//! | `for_token(t)` | `t` | `t` |
//! | `demand([t..])` | every listed token | nothing |
//! | `supply([t..])` | never met | the listed tokens |
//! | `union(l, r)` | `l` or `r` | `l` or `r` |
//! | `intersection(l, r)` | `l` and `r` | `l` and `r` |
//!
//! Each scope holds its [`Memento`] and nothing else; satisfaction is
//! evaluated by interpreting that tree.
//!
//! ## Construction
//!
//! A space cannot exist without a token codec. The builder enforces this at
//! compile time:
//!
//! ```ignore
//! // Does not compile: no .build() on SpaceBuilder<T, NoCodec>.
//! let space = SupplyAndDemandSpace::<String>::builder().build();
//!
//! let space = SupplyAndDemandSpace::<String>::builder()
//!     .label("tags")
//!     .codec(SerdeCodec::new())
//!     .build();
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use scope_core::{
    CanonicalText, DistinctScope, DistinctSpace, MementoSpace, ScopeError, ScopeSpace, SpaceId,
};
use serde_json::Value;

use crate::codec::TokenCodec;
use crate::memento::Memento;

// ─── Space ──────────────────────────────────────────────────────────

struct SpaceShared<T> {
    id: SpaceId,
    label: Option<String>,
    codec: Arc<dyn TokenCodec<T>>,
    any: Arc<Memento<T>>,
    unspecified: Arc<Memento<T>>,
}

/// A family of token scopes sharing one origin.
///
/// Cloning the handle shares the origin; constructing a new space never
/// does, even for the same token type.
pub struct SupplyAndDemandSpace<T> {
    shared: Arc<SpaceShared<T>>,
}

impl<T> Clone for SupplyAndDemandSpace<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for SupplyAndDemandSpace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyAndDemandSpace")
            .field("id", &self.shared.id)
            .field("label", &self.shared.label)
            .finish()
    }
}

impl<T> SupplyAndDemandSpace<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// A fresh space encoding tokens with `codec`.
    pub fn new(codec: impl TokenCodec<T> + 'static) -> Self {
        Self::builder().codec(codec).build()
    }

    /// Start configuring a space. A codec must be supplied before
    /// `.build()` becomes available.
    pub fn builder() -> SpaceBuilder<T, NoCodec> {
        SpaceBuilder {
            label: None,
            codec: NoCodec,
            _token: PhantomData,
        }
    }

    fn from_parts(codec: Arc<dyn TokenCodec<T>>, label: Option<String>) -> Self {
        let id = SpaceId::new();
        tracing::debug!(
            space = %id,
            label = label.as_deref().unwrap_or("-"),
            "created supply-and-demand space"
        );
        Self {
            shared: Arc::new(SpaceShared {
                id,
                label,
                codec,
                any: Arc::new(Memento::Any),
                unspecified: Arc::new(Memento::Unspecified),
            }),
        }
    }

    /// This space's identity.
    pub fn id(&self) -> &SpaceId {
        &self.shared.id
    }

    /// The label given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.shared.label.as_deref()
    }

    fn scope(&self, memento: Memento<T>) -> SupplyAndDemandScope<T> {
        self.wrap(Arc::new(memento))
    }

    fn wrap(&self, memento: Arc<Memento<T>>) -> SupplyAndDemandScope<T> {
        SupplyAndDemandScope {
            shared: Arc::clone(&self.shared),
            memento,
        }
    }

    /// Demands and supplies exactly `token`.
    pub fn for_token(&self, token: T) -> SupplyAndDemandScope<T> {
        self.scope(Memento::ForToken(token))
    }

    /// Satisfied only by a supplier offering every one of `tokens`.
    ///
    /// An empty demand is satisfied by any supplier.
    pub fn demand(&self, tokens: impl IntoIterator<Item = T>) -> SupplyAndDemandScope<T> {
        self.scope(Memento::DemandedTokens(tokens.into_iter().collect()))
    }

    /// Offers `tokens`. As a demander it is never satisfied.
    pub fn supply(&self, tokens: impl IntoIterator<Item = T>) -> SupplyAndDemandScope<T> {
        self.scope(Memento::SupplyTokens(tokens.into_iter().collect()))
    }

    /// Rebuild a scope by replaying the factory calls recorded in
    /// `memento`.
    ///
    /// # Errors
    ///
    /// [`ScopeError::Codec`] when a token does not decode with this space's
    /// codec.
    pub fn from_memento(
        &self,
        memento: &Memento<Value>,
    ) -> Result<SupplyAndDemandScope<T>, ScopeError> {
        tracing::trace!(space = %self.shared.id, node = memento.kind(), "replaying memento");
        let codec = &self.shared.codec;
        match memento {
            Memento::Any => Ok(self.any_in_space()),
            Memento::Unspecified => Ok(self.unspecified_in_space()),
            Memento::ForToken(encoded) => Ok(self.for_token(codec.decode(encoded)?)),
            Memento::DemandedTokens(encoded) => Ok(self.demand(self.decode_all(encoded)?)),
            Memento::SupplyTokens(encoded) => Ok(self.supply(self.decode_all(encoded)?)),
            Memento::Union(l, r) => {
                let (l, r) = (self.from_memento(l)?, self.from_memento(r)?);
                self.union(&l, &r)
            }
            Memento::Intersection(l, r) => {
                let (l, r) = (self.from_memento(l)?, self.from_memento(r)?);
                self.intersection(&l, &r)
            }
        }
    }

    /// Parse memento text, then replay it.
    pub fn from_memento_text(&self, text: &str) -> Result<SupplyAndDemandScope<T>, ScopeError> {
        self.from_memento(&Memento::from_text(text)?)
    }

    fn decode_all(&self, encoded: &[Value]) -> Result<Vec<T>, ScopeError> {
        encoded
            .iter()
            .map(|value| self.shared.codec.decode(value).map_err(ScopeError::from))
            .collect()
    }
}

impl<T> DistinctSpace for SupplyAndDemandSpace<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    type Scope = SupplyAndDemandScope<T>;

    fn space_id(&self) -> &SpaceId {
        &self.shared.id
    }

    fn any_in_space(&self) -> SupplyAndDemandScope<T> {
        self.wrap(Arc::clone(&self.shared.any))
    }

    fn unspecified_in_space(&self) -> SupplyAndDemandScope<T> {
        self.wrap(Arc::clone(&self.shared.unspecified))
    }

    fn union_within_space(
        &self,
        l: &SupplyAndDemandScope<T>,
        r: &SupplyAndDemandScope<T>,
    ) -> Result<SupplyAndDemandScope<T>, ScopeError> {
        Ok(self.scope(Memento::Union(
            Arc::clone(&l.memento),
            Arc::clone(&r.memento),
        )))
    }

    fn intersection_within_space(
        &self,
        l: &SupplyAndDemandScope<T>,
        r: &SupplyAndDemandScope<T>,
    ) -> Result<SupplyAndDemandScope<T>, ScopeError> {
        Ok(self.scope(Memento::Intersection(
            Arc::clone(&l.memento),
            Arc::clone(&r.memento),
        )))
    }
}

impl<T> MementoSpace for SupplyAndDemandSpace<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    fn memento_of(&self, scope: &SupplyAndDemandScope<T>) -> Result<Value, ScopeError> {
        Ok(scope.memento()?.to_json())
    }

    fn scope_from_memento(&self, memento: &Value) -> Result<SupplyAndDemandScope<T>, ScopeError> {
        self.from_memento(&Memento::from_json(memento)?)
    }
}

// ─── Builder ────────────────────────────────────────────────────────

/// Marker: no codec chosen yet.
#[derive(Debug)]
pub struct NoCodec;

/// Marker: codec chosen; the builder can produce a space.
pub struct HasCodec<T>(Arc<dyn TokenCodec<T>>);

/// Typestate builder for [`SupplyAndDemandSpace`].
///
/// Only `SpaceBuilder<T, HasCodec<T>>` has a `.build()` method.
pub struct SpaceBuilder<T, C> {
    label: Option<String>,
    codec: C,
    _token: PhantomData<fn() -> T>,
}

impl<T> SpaceBuilder<T, NoCodec>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// Choose how tokens are encoded in mementos.
    pub fn codec(self, codec: impl TokenCodec<T> + 'static) -> SpaceBuilder<T, HasCodec<T>> {
        SpaceBuilder {
            label: self.label,
            codec: HasCodec(Arc::new(codec)),
            _token: PhantomData,
        }
    }
}

impl<T> SpaceBuilder<T, HasCodec<T>>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// Create the space, drawing a fresh origin.
    pub fn build(self) -> SupplyAndDemandSpace<T> {
        SupplyAndDemandSpace::from_parts(self.codec.0, self.label)
    }
}

impl<T, C> SpaceBuilder<T, C> {
    /// Name the space in logs and `Debug` output.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ─── Scope ──────────────────────────────────────────────────────────

/// An immutable token scope bound to the space that built it.
pub struct SupplyAndDemandScope<T> {
    shared: Arc<SpaceShared<T>>,
    memento: Arc<Memento<T>>,
}

impl<T> Clone for SupplyAndDemandScope<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            memento: Arc::clone(&self.memento),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SupplyAndDemandScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyAndDemandScope")
            .field("origin", &self.shared.id)
            .field("structure", &self.memento)
            .finish()
    }
}

/// Same origin and equivalent memento. Token order and repeats within a
/// `demand` or `supply` list do not matter; operand order of `union` and
/// `intersection` does.
impl<T: PartialEq> PartialEq for SupplyAndDemandScope<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.shared.id != other.shared.id {
            return false;
        }
        if Arc::ptr_eq(&self.memento, &other.memento) || self.memento == other.memento {
            return true;
        }
        match (self.memento(), other.memento()) {
            (Ok(l), Ok(r)) => l == r,
            _ => false,
        }
    }
}

impl<T> SupplyAndDemandScope<T> {
    /// The token-level structure this scope evaluates.
    pub fn structure(&self) -> &Memento<T> {
        &self.memento
    }

    /// The encoded memento, tokens passed through the space's codec.
    pub fn memento(&self) -> Result<Memento<Value>, ScopeError> {
        self.memento.encode(self.shared.codec.as_ref())
    }

    /// Canonical text of [`Self::memento`].
    pub fn memento_text(&self) -> Result<CanonicalText, ScopeError> {
        self.memento()?.canonical_text()
    }
}

impl<T: PartialEq> SupplyAndDemandScope<T> {
    /// Whether this scope offers `token`.
    pub fn supplies(&self, token: &T) -> bool {
        self.memento.supplies(token)
    }
}

impl<T> DistinctScope for SupplyAndDemandScope<T>
where
    T: PartialEq + Send + Sync,
{
    fn origin(&self) -> &SpaceId {
        &self.shared.id
    }

    fn is_satisfied_by_within_space(&self, other: &Self) -> Result<bool, ScopeError> {
        Ok(self.memento.is_satisfied_by(&other.memento))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FnCodec, SerdeCodec};
    use scope_core::{CodecError, Scope, SpaceOperation};
    use serde_json::json;

    fn strings() -> SupplyAndDemandSpace<String> {
        SupplyAndDemandSpace::new(SerdeCodec::new())
    }

    fn s(token: &str) -> String {
        token.to_string()
    }

    fn satisfied(
        demander: &SupplyAndDemandScope<String>,
        supplier: &SupplyAndDemandScope<String>,
    ) -> bool {
        demander.is_satisfied_by(supplier).unwrap()
    }

    // ── Behaviour ───────────────────────────────────────────────────

    #[test]
    fn demand_is_satisfied_by_matching_supply() {
        let space = strings();
        assert!(satisfied(&space.demand([s("a")]), &space.supply([s("a")])));
        assert!(!satisfied(&space.demand([s("a")]), &space.supply([s("b")])));
    }

    #[test]
    fn demand_needs_every_token() {
        let space = strings();
        let demand = space.demand([s("a"), s("b")]);
        assert!(!satisfied(&demand, &space.supply([s("a")])));
        assert!(satisfied(&demand, &space.supply([s("b"), s("a"), s("c")])));
    }

    #[test]
    fn empty_demand_is_satisfied_by_anything() {
        let space = strings();
        let demand = space.demand(Vec::<String>::new());
        assert!(satisfied(&demand, &space.unspecified()));
        assert!(satisfied(&demand, &space.supply([s("x")])));
        assert!(satisfied(&demand, &space.demand([s("x")])));
    }

    #[test]
    fn supply_is_never_satisfied() {
        let space = strings();
        let supply = space.supply([s("a")]);
        assert!(!satisfied(&supply, &space.any()));
        assert!(!satisfied(&supply, &supply));
    }

    #[test]
    fn for_token_matches_only_itself() {
        let space = strings();
        let point = space.for_token(s("a"));
        assert!(satisfied(&point, &space.for_token(s("a"))));
        assert!(satisfied(&point, &space.supply([s("a")])));
        assert!(!satisfied(&point, &space.for_token(s("b"))));
        assert!(satisfied(&space.demand([s("a")]), &point));
    }

    #[test]
    fn any_is_satisfied_by_everything() {
        let space = strings();
        let any = space.any();
        for other in [
            space.any(),
            space.unspecified(),
            space.demand([s("a")]),
            space.supply([s("a")]),
            space.for_token(s("a")),
        ] {
            assert!(satisfied(&any, &other));
        }
    }

    #[test]
    fn unspecified_is_satisfied_by_everything_but_supplies_nothing() {
        let space = strings();
        let unspecified = space.unspecified();
        assert!(satisfied(&unspecified, &space.supply([s("a")])));
        assert!(satisfied(&unspecified, &space.unspecified()));
        assert!(!satisfied(&space.demand([s("a")]), &unspecified));
        assert!(!unspecified.supplies(&s("a")));
        assert!(space.any().supplies(&s("a")));
    }

    #[test]
    fn union_of_demands_needs_either() {
        let space = strings();
        let union = space
            .union(&space.demand([s("t1")]), &space.demand([s("t2")]))
            .unwrap();
        assert!(satisfied(&union, &space.supply([s("t1")])));
        assert!(satisfied(&union, &space.supply([s("t2")])));
        assert!(!satisfied(&union, &space.supply([s("t3")])));
    }

    #[test]
    fn intersection_of_demands_needs_both() {
        let space = strings();
        let both = space
            .intersection(&space.demand([s("t1")]), &space.demand([s("t2")]))
            .unwrap();
        assert!(!satisfied(&both, &space.supply([s("t1")])));
        let supply = space
            .union(&space.supply([s("t1")]), &space.supply([s("t2")]))
            .unwrap();
        assert!(satisfied(&both, &supply));
    }

    #[test]
    fn supplies_are_combined_pointwise() {
        let space = strings();
        let ab = space.supply([s("a"), s("b")]);
        let bc = space.supply([s("b"), s("c")]);
        let union = space.union(&ab, &bc).unwrap();
        let intersection = space.intersection(&ab, &bc).unwrap();
        assert!(union.supplies(&s("a")) && union.supplies(&s("c")));
        assert!(!intersection.supplies(&s("a")));
        assert!(intersection.supplies(&s("b")));
    }

    // ── Identity ────────────────────────────────────────────────────

    #[test]
    fn any_and_unspecified_are_shared_singletons() {
        let space = strings();
        assert!(Arc::ptr_eq(&space.any().memento, &space.any().memento));
        assert!(Arc::ptr_eq(
            &space.unspecified().memento,
            &space.unspecified().memento
        ));
    }

    #[test]
    fn every_space_has_its_own_origin() {
        let space1 = strings();
        let space2 = strings();
        assert_ne!(space1.id(), space2.id());
        assert_eq!(space1.clone().id(), space1.id());
    }

    #[test]
    fn cannot_mix_spaces() {
        let space1 = strings();
        let space2 = strings();
        let err = space1
            .demand([s("a")])
            .is_satisfied_by(&space2.supply([s("a")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ScopeError::IncompatibleSpace {
                operation: SpaceOperation::Compare,
                ..
            }
        ));
        assert!(space1.union(&space1.any(), &space2.any()).is_err());
        assert!(space2.intersection(&space1.any(), &space2.any()).is_err());
    }

    #[test]
    fn equality_means_same_origin_and_structure() {
        let space1 = strings();
        let space2 = strings();
        assert_eq!(space1.demand([s("a")]), space1.demand([s("a")]));
        assert_ne!(space1.demand([s("a")]), space1.supply([s("a")]));
        assert_ne!(space1.demand([s("a")]), space2.demand([s("a")]));
    }

    #[test]
    fn equality_ignores_token_order_within_lists() {
        let space = strings();
        assert_eq!(space.demand([s("b"), s("a")]), space.demand([s("a"), s("b"), s("a")]));
        assert_eq!(space.supply([s("z"), s("y")]), space.supply([s("y"), s("z")]));
        assert_ne!(space.demand([s("a"), s("b")]), space.demand([s("a")]));

        let a = space.demand([s("a")]);
        let b = space.supply([s("b")]);
        assert_ne!(space.union(&a, &b).unwrap(), space.union(&b, &a).unwrap());
    }

    #[test]
    fn restored_multi_token_scope_equals_original() {
        let space = strings();
        let original = space
            .union(&space.demand([s("b"), s("a")]), &space.supply([s("d"), s("c")]))
            .unwrap();
        let restored = space.from_memento(&original.memento().unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn builder_infers_token_type_from_codec() {
        let space = SupplyAndDemandSpace::builder()
            .codec(SerdeCodec::<u16>::new())
            .build();
        assert!(space.demand([1]).is_satisfied_by(&space.supply([1, 2])).unwrap());
    }

    #[test]
    fn deeply_folded_union_round_trips() {
        let space = strings();
        let mut folded = space.supply([s("t0")]);
        for n in 1..150 {
            folded = space.union(&folded, &space.supply([format!("t{n}")])).unwrap();
        }
        let text = folded.memento_text().unwrap();

        let restored = space.from_memento_text(text.as_str()).unwrap();

        assert_eq!(restored.memento_text().unwrap(), text);
        assert!(space
            .demand([s("t0"), s("t149")])
            .is_satisfied_by(&restored)
            .unwrap());
    }

    #[test]
    fn builder_sets_label() {
        let space = SupplyAndDemandSpace::<String>::builder()
            .label("tags")
            .codec(SerdeCodec::new())
            .build();
        assert_eq!(space.label(), Some("tags"));
        assert!(format!("{space:?}").contains("tags"));
        assert_eq!(strings().label(), None);
    }

    // ── Mementos ────────────────────────────────────────────────────

    #[test]
    fn memento_text_for_each_factory() {
        let space = strings();
        let cases = [
            (space.any(), r#"{"IsAny":true}"#),
            (space.unspecified(), r#"{}"#),
            (space.for_token(s("a")), r#"{"ForToken":"a"}"#),
            (space.demand([s("b"), s("a")]), r#"{"DemandedTokens":["a","b"]}"#),
            (space.supply([s("a"), s("a")]), r#"{"SupplyTokens":["a"]}"#),
        ];
        for (scope, expected) in cases {
            assert_eq!(scope.memento_text().unwrap().as_str(), expected);
        }
    }

    #[test]
    fn memento_round_trip_rebuilds_equivalent_scope() {
        let space = strings();
        let scope = space
            .intersection(
                &space.union(&space.demand([s("a")]), &space.for_token(s("b"))).unwrap(),
                &space.supply([s("c")]),
            )
            .unwrap();
        let text = scope.memento_text().unwrap();
        let restored = space.from_memento_text(text.as_str()).unwrap();
        assert_eq!(restored.memento_text().unwrap(), text);
        assert_eq!(restored, scope);
    }

    #[test]
    fn restored_any_is_the_singleton() {
        let space = strings();
        let restored = space.from_memento(&Memento::Any).unwrap();
        assert!(Arc::ptr_eq(&restored.memento, &space.any().memento));
        let restored = space.from_memento(&Memento::Unspecified).unwrap();
        assert!(Arc::ptr_eq(&restored.memento, &space.unspecified().memento));
    }

    #[test]
    fn memento_space_uses_json_trees() {
        let space = strings();
        let value = space.memento_of(&space.for_token(s("x"))).unwrap();
        assert_eq!(value, json!({"ForToken": "x"}));
        let restored = space.scope_from_memento(&value).unwrap();
        assert_eq!(restored, space.for_token(s("x")));
    }

    #[test]
    fn undecodable_token_is_a_codec_error() {
        let space = strings();
        let err = space.from_memento_text(r#"{"ForToken":42}"#).unwrap_err();
        assert!(matches!(err, ScopeError::Codec(CodecError::Decode(_))));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let space = strings();
        let err = space
            .from_memento_text(r#"{"SupplyTokens":["a"],"DemandedTokens":["a"]}"#)
            .unwrap_err();
        assert!(matches!(err, ScopeError::MalformedMemento(_)));
    }

    #[test]
    fn custom_codec_shapes_the_memento() {
        let space = SupplyAndDemandSpace::new(FnCodec::new(
            |n: &u32| json!(format!("n{n}")),
            |v: &Value| {
                v.as_str()
                    .and_then(|s| s.strip_prefix('n'))
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| CodecError::Decode(v.to_string()))
            },
        ));
        let scope = space.demand([7, 3]);
        assert_eq!(
            scope.memento_text().unwrap().as_str(),
            r#"{"DemandedTokens":["n3","n7"]}"#
        );
        let restored = space.from_memento(&scope.memento().unwrap()).unwrap();
        assert!(restored.is_satisfied_by(&space.supply([3, 7])).unwrap());
    }
}
