//! # Supply-and-Demand Memento
//!
//! A memento is the tagged structural record of how a supply-and-demand
//! scope was built. It is also the scope's only representation: satisfaction
//! is computed by interpreting the tree, so there is no second, live
//! predicate that could drift away from what gets serialized.
//!
//! ## Node Shapes
//!
//! | Node | Supplies `t` | Demand met by supply test `s` |
//! |---|---|---|
//! | `Any` | always | always |
//! | `Unspecified` | never | always |
//! | `ForToken(x)` | `t == x` | `s(x)` |
//! | `DemandedTokens(xs)` | never | `∀ x ∈ xs. s(x)` |
//! | `SupplyTokens(xs)` | `t ∈ xs` | never |
//! | `Union(l, r)` | `l ∨ r` | `l ∨ r` |
//! | `Intersection(l, r)` | `l ∧ r` | `l ∧ r` |
//!
//! ## Encoded Form
//!
//! `Memento<Value>` holds encoded tokens and renders as a JSON object with
//! at most one populated field:
//!
//! ```text
//! {"IsAny":true}
//! {}                                   Unspecified
//! {"ForToken":t}
//! {"DemandedTokens":[t, ...]}
//! {"SupplyTokens":[t, ...]}
//! {"Union":{"L":node,"R":node}}
//! {"Intersection":{"L":node,"R":node}}
//! ```
//!
//! Token lists are sorted by canonical text and deduplicated on encoding,
//! so set-equal demands or supplies render identically.

use std::sync::Arc;

use scope_core::{CanonicalText, ScopeError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::codec::TokenCodec;

const IS_ANY: &str = "IsAny";
const FOR_TOKEN: &str = "ForToken";
const DEMANDED_TOKENS: &str = "DemandedTokens";
const SUPPLY_TOKENS: &str = "SupplyTokens";
const UNION: &str = "Union";
const INTERSECTION: &str = "Intersection";
const LEFT: &str = "L";
const RIGHT: &str = "R";

/// Structural record of a supply-and-demand scope over tokens `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Memento<T> {
    /// Demands nothing, supplies everything.
    Any,
    /// Demands nothing, supplies nothing.
    Unspecified,
    /// Demands and supplies exactly one token.
    ForToken(T),
    /// Demands every listed token, supplies nothing.
    DemandedTokens(Vec<T>),
    /// Supplies the listed tokens, never satisfied as a demander.
    SupplyTokens(Vec<T>),
    /// Pointwise disjunction.
    Union(Arc<Memento<T>>, Arc<Memento<T>>),
    /// Pointwise conjunction.
    Intersection(Arc<Memento<T>>, Arc<Memento<T>>),
}

impl<T> Memento<T> {
    /// Short name of the root node, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unspecified => "unspecified",
            Self::ForToken(_) => "for_token",
            Self::DemandedTokens(_) => "demanded_tokens",
            Self::SupplyTokens(_) => "supply_tokens",
            Self::Union(..) => "union",
            Self::Intersection(..) => "intersection",
        }
    }

    /// Rebuild the tree with every token passed through `f`.
    pub fn try_map_tokens<U, E, F>(&self, f: &mut F) -> Result<Memento<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        Ok(match self {
            Self::Any => Memento::Any,
            Self::Unspecified => Memento::Unspecified,
            Self::ForToken(token) => Memento::ForToken(f(token)?),
            Self::DemandedTokens(tokens) => {
                Memento::DemandedTokens(tokens.iter().map(&mut *f).collect::<Result<_, _>>()?)
            }
            Self::SupplyTokens(tokens) => {
                Memento::SupplyTokens(tokens.iter().map(&mut *f).collect::<Result<_, _>>()?)
            }
            Self::Union(l, r) => {
                Memento::Union(Arc::new(l.try_map_tokens(f)?), Arc::new(r.try_map_tokens(f)?))
            }
            Self::Intersection(l, r) => Memento::Intersection(
                Arc::new(l.try_map_tokens(f)?),
                Arc::new(r.try_map_tokens(f)?),
            ),
        })
    }

    /// Encode every token with `codec`, normalizing token lists.
    pub fn encode(&self, codec: &dyn TokenCodec<T>) -> Result<Memento<Value>, ScopeError> {
        Ok(match self {
            Self::Any => Memento::Any,
            Self::Unspecified => Memento::Unspecified,
            Self::ForToken(token) => Memento::ForToken(codec.encode(token)?),
            Self::DemandedTokens(tokens) => {
                Memento::DemandedTokens(encode_token_list(tokens, codec)?)
            }
            Self::SupplyTokens(tokens) => Memento::SupplyTokens(encode_token_list(tokens, codec)?),
            Self::Union(l, r) => {
                Memento::Union(Arc::new(l.encode(codec)?), Arc::new(r.encode(codec)?))
            }
            Self::Intersection(l, r) => {
                Memento::Intersection(Arc::new(l.encode(codec)?), Arc::new(r.encode(codec)?))
            }
        })
    }
}

impl<T: PartialEq> Memento<T> {
    /// Whether this scope offers `token`.
    pub fn supplies(&self, token: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Unspecified => false,
            Self::ForToken(own) => own == token,
            Self::DemandedTokens(_) => false,
            Self::SupplyTokens(tokens) => tokens.contains(token),
            Self::Union(l, r) => l.supplies(token) || r.supplies(token),
            Self::Intersection(l, r) => l.supplies(token) && r.supplies(token),
        }
    }

    /// Whether this scope's demand is met by a supplier described by
    /// `supply_test`.
    pub fn demand_met_by<F>(&self, supply_test: &F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        match self {
            Self::Any | Self::Unspecified => true,
            Self::ForToken(token) => supply_test(token),
            Self::DemandedTokens(tokens) => tokens.iter().all(supply_test),
            Self::SupplyTokens(_) => false,
            Self::Union(l, r) => l.demand_met_by(supply_test) || r.demand_met_by(supply_test),
            Self::Intersection(l, r) => {
                l.demand_met_by(supply_test) && r.demand_met_by(supply_test)
            }
        }
    }

    /// `self` as demander, `other` as supplier.
    pub fn is_satisfied_by(&self, other: &Memento<T>) -> bool {
        self.demand_met_by(&|token: &T| other.supplies(token))
    }
}

impl Memento<Value> {
    /// Render as a JSON object tree.
    pub fn to_json(&self) -> Value {
        let mut node = Map::new();
        match self {
            Self::Any => {
                node.insert(IS_ANY.to_string(), Value::Bool(true));
            }
            Self::Unspecified => {}
            Self::ForToken(token) => {
                node.insert(FOR_TOKEN.to_string(), token.clone());
            }
            Self::DemandedTokens(tokens) => {
                node.insert(DEMANDED_TOKENS.to_string(), Value::Array(tokens.clone()));
            }
            Self::SupplyTokens(tokens) => {
                node.insert(SUPPLY_TOKENS.to_string(), Value::Array(tokens.clone()));
            }
            Self::Union(l, r) => {
                node.insert(UNION.to_string(), pair_to_json(l, r));
            }
            Self::Intersection(l, r) => {
                node.insert(INTERSECTION.to_string(), pair_to_json(l, r));
            }
        }
        Value::Object(node)
    }

    /// Parse a JSON object tree.
    ///
    /// # Errors
    ///
    /// [`ScopeError::MalformedMemento`] when the tree matches none of the
    /// node shapes, including when more than one field is populated.
    pub fn from_json(value: &Value) -> Result<Self, ScopeError> {
        let Value::Object(node) = value else {
            return Err(malformed(format!("expected an object node, found {value}")));
        };

        if let Some(unknown) = node.keys().find(|key| {
            ![IS_ANY, FOR_TOKEN, DEMANDED_TOKENS, SUPPLY_TOKENS, UNION, INTERSECTION]
                .contains(&key.as_str())
        }) {
            return Err(malformed(format!("unrecognized field `{unknown}`")));
        }

        let is_any = match node.get(IS_ANY) {
            None => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(malformed(format!("`{IS_ANY}` must be a bool, found {other}")))
            }
        };

        let populated: Vec<&str> = [FOR_TOKEN, DEMANDED_TOKENS, SUPPLY_TOKENS, UNION, INTERSECTION]
            .into_iter()
            .filter(|key| node.contains_key(*key))
            .collect();

        match (is_any, populated.as_slice()) {
            (false, []) => Ok(Self::Unspecified),
            (true, []) => Ok(Self::Any),
            (false, [FOR_TOKEN]) => Ok(Self::ForToken(node[FOR_TOKEN].clone())),
            (false, [DEMANDED_TOKENS]) => {
                Ok(Self::DemandedTokens(token_list(&node[DEMANDED_TOKENS], DEMANDED_TOKENS)?))
            }
            (false, [SUPPLY_TOKENS]) => {
                Ok(Self::SupplyTokens(token_list(&node[SUPPLY_TOKENS], SUPPLY_TOKENS)?))
            }
            (false, [UNION]) => {
                let (l, r) = pair_from_json(&node[UNION], UNION)?;
                Ok(Self::Union(l, r))
            }
            (false, [INTERSECTION]) => {
                let (l, r) = pair_from_json(&node[INTERSECTION], INTERSECTION)?;
                Ok(Self::Intersection(l, r))
            }
            _ => {
                let mut fields = populated;
                if is_any {
                    fields.insert(0, IS_ANY);
                }
                Err(malformed(format!(
                    "expected at most one populated field, found {}",
                    fields.join(", ")
                )))
            }
        }
    }

    /// The canonical (JCS) text of this memento.
    pub fn canonical_text(&self) -> Result<CanonicalText, ScopeError> {
        Ok(CanonicalText::new(&self.to_json())?)
    }

    /// Parse memento text. Any JSON layout is accepted; only the structure
    /// matters.
    ///
    /// Nesting depth is not capped: every union or intersection adds two
    /// levels, and any tree the algebra can build must read back.
    pub fn from_text(text: &str) -> Result<Self, ScopeError> {
        let mut de = serde_json::Deserializer::from_str(text);
        de.disable_recursion_limit();
        let value = Value::deserialize(&mut de)
            .and_then(|value| de.end().map(|()| value))
            .map_err(|e| malformed(format!("memento text is not JSON: {e}")))?;
        Self::from_json(&value)
    }
}

impl Serialize for Memento<Value> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Memento<Value> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

fn malformed(detail: String) -> ScopeError {
    tracing::warn!(%detail, "rejected malformed memento");
    ScopeError::MalformedMemento(detail)
}

fn pair_to_json(l: &Memento<Value>, r: &Memento<Value>) -> Value {
    let mut pair = Map::new();
    pair.insert(LEFT.to_string(), l.to_json());
    pair.insert(RIGHT.to_string(), r.to_json());
    Value::Object(pair)
}

type EncodedPair = (Arc<Memento<Value>>, Arc<Memento<Value>>);

fn pair_from_json(value: &Value, field: &str) -> Result<EncodedPair, ScopeError> {
    let Value::Object(pair) = value else {
        return Err(malformed(format!("`{field}` must be an object, found {value}")));
    };
    match (pair.get(LEFT), pair.get(RIGHT)) {
        (Some(l), Some(r)) if pair.len() == 2 => Ok((
            Arc::new(Memento::from_json(l)?),
            Arc::new(Memento::from_json(r)?),
        )),
        _ => Err(malformed(format!(
            "`{field}` must hold exactly `{LEFT}` and `{RIGHT}`"
        ))),
    }
}

fn token_list(value: &Value, field: &str) -> Result<Vec<Value>, ScopeError> {
    match value {
        Value::Array(tokens) => Ok(tokens.clone()),
        other => Err(malformed(format!("`{field}` must be an array, found {other}"))),
    }
}

/// Encode tokens, then sort by canonical text and drop duplicates.
fn encode_token_list<T>(tokens: &[T], codec: &dyn TokenCodec<T>) -> Result<Vec<Value>, ScopeError> {
    let mut keyed = tokens
        .iter()
        .map(|token| {
            let encoded = codec.encode(token)?;
            let text = CanonicalText::new(&encoded)?;
            Ok((text, encoded))
        })
        .collect::<Result<Vec<_>, ScopeError>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);
    Ok(keyed.into_iter().map(|(_, encoded)| encoded).collect())
}
