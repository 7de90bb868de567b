//! # Token Codecs
//!
//! A supply-and-demand space needs to turn tokens into structured values
//! for its mementos and back again. The codec is chosen explicitly when the
//! space is built; there is no hidden global default.
//!
//! - [`SerdeCodec`] uses the token's own `Serialize` / `Deserialize` impls.
//! - [`FnCodec`] wraps a caller-supplied pair of functions.

use std::fmt;
use std::marker::PhantomData;

use scope_core::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Converts tokens of type `T` to and from structured values.
pub trait TokenCodec<T>: Send + Sync {
    /// Encode a token.
    fn encode(&self, token: &T) -> Result<Value, CodecError>;

    /// Decode a previously encoded token.
    fn decode(&self, encoded: &Value) -> Result<T, CodecError>;
}

/// Codec backed by the token's serde implementation.
pub struct SerdeCodec<T> {
    _token: PhantomData<fn() -> T>,
}

impl<T> SerdeCodec<T> {
    /// Create a serde-backed codec.
    pub fn new() -> Self {
        Self {
            _token: PhantomData,
        }
    }
}

impl<T> Default for SerdeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerdeCodec")
    }
}

impl<T> TokenCodec<T> for SerdeCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, token: &T) -> Result<Value, CodecError> {
        serde_json::to_value(token).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, encoded: &Value) -> Result<T, CodecError> {
        T::deserialize(encoded).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Codec built from an encode function and a decode function.
pub struct FnCodec<E, D> {
    encode: E,
    decode: D,
}

impl<E, D> FnCodec<E, D> {
    /// Pair an encoder with a decoder.
    pub fn new(encode: E, decode: D) -> Self {
        Self { encode, decode }
    }
}

impl<E, D> fmt::Debug for FnCodec<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCodec")
    }
}

impl<T, E, D> TokenCodec<T> for FnCodec<E, D>
where
    E: Fn(&T) -> Value + Send + Sync,
    D: Fn(&Value) -> Result<T, CodecError> + Send + Sync,
{
    fn encode(&self, token: &T) -> Result<Value, CodecError> {
        Ok((self.encode)(token))
    }

    fn decode(&self, encoded: &Value) -> Result<T, CodecError> {
        (self.decode)(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Clause {
        Given,
        When,
    }

    #[test]
    fn serde_codec_round_trip() {
        let codec = SerdeCodec::<Clause>::new();
        let encoded = codec.encode(&Clause::When).unwrap();
        assert_eq!(encoded, serde_json::json!("When"));
        assert_eq!(codec.decode(&encoded).unwrap(), Clause::When);
    }

    #[test]
    fn serde_codec_rejects_foreign_value() {
        let codec = SerdeCodec::<Clause>::new();
        let err = codec.decode(&serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn fn_codec_uses_supplied_functions() {
        let codec = FnCodec::new(
            |n: &u8| serde_json::json!(format!("#{n}")),
            |v: &Value| {
                v.as_str()
                    .and_then(|s| s.strip_prefix('#'))
                    .and_then(|s| s.parse::<u8>().ok())
                    .ok_or_else(|| CodecError::Decode(format!("not a tag: {v}")))
            },
        );
        let encoded = TokenCodec::<u8>::encode(&codec, &7).unwrap();
        assert_eq!(encoded, serde_json::json!("#7"));
        assert_eq!(TokenCodec::<u8>::decode(&codec, &encoded).unwrap(), 7);
        assert!(TokenCodec::<u8>::decode(&codec, &serde_json::json!("7")).is_err());
    }

    #[test]
    fn serde_codec_encodes_unit_variant_by_name() {
        let codec = SerdeCodec::<Clause>::new();
        assert_eq!(codec.encode(&Clause::Given).unwrap(), serde_json::json!("Given"));
    }
}
