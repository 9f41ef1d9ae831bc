//! The `Value` tagged union and the encode/decode entry points.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::CodecError;
use crate::tag::{Tag, INT_WIDTH};
use crate::tensor::Tensor;

/// A typed value as stored in the engine's value slot.
///
/// The set of variants is closed and maps one-to-one onto the [`Tag`]
/// table. `From` conversions implement the default dispatch: bytes map to
/// `Bytes`, integers to `Int`, strings to `Str`, tensors to `Array`, and
/// anything JSON-shaped to `Json` (the fallback arm).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Opaque bytes, stored verbatim after the tag.
    Bytes(Vec<u8>),
    /// Signed integer within the 16-byte two's-complement wire range.
    Int(i128),
    /// UTF-8 text.
    Str(String),
    /// Structured data, serialized as JSON text.
    Json(serde_json::Value),
    /// Dense numeric array.
    Array(Tensor),
}

impl Value {
    /// The tag this value encodes under.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Bytes(_) => Tag::Bytes,
            Value::Int(_) => Tag::Int,
            Value::Str(_) => Tag::Str,
            Value::Json(_) => Tag::Json,
            Value::Array(_) => Tag::Tensor,
        }
    }

    /// Build an `Int` from an unsigned 128-bit integer.
    ///
    /// Values above `i128::MAX` (2^127 - 1) do not fit the signed 16-byte
    /// wire encoding and fail with [`CodecError::IntOverflow`].
    pub fn int_from_u128(n: u128) -> Result<Value, CodecError> {
        i128::try_from(n)
            .map(Value::Int)
            .map_err(|_| CodecError::IntOverflow)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Int(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Tensor> for Value {
    fn from(v: Tensor) -> Self {
        Value::Array(v)
    }
}

// Non-integer numbers and booleans fall through to the JSON arm.

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Json(serde_json::Value::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Json(serde_json::Value::from(v))
    }
}

impl TryFrom<u128> for Value {
    type Error = CodecError;

    fn try_from(n: u128) -> Result<Self, Self::Error> {
        Value::int_from_u128(n)
    }
}

/// Encode a value into its tagged byte string.
pub fn encode(value: &Value) -> Result<Vec<u8>, CodecError> {
    let payload = match value {
        Value::Bytes(b) => b.clone(),
        Value::Int(n) => n.to_be_bytes().to_vec(),
        Value::Str(s) => s.as_bytes().to_vec(),
        Value::Json(j) => serde_json::to_vec(j).map_err(|e| CodecError::Encode {
            tag: Tag::Json,
            message: e.to_string(),
        })?,
        Value::Array(t) => t.to_blob(),
    };
    let mut blob = Vec::with_capacity(1 + payload.len());
    blob.push(value.tag().byte());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Decode a tagged byte string back into a value.
///
/// The first byte selects the decoder; an unknown leading byte (or an empty
/// blob) fails with [`CodecError::MissingTag`]. A `Bytes`-tagged decode is
/// the identity on its payload - the tag byte is a framing device only, so
/// a payload that itself starts with another tag byte is not a collision.
pub fn decode(blob: &[u8]) -> Result<Value, CodecError> {
    let (&tag_byte, payload) = blob.split_first().ok_or(CodecError::MissingTag)?;
    let tag = Tag::from_byte(tag_byte).ok_or(CodecError::MissingTag)?;

    match tag {
        Tag::Bytes => Ok(Value::Bytes(payload.to_vec())),
        Tag::Int => {
            let bytes: [u8; INT_WIDTH] =
                payload.try_into().map_err(|_| CodecError::Decode {
                    tag: Tag::Int,
                    message: format!("payload is {} bytes, expected {}", payload.len(), INT_WIDTH),
                })?;
            Ok(Value::Int(i128::from_be_bytes(bytes)))
        }
        Tag::Str => {
            let s = std::str::from_utf8(payload).map_err(|e| CodecError::Decode {
                tag: Tag::Str,
                message: e.to_string(),
            })?;
            Ok(Value::Str(s.to_string()))
        }
        Tag::Json => {
            let j = serde_json::from_slice(payload).map_err(|e| CodecError::Decode {
                tag: Tag::Json,
                message: e.to_string(),
            })?;
            Ok(Value::Json(j))
        }
        Tag::Tensor => Ok(Value::Array(Tensor::from_blob(payload)?)),
    }
}

/// Encode a key segment. Keys are plain UTF-8, never tagged - prefixing
/// relies on byte-for-byte concatenation of the segments.
pub fn encode_key(key: &str) -> Vec<u8> {
    key.as_bytes().to_vec()
}

/// Decode a stored key back to text.
pub fn decode_key(bytes: &[u8]) -> Result<String, CodecError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::KeyNotUtf8 {
        message: e.to_string(),
    })
}

/// Base64-encode a tagged blob for transport inside JSON bodies.
pub fn blob_to_base64(blob: &[u8]) -> String {
    BASE64.encode(blob)
}

/// Decode a base64-carried tagged blob.
pub fn blob_from_base64(s: &str) -> Result<Vec<u8>, CodecError> {
    Ok(BASE64.decode(s)?)
}
