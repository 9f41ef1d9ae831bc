//! Type-tagged value codec for opensled.
//!
//! Every stored value is a self-describing byte string: a one-byte tag
//! followed by the payload. The tag table is a durable on-disk format -
//! changing tag assignments or the integer wire width breaks compatibility
//! with previously written data:
//!
//! | Variant          | Tag   | Payload                                   |
//! |------------------|-------|-------------------------------------------|
//! | [`Value::Bytes`] | `b`   | payload verbatim                          |
//! | [`Value::Int`]   | `i`   | 16-byte big-endian two's complement       |
//! | [`Value::Str`]   | `s`   | UTF-8 bytes                               |
//! | [`Value::Json`]  | `j`   | UTF-8 JSON text                           |
//! | [`Value::Array`] | `n`   | self-describing tensor blob               |
//!
//! Decoding a blob whose first byte is not a known tag fails with
//! [`CodecError::MissingTag`] - foreign, untagged byte blobs are detected
//! as errors rather than silently misinterpreted.
//!
//! # Example
//!
//! ```rust
//! use opensled_codec::{decode, encode, Value};
//!
//! let blob = encode(&Value::from("hello")).unwrap();
//! assert_eq!(blob[0], b's');
//! assert_eq!(decode(&blob).unwrap(), Value::from("hello"));
//! ```

mod error;
mod tag;
mod tensor;
mod value;

pub use error::CodecError;
pub use tag::{Tag, INT_WIDTH};
pub use tensor::{Dtype, Element, MemoryOrder, Tensor};
pub use value::{
    blob_from_base64, blob_to_base64, decode, decode_key, encode, encode_key, Value,
};
