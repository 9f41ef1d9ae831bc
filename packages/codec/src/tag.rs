//! The one-byte tag table identifying which decoder applies to a blob.

use std::fmt;

/// Wire width of the [`Tag::Int`] payload in bytes.
///
/// Fixed at 16 (two's complement, big-endian). Part of the durable on-disk
/// format.
pub const INT_WIDTH: usize = 16;

/// One-byte discriminator prefixed to every stored value.
///
/// The set is closed: any other leading byte signals a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Opaque bytes, payload verbatim.
    Bytes,
    /// Signed integer, fixed 16-byte big-endian two's complement.
    Int,
    /// UTF-8 text.
    Str,
    /// Structured data as UTF-8 JSON text.
    Json,
    /// Dense numeric array as a self-describing tensor blob.
    Tensor,
}

impl Tag {
    /// The wire byte for this tag.
    pub const fn byte(self) -> u8 {
        match self {
            Tag::Bytes => b'b',
            Tag::Int => b'i',
            Tag::Str => b's',
            Tag::Json => b'j',
            Tag::Tensor => b'n',
        }
    }

    /// Look up a tag by its wire byte. Unknown bytes return `None`.
    pub fn from_byte(byte: u8) -> Option<Tag> {
        match byte {
            b'b' => Some(Tag::Bytes),
            b'i' => Some(Tag::Int),
            b's' => Some(Tag::Str),
            b'j' => Some(Tag::Json),
            b'n' => Some(Tag::Tensor),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Bytes => "bytes",
            Tag::Int => "int",
            Tag::Str => "str",
            Tag::Json => "json",
            Tag::Tensor => "tensor",
        };
        write!(f, "{}", name)
    }
}
