//! Error types for the codec.

use crate::tag::Tag;

/// Errors raised while converting between values and tagged byte strings.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The blob's first byte is not one of the known tags.
    ///
    /// This is how foreign, untagged byte blobs (e.g. a raw array dump
    /// written without the tag prefix) are distinguished from correctly
    /// tagged ones.
    #[error("missing type identifier in byte blob")]
    MissingTag,

    /// The payload after a recognized tag is malformed.
    #[error("decode error ({tag}): {message}")]
    Decode { tag: Tag, message: String },

    /// A value could not be serialized into its payload form.
    #[error("encode error ({tag}): {message}")]
    Encode { tag: Tag, message: String },

    /// An integer does not fit the fixed 16-byte wire encoding.
    #[error("integer overflows the 16-byte wire encoding")]
    IntOverflow,

    /// A stored key is not valid UTF-8.
    #[error("key is not valid UTF-8: {message}")]
    KeyNotUtf8 { message: String },

    /// A base64-carried blob is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tag_message_is_stable() {
        // Callers match on this message; it mirrors the on-disk contract.
        assert_eq!(
            CodecError::MissingTag.to_string(),
            "missing type identifier in byte blob"
        );
    }

    #[test]
    fn decode_error_names_the_tag() {
        let e = CodecError::Decode {
            tag: Tag::Int,
            message: "payload is 3 bytes, expected 16".to_string(),
        };
        let display = e.to_string();
        assert!(display.contains("int"));
        assert!(display.contains("expected 16"));
    }
}
