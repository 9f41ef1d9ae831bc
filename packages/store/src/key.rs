//! Logical keys: ordered text segments addressing a value or a sub-store.

use std::fmt;

use opensled_codec::encode_key;

use crate::Error;

/// A logical key as an ordered sequence of UTF-8 text segments.
///
/// The two variants make the caller's intent explicit:
/// - `Value`: the last segment is the leaf key, everything before it is a
///   prefix segment; point operations resolve this to one engine key.
/// - `SubStore`: every segment is a prefix; the path addresses the
///   sub-store at that prefix, not a value. An empty segment list is the
///   root.
///
/// Segments are `String`s by construction, so a non-text segment cannot be
/// expressed. Concatenating all segments byte-for-byte equals the flat key
/// stored in the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPath {
    /// Prefix segments followed by a leaf key (the last segment).
    Value(Vec<String>),
    /// Prefix segments addressing a sub-store.
    SubStore(Vec<String>),
}

impl KeyPath {
    /// A value path: the last segment is the leaf key.
    pub fn value<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath::Value(segments.into_iter().map(Into::into).collect())
    }

    /// A sub-store path: every segment is a prefix.
    pub fn sub_store<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KeyPath::SubStore(prefixes.into_iter().map(Into::into).collect())
    }

    /// The root sub-store (no prefixing).
    pub fn root() -> Self {
        KeyPath::SubStore(Vec::new())
    }

    /// All segments in input order, regardless of variant.
    pub fn segments(&self) -> &[String] {
        match self {
            KeyPath::Value(s) | KeyPath::SubStore(s) => s,
        }
    }

    /// Split a value path into (prefix segments, leaf key).
    ///
    /// Fails with a key-shape error for sub-store paths and for empty
    /// value paths - both before any I/O happens.
    pub fn split_value(&self) -> Result<(&[String], &str), Error> {
        match self {
            KeyPath::Value(segments) => match segments.split_last() {
                Some((leaf, prefixes)) => Ok((prefixes, leaf)),
                None => Err(Error::key_shape("value key expected, got an empty path")),
            },
            KeyPath::SubStore(_) => Err(Error::key_shape(
                "value key expected, got a sub-store path",
            )),
        }
    }

    /// The prefix segments of a sub-store path.
    ///
    /// Fails with a key-shape error for value paths: addressing a sub-store
    /// goes through `SubStore`, never through an overloaded leaf.
    pub fn sub_store_prefixes(&self) -> Result<&[String], Error> {
        match self {
            KeyPath::SubStore(prefixes) => Ok(prefixes),
            KeyPath::Value(_) => Err(Error::key_shape(
                "sub-store path expected, got a value key",
            )),
        }
    }

    /// The flat engine key: all segments concatenated byte-for-byte.
    pub fn flat(&self) -> String {
        self.segments().concat()
    }
}

/// Encode segments with the UTF-8 key codec, in input order.
pub(crate) fn normalize(segments: &[String]) -> Vec<Vec<u8>> {
    segments.iter().map(|s| encode_key(s)).collect()
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        KeyPath::Value(vec![key.to_string()])
    }
}

impl From<String> for KeyPath {
    fn from(key: String) -> Self {
        KeyPath::Value(vec![key])
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPath::Value(_) => write!(f, "{}", self.flat()),
            KeyPath::SubStore(_) => write!(f, "{}...", self.flat()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_string_is_a_leaf_with_no_prefixes() {
        let key = KeyPath::from("a1");
        let (prefixes, leaf) = key.split_value().unwrap();
        assert!(prefixes.is_empty());
        assert_eq!(leaf, "a1");
    }

    #[test]
    fn last_segment_is_the_leaf() {
        let key = KeyPath::value(["prefix1", "prefix2", "key"]);
        let (prefixes, leaf) = key.split_value().unwrap();
        assert_eq!(prefixes, ["prefix1", "prefix2"]);
        assert_eq!(leaf, "key");
    }

    #[test]
    fn empty_value_path_is_a_key_shape_error() {
        let key = KeyPath::Value(vec![]);
        assert!(matches!(key.split_value(), Err(Error::KeyShape { .. })));
    }

    #[test]
    fn sub_store_path_rejected_by_split_value() {
        let key = KeyPath::sub_store(["b"]);
        assert!(matches!(key.split_value(), Err(Error::KeyShape { .. })));
    }

    #[test]
    fn value_path_rejected_as_sub_store() {
        let key = KeyPath::from("k");
        assert!(matches!(
            key.sub_store_prefixes(),
            Err(Error::KeyShape { .. })
        ));
    }

    #[test]
    fn flat_is_byte_for_byte_concatenation() {
        let key = KeyPath::value(["prefix1", "prefix2", "prefix2", "key_string2"]);
        assert_eq!(key.flat(), "prefix1prefix2prefix2key_string2");
    }

    #[test]
    fn unusual_segments_are_legal_text() {
        // Segments are arbitrary UTF-8, including empty and punctuation.
        let key = KeyPath::value(["a", "", "{", "key"]);
        assert_eq!(key.flat(), "a{key");
        assert!(key.split_value().is_ok());
    }

    #[test]
    fn root_is_an_empty_sub_store_path() {
        assert_eq!(KeyPath::root().sub_store_prefixes().unwrap().len(), 0);
    }

    #[test]
    fn normalize_encodes_in_input_order() {
        let encoded = normalize(&["b".to_string(), "k1".to_string()]);
        assert_eq!(encoded, vec![b"b".to_vec(), b"k1".to_vec()]);
    }
}
