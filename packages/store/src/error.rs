//! Error types for the semantic store layer.

use std::path::PathBuf;

/// Errors at the store layer.
///
/// Key-shape errors are caller bugs detected before any I/O; codec and
/// engine errors bubble up from the layers below unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A key path has the wrong shape for the operation (empty value path,
    /// sub-store path handed to a point operation, or vice versa).
    #[error("key shape error: {message}")]
    KeyShape { message: String },

    /// A second root handle was constructed directly for a path that is
    /// already registered.
    #[error("store for '{}' already exists", path.display())]
    AlreadyOpen { path: PathBuf },

    /// Value or key codec failure.
    #[error(transparent)]
    Codec(#[from] opensled_codec::CodecError),

    /// Engine-level failure, propagated unchanged.
    #[error(transparent)]
    Engine(#[from] opensled_engine::EngineError),
}

impl Error {
    pub(crate) fn key_shape(message: impl Into<String>) -> Self {
        Error::KeyShape {
            message: message.into(),
        }
    }
}
