//! Error types for the HTTP facade client.

/// Errors raised by [`crate::RemoteStore`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server address could not be parsed.
    #[error("invalid server address: {0}")]
    Url(#[from] url::ParseError),

    /// Transport-level failure (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("remote returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    /// A response body could not be parsed.
    #[error("malformed response body: {message}")]
    Response { message: String },

    /// Key or value codec failure on the client side of the boundary.
    #[error(transparent)]
    Codec(#[from] opensled_codec::CodecError),

    /// Store-layer failure (key shape checks run before any request).
    #[error(transparent)]
    Store(#[from] opensled_store::Error),
}

impl Error {
    pub(crate) fn response(message: impl Into<String>) -> Self {
        Error::Response {
            message: message.into(),
        }
    }
}
