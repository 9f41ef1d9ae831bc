//! Facade-level errors.

/// Errors raised by [`crate::Database`].
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A write was attempted through a read-only handle. Checked locally,
    /// before the engine or the wire is touched.
    #[error("database '{path}' is read-only")]
    NotWritable { path: String },

    /// Local store failure (key shape, codec, or engine).
    #[error(transparent)]
    Store(#[from] opensled_store::Error),

    /// Remote transport or service failure.
    #[error(transparent)]
    Remote(#[from] opensled_http::Error),
}
