//! Error types for the engine layer.
//!
//! Errors at this level are storage-focused. No semantic errors like
//! "invalid key shape" or "unknown value tag" - those belong in higher
//! layers.

/// Errors at the engine (byte) layer.
///
/// Engine failures (I/O errors, corruption reports) are surfaced unchanged
/// from sled and never retried here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Failure reported by the underlying sled database.
    #[error("storage engine error: {0}")]
    Backend(#[from] sled::Error),
}
