//! Error taxonomy for the transformation pipeline.
//!
//! Every failure surfaces synchronously to the immediate caller; nothing in
//! the pipeline catches or retries. Callers are expected to surface these
//! variants verbatim rather than collapsing them into a generic failure.

use thiserror::Error;

/// Errors produced by the probe, crop, and compression operations.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The declared media type is not a recognized image type.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The bytes could not be decoded as the declared/expected format.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// The backend cannot produce the requested output type or quality.
    #[error("Encode failed: {0}")]
    Encode(String),

    /// A caller-supplied parameter is out of range or missing.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
