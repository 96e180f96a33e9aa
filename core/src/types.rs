use std::io;

use thiserror::Error;

use crate::crypto::DigestError;
use crate::framing::FrameError;
use crate::record::RecordError;

/// Unified error covering every stage of validating one input.
/// - `From<T>` impls let `?` flow across stages.
/// - `kind()` gives callers a stable tag per failure class.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Input text is not valid base64.
    #[error("invalid base64 encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// Decoded input exceeds the configured bound.
    #[error("input too large: {len} bytes exceeds limit of {max}")]
    TooLarge { len: usize, max: usize },

    /// Envelope-level failure (length, magic, checksum).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Envelope is valid but the payload is not an `AggregatedRecord`.
    #[error("payload is not a valid aggregated record: {0}")]
    Deserialization(#[from] prost::DecodeError),

    /// Payload decoded but its key indices are inconsistent.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Misconfigured digest.
    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidateError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidateError::InvalidEncoding(_) => "invalid_encoding",
            ValidateError::TooLarge { .. } => "too_large",
            ValidateError::Frame(e) => e.kind(),
            ValidateError::Deserialization(_) => "deserialization_error",
            ValidateError::Record(_) => "invalid_record",
            ValidateError::Digest(_) => "digest",
            ValidateError::Config(_) => "config",
            ValidateError::Io(_) => "io",
            ValidateError::Json(_) => "json",
        }
    }

    /// Borrow the frame error, if this failure came from the envelope.
    pub fn as_frame(&self) -> Option<&FrameError> {
        match self {
            ValidateError::Frame(e) => Some(e),
            _ => None,
        }
    }
}
