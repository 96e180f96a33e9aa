use thiserror::Error;

use crate::constants::KPL_MAGIC;
use crate::crypto::{DigestAlg, DigestMismatch};
use crate::utils::fmt_hex;

/// Envelope description: which magic to expect and which digest trails the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFormat {
    pub magic: Vec<u8>,
    pub digest: DigestAlg,
}

impl FrameFormat {
    pub fn new(magic: impl Into<Vec<u8>>, digest: DigestAlg) -> Self {
        Self {
            magic: magic.into(),
            digest,
        }
    }

    /// The KPL aggregated-record envelope: `F3 89 9A C2 | payload | md5(payload)`.
    pub fn kpl() -> Self {
        Self::new(KPL_MAGIC.to_vec(), DigestAlg::Md5)
    }

    #[inline]
    pub fn digest_size(&self) -> usize {
        self.digest.output_len()
    }

    /// Bytes the envelope adds around the payload; also the minimum frame length.
    #[inline]
    pub fn overhead(&self) -> usize {
        self.magic.len() + self.digest_size()
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::kpl()
    }
}

/// Borrowed view over a validated frame.
///
/// `payload` is exactly the slice that was hashed and verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    pub magic: &'a [u8],
    pub payload: &'a [u8],
    pub digest: &'a [u8],
}

impl<'a> FrameView<'a> {
    pub fn frame_len(&self) -> usize {
        self.magic.len() + self.payload.len() + self.digest.len()
    }
}

/// Frame validation failures. All are terminal for the decode call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Input is shorter than `magic + digest`: not a frame of this format.
    #[error("malformed frame: {len} bytes, need at least {min}")]
    MalformedFrame { len: usize, min: usize },

    /// Leading bytes are not the expected magic.
    #[error("bad magic: expected {}, got {}", fmt_hex(expected), fmt_hex(actual))]
    BadMagic { expected: Vec<u8>, actual: Vec<u8> },

    /// Recomputed digest differs from the trailing digest.
    #[error("checksum mismatch: expected {}, got {}", fmt_hex(expected), fmt_hex(actual))]
    ChecksumMismatch { expected: Vec<u8>, actual: Vec<u8> },

    /// Caller asked for a digest size the digest algorithm does not produce.
    #[error("digest size mismatch: {alg} produces {expected} bytes, caller asked for {actual}")]
    DigestSizeMismatch {
        alg: DigestAlg,
        expected: usize,
        actual: usize,
    },
}

impl From<DigestMismatch> for FrameError {
    fn from(e: DigestMismatch) -> Self {
        FrameError::ChecksumMismatch {
            expected: e.expected,
            actual: e.actual,
        }
    }
}

impl FrameError {
    /// Stable short name used in logs, counters and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::MalformedFrame { .. } => "malformed_frame",
            FrameError::BadMagic { .. } => "bad_magic",
            FrameError::ChecksumMismatch { .. } => "checksum_mismatch",
            FrameError::DigestSizeMismatch { .. } => "digest_size_mismatch",
        }
    }
}
