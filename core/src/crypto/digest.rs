use std::convert::TryFrom;
use std::fmt;

use md5::{Digest as _, Md5};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::digest_ids;
use crate::utils::fmt_hex;

/// Digest-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    #[error("unknown digest algorithm: 0x{0:04x}")]
    UnknownAlgorithm(u16),
    #[error("unknown digest algorithm name: {0}")]
    UnknownName(String),
}

/// Recomputed digest differs from the one carried with the data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("digest mismatch: expected {}, got {}", fmt_hex(expected), fmt_hex(actual))]
pub struct DigestMismatch {
    /// Digest recomputed over the data.
    pub expected: Vec<u8>,
    /// Digest the input carried.
    pub actual: Vec<u8>,
}

/// Supported digest algorithms.
///
/// The algorithm is part of the wire format, not a security choice: the
/// digest only detects corruption. Adding a variant means adding a new frame
/// format, never replacing MD5 for existing producers.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlg {
    Md5 = digest_ids::MD5,
}

impl DigestAlg {
    /// Digest output size in bytes.
    #[inline]
    pub const fn output_len(self) -> usize {
        match self {
            DigestAlg::Md5 => 16,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DigestAlg::Md5 => "md5",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, DigestError> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Ok(DigestAlg::Md5),
            other => Err(DigestError::UnknownName(other.to_string())),
        }
    }
}

impl TryFrom<u16> for DigestAlg {
    type Error = DigestError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            digest_ids::MD5 => Ok(DigestAlg::Md5),
            _ => Err(DigestError::UnknownAlgorithm(value)),
        }
    }
}

impl fmt::Display for DigestAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Internal hashing state.
#[derive(Clone)]
pub enum DigestState {
    Md5(Md5),
}

impl DigestState {
    pub fn new(alg: DigestAlg) -> Self {
        match alg {
            DigestAlg::Md5 => DigestState::Md5(Md5::new()),
        }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Md5(h) => h.update(data),
        }
    }

    #[inline]
    pub fn finalize(self) -> Vec<u8> {
        match self {
            DigestState::Md5(h) => h.finalize().to_vec(),
        }
    }
}

/// One-shot digest of `data`.
#[inline]
pub fn compute_digest(alg: DigestAlg, data: &[u8]) -> Vec<u8> {
    let mut state = DigestState::new(alg);
    state.update(data);
    state.finalize()
}

/// Recompute the digest of `data` and compare it byte for byte with the
/// digest the input `carried`.
///
/// Not constant time.
pub fn verify_digest(alg: DigestAlg, data: &[u8], carried: &[u8]) -> Result<(), DigestMismatch> {
    let computed = compute_digest(alg, data);
    if computed.as_slice() == carried {
        Ok(())
    } else {
        Err(DigestMismatch {
            expected: computed,
            actual: carried.to_vec(),
        })
    }
}
