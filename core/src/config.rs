//! Validator configuration.
//!
//! File format is JSON; every field is optional:
//!
//! ```text
//! {
//!   "magic": "f3899ac2",
//!   "digest": "md5",
//!   "max_frame_bytes": 1048576,
//!   "deaggregate": false
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{KPL_MAGIC, MAX_KINESIS_RECORD_BYTES};
use crate::crypto::DigestAlg;
use crate::framing::FrameFormat;
use crate::types::ValidateError;
use crate::utils::parse_hex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Expected magic prefix, hex encoded.
    pub magic: String,
    pub digest: DigestAlg,
    /// Upper bound on the decoded frame; `None` disables the check.
    pub max_frame_bytes: Option<usize>,
    /// Resolve sub-records against the key tables after decoding.
    pub deaggregate: bool,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            magic: hex::encode(KPL_MAGIC),
            digest: DigestAlg::Md5,
            max_frame_bytes: Some(MAX_KINESIS_RECORD_BYTES),
            deaggregate: false,
        }
    }
}

impl ValidateConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ValidateError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ValidateError> {
        let config: Self = serde_json::from_str(text)?;
        config.frame_format()?;
        Ok(config)
    }

    /// Envelope described by this config.
    pub fn frame_format(&self) -> Result<FrameFormat, ValidateError> {
        let magic = parse_hex(&self.magic)
            .map_err(|e| ValidateError::Config(format!("magic {:?}: {}", self.magic, e)))?;
        if magic.is_empty() {
            return Err(ValidateError::Config("magic must not be empty".into()));
        }
        Ok(FrameFormat::new(magic, self.digest))
    }
}
