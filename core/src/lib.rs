//! kpl-core
//!
//! KPL aggregated-record envelope: framing, digest verification, payload
//! model and the validation pipeline used by `kpl-agg-validate`.
//! No I/O beyond reading an optional config file.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

pub mod crypto;
pub mod framing;
pub mod record;
pub mod telemetry;

// Pipeline and presentation
pub mod validate;
pub mod render;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::ValidateConfig;
    pub use crate::constants::{KPL_DIGEST_SIZE, KPL_MAGIC};
    pub use crate::framing::{decode_frame, encode_frame, FrameError, FrameFormat};
    pub use crate::record::{AggregatedRecord, Aggregator, UserRecord};
    pub use crate::types::ValidateError;
    pub use crate::validate::{Validated, Validator};
}
