//! Aggregated-record envelope.
//!
//! Responsibilities:
//! - Describe the envelope (`FrameFormat`)
//! - Encode payloads into `magic | payload | digest`
//! - Decode frames with strict length, magic and digest validation
//!
//! Non-responsibilities:
//! - Interpreting the payload (see `record`)
//! - base64 / text handling (see `validate`)

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{FrameError, FrameFormat, FrameView};
pub use encode::{encode_frame, is_framed};
pub use decode::{decode_frame, decode_kpl_frame, parse_frame};
