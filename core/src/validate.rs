//! Validation pipeline: base64 text → frame → `AggregatedRecord`.
//!
//! Fail-fast: the first failing stage aborts the input. Nothing partial is
//! returned.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use prost::Message;
use tracing::debug;

use crate::config::ValidateConfig;
use crate::framing::{parse_frame, FrameFormat};
use crate::record::{deaggregate, AggregatedRecord, UserRecord};
use crate::telemetry::{Stage, TelemetryCounters, TelemetryTimer};
use crate::types::ValidateError;

/// Decode standard (padded) base64, ignoring surrounding whitespace.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, ValidateError> {
    Ok(STANDARD.decode(text.trim())?)
}

/// A fully validated input.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub record: AggregatedRecord,
    /// Present when the validator is configured to de-aggregate.
    pub user_records: Option<Vec<UserRecord>>,
    pub payload_len: usize,
    pub frame_len: usize,
}

/// Validates inputs against one frame format and keeps running telemetry.
///
/// Each call is independent; the only state is the counters and timer.
pub struct Validator {
    format: FrameFormat,
    max_frame_bytes: Option<usize>,
    deaggregate: bool,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl Validator {
    pub fn new(config: &ValidateConfig) -> Result<Self, ValidateError> {
        Ok(Self {
            format: config.frame_format()?,
            max_frame_bytes: config.max_frame_bytes,
            deaggregate: config.deaggregate,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        })
    }

    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn timer(&self) -> &TelemetryTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut TelemetryTimer {
        &mut self.timer
    }

    /// Validate one base64-encoded record.
    pub fn validate(&mut self, text: &str) -> Result<Validated, ValidateError> {
        let result = self.decode_text(text).and_then(|raw| self.run(&raw));
        self.account(result)
    }

    /// Validate one already-decoded frame.
    pub fn validate_bytes(&mut self, raw: &[u8]) -> Result<Validated, ValidateError> {
        let result = self.run(raw);
        self.account(result)
    }

    /// Validate `text` and hand the result to `render`, timed as [`Stage::Render`].
    ///
    /// The input only counts as ok when rendering succeeds too; a render
    /// error is counted like any other failure.
    pub fn validate_and_render<T>(
        &mut self,
        text: &str,
        render: impl FnOnce(&Validated) -> Result<T, ValidateError>,
    ) -> Result<T, ValidateError> {
        let result = self
            .decode_text(text)
            .and_then(|raw| self.run(&raw))
            .and_then(|validated| {
                let out = self.timer.time(Stage::Render, || render(&validated))?;
                Ok((validated, out))
            });

        match result {
            Ok((validated, out)) => {
                self.account_ok(&validated);
                Ok(out)
            }
            Err(e) => {
                self.account_err(&e);
                Err(e)
            }
        }
    }

    fn decode_text(&mut self, text: &str) -> Result<Vec<u8>, ValidateError> {
        self.timer.time(Stage::Base64, || decode_base64(text))
    }

    fn account(&mut self, result: Result<Validated, ValidateError>) -> Result<Validated, ValidateError> {
        match &result {
            Ok(v) => self.account_ok(v),
            Err(e) => self.account_err(e),
        }
        result
    }

    fn account_ok(&mut self, v: &Validated) {
        self.counters
            .add_ok(v.payload_len, v.frame_len - v.payload_len, v.record.records.len());
    }

    fn account_err(&mut self, e: &ValidateError) {
        debug!(kind = e.kind(), error = %e, "validation failed");
        self.counters.record_failure(e);
    }

    fn run(&mut self, raw: &[u8]) -> Result<Validated, ValidateError> {
        if let Some(max) = self.max_frame_bytes {
            if raw.len() > max {
                return Err(ValidateError::TooLarge { len: raw.len(), max });
            }
        }

        let format = &self.format;
        let view = self.timer.time(Stage::Frame, || parse_frame(raw, format))?;
        debug!(len = raw.len(), payload = view.payload.len(), "frame verified");

        let record = self
            .timer
            .time(Stage::Parse, || AggregatedRecord::decode(view.payload))?;
        debug!(
            records = record.records.len(),
            keys = record.partition_key_table.len(),
            "payload decoded"
        );

        let user_records = if self.deaggregate {
            Some(self.timer.time(Stage::Deaggregate, || deaggregate(&record))?)
        } else {
            None
        };

        Ok(Validated {
            payload_len: view.payload.len(),
            frame_len: view.frame_len(),
            record,
            user_records,
        })
    }
}
