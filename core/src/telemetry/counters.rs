//! telemetry/counters.rs
//! Mutable counters collected while validating inputs.
//!
//! Summary: one success counter plus one counter per failure kind, and byte totals.
//! Converted into an immutable `TelemetrySnapshot` at the end of a run.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::framing::FrameError;
use crate::types::ValidateError;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames_ok: u64,
    pub frames_malformed: u64,
    pub frames_bad_magic: u64,
    pub frames_checksum_mismatch: u64,
    pub inputs_invalid_encoding: u64,
    pub inputs_too_large: u64,
    pub payloads_undecodable: u64,
    pub records_invalid: u64,
    pub other_failures: u64,
    pub bytes_payload: u64,
    pub bytes_overhead: u64,
    pub user_records: u64,
}

impl TelemetryCounters {
    /// Record one fully validated frame.
    ///
    /// - `payload_len`: bytes handed to the payload decoder
    /// - `overhead_len`: magic + digest bytes
    /// - `records`: sub-records in the decoded aggregate
    pub fn add_ok(&mut self, payload_len: usize, overhead_len: usize, records: usize) {
        self.frames_ok += 1;
        self.bytes_payload += payload_len as u64;
        self.bytes_overhead += overhead_len as u64;
        self.user_records += records as u64;
    }

    /// Count one failure under its kind.
    pub fn record_failure(&mut self, err: &ValidateError) {
        match err {
            ValidateError::Frame(FrameError::MalformedFrame { .. }) => self.frames_malformed += 1,
            ValidateError::Frame(FrameError::BadMagic { .. }) => self.frames_bad_magic += 1,
            ValidateError::Frame(FrameError::ChecksumMismatch { .. }) => self.frames_checksum_mismatch += 1,
            ValidateError::InvalidEncoding(_) => self.inputs_invalid_encoding += 1,
            ValidateError::TooLarge { .. } => self.inputs_too_large += 1,
            ValidateError::Deserialization(_) => self.payloads_undecodable += 1,
            ValidateError::Record(_) => self.records_invalid += 1,
            _ => self.other_failures += 1,
        }
    }

    pub fn failures(&self) -> u64 {
        self.frames_malformed
            + self.frames_bad_magic
            + self.frames_checksum_mismatch
            + self.inputs_invalid_encoding
            + self.inputs_too_large
            + self.payloads_undecodable
            + self.records_invalid
            + self.other_failures
    }

    /// Inputs seen, successful or not.
    pub fn total_inputs(&self) -> u64 {
        self.frames_ok + self.failures()
    }

    // Workers keep their own counters and merge at the end; no shared state.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.frames_ok += other.frames_ok;
        self.frames_malformed += other.frames_malformed;
        self.frames_bad_magic += other.frames_bad_magic;
        self.frames_checksum_mismatch += other.frames_checksum_mismatch;
        self.inputs_invalid_encoding += other.inputs_invalid_encoding;
        self.inputs_too_large += other.inputs_too_large;
        self.payloads_undecodable += other.payloads_undecodable;
        self.records_invalid += other.records_invalid;
        self.other_failures += other.other_failures;

        self.bytes_payload += other.bytes_payload;
        self.bytes_overhead += other.bytes_overhead;
        self.user_records += other.user_records;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
