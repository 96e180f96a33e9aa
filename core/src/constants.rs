//! Wire constants for the KPL aggregated-record format.

/// Magic prefix of every aggregated record.
pub const KPL_MAGIC: [u8; 4] = [0xF3, 0x89, 0x9A, 0xC2];

/// Size of the trailing MD5 digest in bytes.
pub const KPL_DIGEST_SIZE: usize = 16;

/// Bytes added around the payload by the envelope.
pub const KPL_FRAME_OVERHEAD: usize = KPL_MAGIC.len() + KPL_DIGEST_SIZE;

/// Largest record Kinesis accepts (1 MiB). Used as the default input bound.
pub const MAX_KINESIS_RECORD_BYTES: usize = 1024 * 1024;

/// Aggregation defaults (same as the KPL).
pub const DEFAULT_AGGREGATION_MAX_BYTES: usize = 51_200;
pub const DEFAULT_AGGREGATION_MAX_RECORDS: usize = u32::MAX as usize;

/// Digest algorithm identifiers (mirrored in `DigestAlg`).
pub mod digest_ids {
    pub const MD5: u16 = 0x0001;
}
