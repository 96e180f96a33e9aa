//! Packs user records into framed `AggregatedRecord`s.

use prost::encoding::encoded_len_varint;
use prost::Message;
use tracing::debug;

use crate::constants::{DEFAULT_AGGREGATION_MAX_BYTES, DEFAULT_AGGREGATION_MAX_RECORDS};
use crate::framing::{encode_frame, FrameFormat};
use crate::record::intern::StringInterner;
use crate::record::proto;
use crate::record::types::UserRecord;

/// Encoded length of a length-delimited field with a one-byte tag.
#[inline]
fn delimited_len(len: usize) -> usize {
    1 + encoded_len_varint(len as u64) + len
}

/// Encoded length of a varint field with a one-byte tag.
#[inline]
fn varint_field_len(value: u64) -> usize {
    1 + encoded_len_varint(value)
}

/// Accumulates user records until either limit is reached.
///
/// The size bookkeeping is exact: `frame_len()` always equals the length of
/// the frame `take()` would produce.
pub struct Aggregator {
    format: FrameFormat,
    max_bytes: usize,
    max_records: usize,
    partition_keys: StringInterner,
    explicit_hash_keys: StringInterner,
    records: Vec<proto::Record>,
    payload_len: usize,
}

impl Aggregator {
    pub fn new(max_bytes: usize, max_records: usize) -> Self {
        Self::with_format(FrameFormat::kpl(), max_bytes, max_records)
    }

    pub fn with_format(format: FrameFormat, max_bytes: usize, max_records: usize) -> Self {
        Self {
            format,
            max_bytes,
            max_records: max_records.max(1),
            partition_keys: StringInterner::new(),
            explicit_hash_keys: StringInterner::new(),
            records: Vec::new(),
            payload_len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Length of the frame `take()` would currently produce.
    pub fn frame_len(&self) -> usize {
        self.format.overhead() + self.payload_len
    }

    /// Payload bytes `record` would add to the current aggregate.
    fn cost(&self, record: &UserRecord) -> usize {
        let mut added = 0;

        let pk_index = match self.partition_keys.index_of(&record.partition_key) {
            Some(idx) => idx,
            None => {
                added += delimited_len(record.partition_key.len());
                self.partition_keys.len() as u64
            }
        };

        let mut body = varint_field_len(pk_index) + delimited_len(record.data.len());

        if let Some(ehk) = &record.explicit_hash_key {
            let ehk_index = match self.explicit_hash_keys.index_of(ehk) {
                Some(idx) => idx,
                None => {
                    added += delimited_len(ehk.len());
                    self.explicit_hash_keys.len() as u64
                }
            };
            body += varint_field_len(ehk_index);
        }

        added + delimited_len(body)
    }

    /// Buffer `record`, or hand it back if it does not fit.
    ///
    /// A rejected record should be retried after `take()`. An empty
    /// aggregator accepts any record, however large.
    pub fn try_push(&mut self, record: UserRecord) -> Option<UserRecord> {
        let added = self.cost(&record);

        if !self.records.is_empty()
            && (self.records.len() >= self.max_records || self.frame_len() + added > self.max_bytes)
        {
            return Some(record);
        }

        let partition_key_index = self.partition_keys.intern(&record.partition_key);
        let explicit_hash_key_index = record
            .explicit_hash_key
            .as_deref()
            .map(|key| self.explicit_hash_keys.intern(key));

        self.records.push(proto::Record {
            partition_key_index,
            explicit_hash_key_index,
            data: record.data,
            tags: Vec::new(),
        });
        self.payload_len += added;

        None
    }

    /// Build the framed aggregate and reset. `None` when nothing is buffered.
    pub fn take(&mut self) -> Option<Vec<u8>> {
        if self.records.is_empty() {
            return None;
        }

        let aggregated = proto::AggregatedRecord {
            partition_key_table: self.partition_keys.take(),
            explicit_hash_key_table: self.explicit_hash_keys.take(),
            records: std::mem::take(&mut self.records),
        };

        let payload = aggregated.encode_to_vec();
        debug_assert_eq!(payload.len(), self.payload_len);

        let frame = encode_frame(&payload, &self.format);
        debug!(
            records = aggregated.records.len(),
            keys = aggregated.partition_key_table.len(),
            len = frame.len(),
            "produced aggregated record"
        );

        self.payload_len = 0;
        Some(frame)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_AGGREGATION_MAX_BYTES, DEFAULT_AGGREGATION_MAX_RECORDS)
    }
}

/// Aggregate every record in `records`, flushing whenever a limit is hit.
pub fn aggregate_all<I>(records: I, max_bytes: usize, max_records: usize) -> Vec<Vec<u8>>
where
    I: IntoIterator<Item = UserRecord>,
{
    let mut aggregator = Aggregator::new(max_bytes, max_records);
    let mut frames = Vec::new();

    for record in records {
        if let Some(rejected) = aggregator.try_push(record) {
            frames.extend(aggregator.take());
            // Empty aggregator: always accepted.
            let retry = aggregator.try_push(rejected);
            debug_assert!(retry.is_none());
        }
    }
    frames.extend(aggregator.take());
    frames
}
