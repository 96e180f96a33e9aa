use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One producer record as it existed before aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub partition_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_hash_key: Option<String>,
    pub data: Vec<u8>,
}

impl UserRecord {
    pub fn new(partition_key: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            partition_key: partition_key.into(),
            explicit_hash_key: None,
            data: data.into(),
        }
    }

    pub fn with_explicit_hash_key(mut self, key: impl Into<String>) -> Self {
        self.explicit_hash_key = Some(key.into());
        self
    }
}

/// A decoded `AggregatedRecord` that does not describe valid user records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record {record}: partition key index {index} out of range (table has {table_len} entries)")]
    PartitionKeyIndexOutOfRange {
        record: usize,
        index: u64,
        table_len: usize,
    },

    #[error("record {record}: explicit hash key index {index} out of range (table has {table_len} entries)")]
    ExplicitHashKeyIndexOutOfRange {
        record: usize,
        index: u64,
        table_len: usize,
    },
}
