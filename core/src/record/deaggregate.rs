use crate::record::proto::AggregatedRecord;
use crate::record::types::{RecordError, UserRecord};

/// Resolve every sub-record against the key tables.
///
/// Fails on the first index that points outside its table.
pub fn deaggregate(aggregated: &AggregatedRecord) -> Result<Vec<UserRecord>, RecordError> {
    let pk_table = &aggregated.partition_key_table;
    let ehk_table = &aggregated.explicit_hash_key_table;

    aggregated
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| -> Result<UserRecord, RecordError> {
            let partition_key = usize::try_from(record.partition_key_index)
                .ok()
                .and_then(|idx| pk_table.get(idx))
                .ok_or(RecordError::PartitionKeyIndexOutOfRange {
                    record: i,
                    index: record.partition_key_index,
                    table_len: pk_table.len(),
                })?;

            let explicit_hash_key = match record.explicit_hash_key_index {
                None => None,
                Some(index) => Some(
                    usize::try_from(index)
                        .ok()
                        .and_then(|idx| ehk_table.get(idx))
                        .ok_or(RecordError::ExplicitHashKeyIndexOutOfRange {
                            record: i,
                            index,
                            table_len: ehk_table.len(),
                        })?
                        .clone(),
                ),
            };

            Ok(UserRecord {
                partition_key: partition_key.clone(),
                explicit_hash_key,
                data: record.data.clone(),
            })
        })
        .collect()
}
