//! KPL aggregated-record payload: schema, aggregation and de-aggregation.

pub mod proto;
pub mod types;
pub mod intern;
pub mod aggregate;
pub mod deaggregate;

pub use proto::{AggregatedRecord, Record, Tag};
pub use types::{RecordError, UserRecord};
pub use intern::StringInterner;
pub use aggregate::{aggregate_all, Aggregator};
pub use deaggregate::deaggregate;
