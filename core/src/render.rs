//! Human-readable renderings of a decoded `AggregatedRecord`.

use std::fmt::Write as _;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::record::{AggregatedRecord, Record, Tag, UserRecord};
use crate::types::ValidateError;
use crate::validate::Validated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ValidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ValidateError::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// Escape bytes the way protobuf text format does: printable ASCII kept,
/// quotes and backslash escaped, everything else as three-digit octal.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b'"' => out.push_str("\\\""),
            b'\'' => out.push_str("\\'"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

fn push_tag(out: &mut String, indent: &str, tag: &Tag) {
    let _ = writeln!(out, "{indent}tags {{");
    let _ = writeln!(out, "{indent}  key: \"{}\"", escape_bytes(tag.key.as_bytes()));
    if let Some(value) = &tag.value {
        let _ = writeln!(out, "{indent}  value: \"{}\"", escape_bytes(value.as_bytes()));
    }
    let _ = writeln!(out, "{indent}}}");
}

fn push_record(out: &mut String, record: &Record) {
    out.push_str("records {\n");
    let _ = writeln!(out, "  partition_key_index: {}", record.partition_key_index);
    if let Some(idx) = record.explicit_hash_key_index {
        let _ = writeln!(out, "  explicit_hash_key_index: {idx}");
    }
    let _ = writeln!(out, "  data: \"{}\"", escape_bytes(&record.data));
    for tag in &record.tags {
        push_tag(out, "  ", tag);
    }
    out.push_str("}\n");
}

/// Protobuf text format, fields in tag order.
pub fn render_text(record: &AggregatedRecord) -> String {
    let mut out = String::new();
    for key in &record.partition_key_table {
        let _ = writeln!(out, "partition_key_table: \"{}\"", escape_bytes(key.as_bytes()));
    }
    for key in &record.explicit_hash_key_table {
        let _ = writeln!(out, "explicit_hash_key_table: \"{}\"", escape_bytes(key.as_bytes()));
    }
    for r in &record.records {
        push_record(&mut out, r);
    }
    out
}

/// One line per user record: `<partition key>\t<data>`.
pub fn render_user_records_text(records: &[UserRecord]) -> String {
    let mut out = String::new();
    for r in records {
        let _ = write!(out, "{}", escape_bytes(r.partition_key.as_bytes()));
        if let Some(ehk) = &r.explicit_hash_key {
            let _ = write!(out, " ({})", escape_bytes(ehk.as_bytes()));
        }
        let _ = writeln!(out, "\t\"{}\"", escape_bytes(&r.data));
    }
    out
}

#[derive(Serialize)]
struct JsonData<'a> {
    base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

impl<'a> JsonData<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            base64: STANDARD.encode(data),
            text: std::str::from_utf8(data).ok(),
        }
    }
}

#[derive(Serialize)]
struct JsonTag<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    partition_key_index: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    explicit_hash_key_index: Option<u64>,
    data: JsonData<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<JsonTag<'a>>,
}

#[derive(Serialize)]
struct JsonAggregated<'a> {
    partition_key_table: &'a [String],
    explicit_hash_key_table: &'a [String],
    records: Vec<JsonRecord<'a>>,
}

#[derive(Serialize)]
struct JsonUserRecord<'a> {
    partition_key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    explicit_hash_key: Option<&'a str>,
    data: JsonData<'a>,
}

pub fn render_json(record: &AggregatedRecord) -> Result<String, ValidateError> {
    let view = JsonAggregated {
        partition_key_table: &record.partition_key_table,
        explicit_hash_key_table: &record.explicit_hash_key_table,
        records: record
            .records
            .iter()
            .map(|r| JsonRecord {
                partition_key_index: r.partition_key_index,
                explicit_hash_key_index: r.explicit_hash_key_index,
                data: JsonData::new(&r.data),
                tags: r
                    .tags
                    .iter()
                    .map(|t| JsonTag {
                        key: &t.key,
                        value: t.value.as_deref(),
                    })
                    .collect(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn render_user_records_json(records: &[UserRecord]) -> Result<String, ValidateError> {
    let view: Vec<JsonUserRecord<'_>> = records
        .iter()
        .map(|r| JsonUserRecord {
            partition_key: &r.partition_key,
            explicit_hash_key: r.explicit_hash_key.as_deref(),
            data: JsonData::new(&r.data),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&view)?)
}

/// User records when the validator de-aggregated, the raw message otherwise.
pub fn render_validated(validated: &Validated, format: OutputFormat) -> Result<String, ValidateError> {
    match (&validated.user_records, format) {
        (Some(records), OutputFormat::Text) => Ok(render_user_records_text(records)),
        (Some(records), OutputFormat::Json) => render_user_records_json(records),
        (None, OutputFormat::Text) => Ok(render_text(&validated.record)),
        (None, OutputFormat::Json) => render_json(&validated.record),
    }
}
