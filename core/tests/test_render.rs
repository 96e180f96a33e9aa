// Output rendering: protobuf text format and JSON.

#[cfg(test)]
mod tests {
    use kpl_core::record::{AggregatedRecord, Record, Tag, UserRecord};
    use kpl_core::render::{
        escape_bytes, render_json, render_text, render_user_records_json, render_user_records_text,
        render_validated, OutputFormat,
    };
    use kpl_core::validate::Validated;

    fn sample() -> AggregatedRecord {
        AggregatedRecord {
            partition_key_table: vec!["pk".into()],
            explicit_hash_key_table: vec!["99".into()],
            records: vec![
                Record {
                    partition_key_index: 0,
                    explicit_hash_key_index: None,
                    data: b"hello".to_vec(),
                    tags: vec![],
                },
                Record {
                    partition_key_index: 0,
                    explicit_hash_key_index: Some(0),
                    data: vec![0x00, b'"', 0xFF],
                    tags: vec![Tag { key: "env".into(), value: Some("prod".into()) }],
                },
            ],
        }
    }

// ## 1. Text format

    #[test]
    fn text_format_matches_protobuf_layout() {
        let expected = "\
partition_key_table: \"pk\"
explicit_hash_key_table: \"99\"
records {
  partition_key_index: 0
  data: \"hello\"
}
records {
  partition_key_index: 0
  explicit_hash_key_index: 0
  data: \"\\000\\\"\\377\"
  tags {
    key: \"env\"
    value: \"prod\"
  }
}
";
        assert_eq!(render_text(&sample()), expected);
    }

    #[test]
    fn empty_message_renders_empty() {
        assert_eq!(render_text(&AggregatedRecord::default()), "");
    }

    #[test]
    fn escape_rules() {
        assert_eq!(escape_bytes(b"a\nb\tc\\d'"), "a\\nb\\tc\\\\d\\'");
        assert_eq!(escape_bytes(&[0x01, 0x7f, 0x80]), "\\001\\177\\200");
    }

// ## 2. JSON

    #[test]
    fn json_has_base64_and_text() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["partition_key_table"][0], "pk");
        assert_eq!(value["records"][0]["data"]["base64"], "aGVsbG8=");
        assert_eq!(value["records"][0]["data"]["text"], "hello");
        // not UTF-8: base64 only
        assert!(value["records"][1]["data"].get("text").is_none());
        assert_eq!(value["records"][1]["explicit_hash_key_index"], 0);
        assert_eq!(value["records"][1]["tags"][0]["value"], "prod");
    }

// ## 3. User records and dispatch

    #[test]
    fn user_records_render() {
        let users = vec![
            UserRecord::new("pk", b"hello".to_vec()),
            UserRecord::new("pk", b"x".to_vec()).with_explicit_hash_key("99"),
        ];

        assert_eq!(render_user_records_text(&users), "pk\t\"hello\"\npk (99)\t\"x\"\n");

        let value: serde_json::Value = serde_json::from_str(&render_user_records_json(&users).unwrap()).unwrap();
        assert_eq!(value[1]["explicit_hash_key"], "99");
        assert_eq!(value[0]["data"]["text"], "hello");
    }

    #[test]
    fn validated_renders_user_records_when_present() {
        let mut validated = Validated {
            record: sample(),
            user_records: None,
            payload_len: 0,
            frame_len: 20,
        };
        assert_eq!(render_validated(&validated, OutputFormat::Text).unwrap(), render_text(&sample()));

        validated.user_records = Some(vec![UserRecord::new("pk", b"hello".to_vec())]);
        assert_eq!(render_validated(&validated, OutputFormat::Text).unwrap(), "pk\t\"hello\"\n");
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
