// Pipeline tests: base64 → frame → AggregatedRecord, one test per failure kind.

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    use kpl_core::config::ValidateConfig;
    use kpl_core::constants::KPL_MAGIC;
    use kpl_core::framing::{encode_frame, FrameError, FrameFormat};
    use kpl_core::record::{Aggregator, UserRecord};
    use kpl_core::telemetry::Stage;
    use kpl_core::types::ValidateError;
    use kpl_core::validate::{decode_base64, Validator};

    fn sample_frame() -> Vec<u8> {
        let mut aggregator = Aggregator::default();
        aggregator.try_push(UserRecord::new("user-7", b"{\"clicks\":3}".to_vec()));
        aggregator.try_push(UserRecord::new("user-9", b"{\"clicks\":1}".to_vec()));
        aggregator.take().unwrap()
    }

    fn validator() -> Validator {
        Validator::new(&ValidateConfig::default()).unwrap()
    }

// ## 1. Success

    #[test]
    fn valid_base64_record_decodes() {
        let mut v = validator();
        let text = STANDARD.encode(sample_frame());

        let validated = v.validate(&text).unwrap();
        assert_eq!(validated.record.partition_key_table, vec!["user-7", "user-9"]);
        assert_eq!(validated.record.records.len(), 2);
        assert_eq!(validated.frame_len, sample_frame().len());
        assert_eq!(validated.payload_len, validated.frame_len - 20);
        assert!(validated.user_records.is_none());

        assert_eq!(v.counters().frames_ok, 1);
        assert_eq!(v.counters().user_records, 2);
        assert_eq!(v.counters().bytes_overhead, 20);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let mut v = validator();
        let text = format!("  {}\n", STANDARD.encode(sample_frame()));
        assert!(v.validate(&text).is_ok());
    }

    #[test]
    fn deaggregate_config_resolves_user_records() {
        let config = ValidateConfig { deaggregate: true, ..ValidateConfig::default() };
        let mut v = Validator::new(&config).unwrap();

        let validated = v.validate_bytes(&sample_frame()).unwrap();
        let users = validated.user_records.unwrap();
        assert_eq!(users[0], UserRecord::new("user-7", b"{\"clicks\":3}".to_vec()));
        assert_eq!(users[1].partition_key, "user-9");
    }

    #[test]
    fn empty_aggregate_is_valid() {
        let mut v = validator();
        let frame = encode_frame(b"", &FrameFormat::kpl());
        let validated = v.validate_bytes(&frame).unwrap();
        assert!(validated.record.records.is_empty());
    }

// ## 2. Each failure kind is distinct

    #[test]
    fn invalid_base64_is_invalid_encoding() {
        let mut v = validator();
        let err = v.validate("this is not base64!").unwrap_err();
        assert!(matches!(err, ValidateError::InvalidEncoding(_)));
        assert_eq!(err.kind(), "invalid_encoding");
        assert_eq!(v.counters().inputs_invalid_encoding, 1);
    }

    #[test]
    fn short_input_is_malformed_frame() {
        let mut v = validator();
        let err = v.validate(&STANDARD.encode(b"tiny")).unwrap_err();
        assert!(matches!(err.as_frame(), Some(FrameError::MalformedFrame { len: 4, min: 20 })));
        assert_eq!(err.kind(), "malformed_frame");
        assert_eq!(v.counters().frames_malformed, 1);
    }

    #[test]
    fn plain_record_is_bad_magic() {
        let mut v = validator();
        let err = v.validate(&STANDARD.encode(b"a plain, non-aggregated kinesis record")).unwrap_err();
        assert_eq!(err.kind(), "bad_magic");
        assert_eq!(v.counters().frames_bad_magic, 1);
    }

    #[test]
    fn corrupted_payload_is_checksum_mismatch() {
        let mut v = validator();
        let mut frame = sample_frame();
        frame[10] ^= 0x01;

        let err = v.validate_bytes(&frame).unwrap_err();
        assert_eq!(err.kind(), "checksum_mismatch");
        assert_eq!(v.counters().frames_checksum_mismatch, 1);
    }

    #[test]
    fn valid_envelope_with_garbage_payload_is_deserialization_error() {
        let mut v = validator();
        // field 3, length-delimited, claims 5 bytes but carries 1
        let frame = encode_frame(&[0x1A, 0x05, 0x01], &FrameFormat::kpl());

        let err = v.validate_bytes(&frame).unwrap_err();
        assert!(matches!(err, ValidateError::Deserialization(_)));
        assert_eq!(err.kind(), "deserialization_error");
        assert_eq!(v.counters().payloads_undecodable, 1);
        assert_eq!(v.counters().frames_checksum_mismatch, 0);
    }

    #[test]
    fn dangling_key_index_is_invalid_record() {
        use kpl_core::record::{AggregatedRecord, Record};
        use prost::Message;

        let aggregated = AggregatedRecord {
            partition_key_table: vec![],
            explicit_hash_key_table: vec![],
            records: vec![Record {
                partition_key_index: 5,
                explicit_hash_key_index: None,
                data: b"x".to_vec(),
                tags: vec![],
            }],
        };
        let frame = encode_frame(&aggregated.encode_to_vec(), &FrameFormat::kpl());

        let config = ValidateConfig { deaggregate: true, ..ValidateConfig::default() };
        let mut v = Validator::new(&config).unwrap();
        let err = v.validate_bytes(&frame).unwrap_err();
        assert_eq!(err.kind(), "invalid_record");

        // Without de-aggregation the message itself is still well formed.
        assert!(validator().validate_bytes(&frame).is_ok());
    }

    #[test]
    fn oversized_input_is_rejected_before_framing() {
        let config = ValidateConfig { max_frame_bytes: Some(16), ..ValidateConfig::default() };
        let mut v = Validator::new(&config).unwrap();

        let err = v.validate_bytes(&sample_frame()).unwrap_err();
        assert!(matches!(err, ValidateError::TooLarge { max: 16, .. }));
        assert_eq!(v.counters().inputs_too_large, 1);
    }

// ## 3. Configured formats

    #[test]
    fn custom_magic_from_config() {
        let config = ValidateConfig { magic: "0xCAFE".into(), ..ValidateConfig::default() };
        let mut v = Validator::new(&config).unwrap();

        let frame = encode_frame(b"", &FrameFormat::new(vec![0xCA, 0xFE], v.format().digest));
        assert!(v.validate_bytes(&frame).is_ok());

        let kpl = encode_frame(b"", &FrameFormat::kpl());
        assert_eq!(v.validate_bytes(&kpl).unwrap_err().kind(), "bad_magic");
    }

    #[test]
    fn invalid_magic_hex_is_config_error() {
        let config = ValidateConfig { magic: "xyz".into(), ..ValidateConfig::default() };
        assert!(matches!(Validator::new(&config), Err(ValidateError::Config(_))));
    }

// ## 4. Determinism and telemetry

    #[test]
    fn same_input_same_result() {
        let mut v = validator();
        let mut frame = sample_frame();
        frame[0] = 0;

        let a = v.validate_bytes(&frame).unwrap_err().to_string();
        let b = v.validate_bytes(&frame).unwrap_err().to_string();
        assert_eq!(a, b);

        let ok = sample_frame();
        assert_eq!(v.validate_bytes(&ok).unwrap(), v.validate_bytes(&ok).unwrap());
    }

    #[test]
    fn counters_track_mixed_run() {
        let mut v = validator();
        let good = STANDARD.encode(sample_frame());

        let _ = v.validate(&good);
        let _ = v.validate("%%%");
        let _ = v.validate(&STANDARD.encode(KPL_MAGIC));
        let _ = v.validate(&good);

        let c = v.counters();
        assert_eq!(c.frames_ok, 2);
        assert_eq!(c.failures(), 2);
        assert_eq!(c.total_inputs(), 4);
        assert!(v.timer().stage_times.iter().any(|(stage, _)| *stage == Stage::Base64));
        assert!(v.timer().stage_times.iter().any(|(stage, _)| *stage == Stage::Frame));
    }

    #[test]
    fn failed_render_counts_as_failure() {
        let mut v = validator();
        let text = STANDARD.encode(sample_frame());

        let err = v
            .validate_and_render(&text, |_| Err::<String, _>(ValidateError::Config("no renderer".into())))
            .unwrap_err();
        assert_eq!(err.kind(), "config");
        assert_eq!(v.counters().frames_ok, 0);
        assert_eq!(v.counters().other_failures, 1);

        let records = v
            .validate_and_render(&text, |validated| Ok(validated.record.records.len()))
            .unwrap();
        assert_eq!(records, 2);
        assert_eq!(v.counters().frames_ok, 1);
        assert_eq!(v.counters().total_inputs(), 2);
        assert!(v.timer().stage_times.iter().any(|(stage, _)| *stage == Stage::Render));
    }

    #[test]
    fn failed_validation_skips_render() {
        let mut v = validator();
        let mut called = false;

        let err = v
            .validate_and_render("%%%", |_| {
                called = true;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_encoding");
        assert!(!called);
        assert_eq!(v.counters().inputs_invalid_encoding, 1);
    }

    #[test]
    fn decode_base64_standalone() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
        assert!(decode_base64("aGVsbG8").is_err());
    }
}
