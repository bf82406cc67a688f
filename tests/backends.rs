use log_json_serializer::{
    make_serializer_from_config, record, resolve, BackendKind, ConfigError, EncodeError, Key,
    OptionFlag, OptionFlags, SerializerConfig,
};
use rstest::rstest;

fn available() -> Vec<BackendKind> {
    BackendKind::ALL
        .into_iter()
        .filter(|kind| kind.is_available())
        .collect()
}

fn parse(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn should_round_trip_simple_record_on_every_backend() {
    for kind in available() {
        // given
        let serializer = make_serializer_from_config(&SerializerConfig::new(kind)).unwrap();

        // when
        let text = serializer.to_json(&record! { "a" => 1, "b" => "x" }).unwrap();

        // then
        assert_eq!(parse(&text), serde_json::json!({"a": 1, "b": "x"}), "{kind}");
    }
}

#[test]
fn should_pretty_print_with_two_spaces() {
    for kind in available() {
        // given
        let cfg = match kind {
            BackendKind::FastBinary => {
                SerializerConfig::new(kind).with_option(OptionFlag::Indent2)
            }
            _ => SerializerConfig::new(kind).with_pretty(true),
        };
        let serializer = make_serializer_from_config(&cfg).unwrap();

        // when
        let text = serializer
            .to_json(&record! { "a" => 1, "nested" => record! { "b" => true } })
            .unwrap();

        // then
        assert!(text.contains("\n  \"a\": 1"), "{kind}: {text}");
        assert!(text.contains("\n    \"b\": true"), "{kind}: {text}");
        assert!(!text.contains("\n   \"a\""), "{kind}: {text}");
    }
}

#[test]
fn should_stay_on_one_line_when_compact() {
    for kind in available() {
        // given
        let serializer = make_serializer_from_config(&SerializerConfig::new(kind)).unwrap();

        // when
        let text = serializer
            .to_json(&record! { "a" => 1, "list" => vec![1, 2, 3], "m" => record! { "k" => "v" } })
            .unwrap();

        // then
        assert_eq!(text, r#"{"a":1,"list":[1,2,3],"m":{"k":"v"}}"#, "{kind}");
    }
}

#[test]
fn should_ignore_development_mode_on_fast_binary() {
    if !BackendKind::FastBinary.is_available() {
        return;
    }

    // given
    let cfg = SerializerConfig::new(BackendKind::FastBinary).with_pretty(true);
    let serializer = make_serializer_from_config(&cfg).unwrap();

    // when
    let text = serializer.to_json(&record! { "a" => 1 }).unwrap();

    // then
    assert_eq!(text, r#"{"a":1}"#);
}

#[test]
fn should_sort_keys_only_on_fast_binary() {
    for kind in available() {
        // given
        let cfg = SerializerConfig::new(kind).with_option(OptionFlag::SortKeys);
        let serializer = make_serializer_from_config(&cfg).unwrap();

        // when
        let text = serializer
            .to_json(&record! { "zeta" => 1, "alpha" => 2, "mid" => 3 })
            .unwrap();

        // then
        let expected = match kind {
            BackendKind::FastBinary => r#"{"alpha":2,"mid":3,"zeta":1}"#,
            _ => r#"{"zeta":1,"alpha":2,"mid":3}"#,
        };
        assert_eq!(text, expected, "{kind}");
    }
}

#[rstest]
#[case::empty("")]
#[case::unknown("msgpack")]
#[case::typo("fastbinary")]
fn should_reject_unknown_backend_at_resolution(#[case] name: &str) {
    // when
    let result = resolve(name, &OptionFlags::new(), false, "utf-8");

    // then
    assert_eq!(
        result.err(),
        Some(ConfigError::UnknownBackend(name.to_string()))
    );
}

#[test]
fn should_fail_unavailable_backends_without_fallback() {
    for kind in BackendKind::ALL.into_iter().filter(|k| !k.is_available()) {
        // when
        let result = make_serializer_from_config(&SerializerConfig::new(kind));

        // then
        assert!(
            matches!(result, Err(ConfigError::BackendUnavailable { backend, .. }) if backend == kind),
            "{kind}"
        );
    }
}

#[test]
fn should_coerce_non_string_keys_only_with_option_on_fast_binary() {
    // given
    let rec = record! { 1 => "one", Key::Null => "nothing", "s" => "text" };

    for kind in available() {
        for non_str_keys in [false, true] {
            let mut cfg = SerializerConfig::new(kind);
            cfg.options.set(OptionFlag::NonStrKeys, non_str_keys);
            let serializer = make_serializer_from_config(&cfg).unwrap();

            // when
            let result = serializer.to_json(&rec);

            // then
            if kind == BackendKind::FastBinary && non_str_keys {
                assert_eq!(
                    result.unwrap(),
                    r#"{"1":"one","null":"nothing","s":"text"}"#
                );
            } else {
                assert!(
                    matches!(result, Err(EncodeError::Type { backend, .. }) if backend == kind),
                    "{kind} non_str_keys={non_str_keys}"
                );
            }
        }
    }
}

#[test]
fn should_not_carry_state_between_calls() {
    for kind in available() {
        // given
        let serializer = make_serializer_from_config(&SerializerConfig::new(kind)).unwrap();

        // when
        let first = serializer.to_json(&record! { "req" => 1, "user" => "ann" }).unwrap();
        let second = serializer.to_json(&record! { "req" => 2 }).unwrap();

        // then
        assert_eq!(parse(&first), serde_json::json!({"req": 1, "user": "ann"}));
        assert_eq!(parse(&second), serde_json::json!({"req": 2}));
    }
}

#[test]
fn should_keep_non_ascii_unescaped_everywhere() {
    for kind in available() {
        // given
        let serializer = make_serializer_from_config(&SerializerConfig::new(kind)).unwrap();

        // when
        let text = serializer.to_json(&record! { "msg" => "Grüße, 世界" }).unwrap();

        // then
        assert_eq!(text, r#"{"msg":"Grüße, 世界"}"#, "{kind}");
    }
}

#[cfg(feature = "fast-binary")]
mod fast_binary {
    use chrono::{DateTime, NaiveDate};
    use log_json_serializer::value::{NumArray, StructValue};
    use log_json_serializer::{record, resolve, EncodeError, OptionFlag, OptionFlags};

    fn flags(list: &[OptionFlag]) -> OptionFlags {
        list.iter().copied().collect()
    }

    #[test]
    fn should_format_datetimes_with_options() {
        // given
        let naive = NaiveDate::from_ymd_opt(2023, 11, 5)
            .and_then(|d| d.and_hms_micro_opt(8, 30, 0, 250))
            .unwrap();
        let aware = DateTime::parse_from_rfc3339("2023-11-05T08:30:00Z").unwrap();
        let rec = record! { "naive" => naive, "aware" => aware };

        // when
        let plain = resolve("fast-binary", &OptionFlags::new(), false, "utf-8")
            .unwrap()
            .to_json(&rec)
            .unwrap();
        let tuned = resolve(
            "fast-binary",
            &flags(&[
                OptionFlag::NaiveUtc,
                OptionFlag::OmitMicroseconds,
                OptionFlag::UtcZ,
            ]),
            false,
            "utf-8",
        )
        .unwrap()
        .to_json(&rec)
        .unwrap();

        // then
        assert_eq!(
            plain,
            r#"{"naive":"2023-11-05T08:30:00.000250","aware":"2023-11-05T08:30:00+00:00"}"#
        );
        assert_eq!(
            tuned,
            r#"{"naive":"2023-11-05T08:30:00Z","aware":"2023-11-05T08:30:00Z"}"#
        );
    }

    #[test]
    fn should_gate_numeric_arrays_behind_option() {
        // given
        let rec = record! { "v" => NumArray::vector(vec![0.5, 1.5]) };

        // when
        let without = resolve("fast-binary", &OptionFlags::new(), false, "utf-8")
            .unwrap()
            .to_json(&rec);
        let with = resolve(
            "fast-binary",
            &flags(&[OptionFlag::SerializeNumArray]),
            false,
            "utf-8",
        )
        .unwrap()
        .to_json(&rec);

        // then
        assert!(matches!(without, Err(EncodeError::Type { .. })));
        assert_eq!(with.unwrap(), r#"{"v":[0.5,1.5]}"#);
    }

    #[test]
    fn should_serialize_structs_unless_passed_through() {
        // given
        let rec = record! { "req" => StructValue::new("Request").field("path", "/").field("status", 200) };

        // when
        let native = resolve("fast-binary", &OptionFlags::new(), false, "utf-8")
            .unwrap()
            .to_json(&rec);
        let passthrough = resolve(
            "fast-binary",
            &flags(&[OptionFlag::PassthroughStruct]),
            false,
            "utf-8",
        )
        .unwrap()
        .to_json(&rec);

        // then
        assert_eq!(native.unwrap(), r#"{"req":{"path":"/","status":200}}"#);
        assert!(matches!(passthrough, Err(EncodeError::Type { .. })));
    }

    #[test]
    fn should_reject_wide_integers_under_strict_integer() {
        // given
        let rec = record! { "id" => 9_007_199_254_740_993_i64 };
        let serializer = resolve(
            "fast-binary",
            &flags(&[OptionFlag::StrictInteger]),
            false,
            "utf-8",
        )
        .unwrap();

        // when
        let result = serializer.to_json(&rec);

        // then
        assert!(matches!(result, Err(EncodeError::Type { .. })));
    }

    #[test]
    fn should_append_newline_when_asked() {
        // given
        let serializer = resolve(
            "fast-binary",
            &flags(&[OptionFlag::AppendNewline]),
            false,
            "utf-8",
        )
        .unwrap();

        // when
        let text = serializer.to_json(&record! { "a" => 1 }).unwrap();

        // then
        assert_eq!(text, "{\"a\":1}\n");
    }

    #[test]
    fn should_decode_with_latin1() {
        // given
        let serializer = resolve("fast-binary", &OptionFlags::new(), false, "latin-1").unwrap();

        // when
        let text = serializer.to_json(&record! { "k" => "é" }).unwrap();

        // then
        assert_eq!(text, "{\"k\":\"Ã©\"}");
    }
}
