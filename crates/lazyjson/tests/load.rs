//! Black-box tests of [`lazyjson::load`] against a reference parser and the
//! documented error surface.

use lazyjson::{Error, LoadOptions, Loaded, SyntaxErrorKind, load, to_standard_types};

fn materialize_str(input: &str) -> lazyjson::Value {
    let loaded = load(input.as_bytes(), LoadOptions::default()).unwrap();
    to_standard_types(loaded).unwrap()
}

#[test]
fn scalar_root_matches_reference_parser() {
    for input in ["null", "true", "false", "0", "-17", "3.25", "1e10", "\"hi\""] {
        let ours = materialize_str(input);
        let reference: serde_json::Value = serde_json::from_str(input).unwrap();
        assert_eq!(ours.is_null(), reference.is_null());
        assert_eq!(ours.is_bool(), reference.is_boolean());
        assert_eq!(ours.is_number(), reference.is_number());
        assert_eq!(ours.is_string(), reference.is_string());
        if let Some(s) = reference.as_str() {
            assert_eq!(ours.as_str(), Some(s));
        }
    }
}

#[test]
fn object_and_array_roots_materialize_like_serde_json() {
    let input = r#"{"count": 3, "results": ["a", "b", "c"]}"#;
    let ours = materialize_str(input);
    let obj = ours.as_object().unwrap();
    assert_eq!(obj["count"].as_str(), None);
    let results = obj["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_str(), Some("a"));
}

#[test]
fn big_integer_round_trips_exactly() {
    let loaded = load(b"123456789012345678901234567890".as_slice(), LoadOptions::default()).unwrap();
    let value = to_standard_types(loaded).unwrap();
    let n = match value {
        lazyjson::Value::Number(n) => n,
        _ => panic!("expected a number"),
    };
    assert_eq!(n.as_bigint().unwrap().to_string(), "123456789012345678901234567890");
}

#[test]
fn trailing_data_after_scalar_is_rejected() {
    let err = load(b"42 43".as_slice(), LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::TrailingData,
            ..
        }
    ));
}

#[test]
fn leading_zero_is_rejected() {
    let err = load(b"01".as_slice(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Syntax { kind: SyntaxErrorKind::InvalidNumber(_), .. }));
}

#[test]
fn truncated_fraction_is_rejected() {
    let err = load(b"1.".as_slice(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Syntax { kind: SyntaxErrorKind::InvalidNumber(_), .. }));
}

#[test]
fn number_immediately_followed_by_string_is_rejected() {
    let err = load(br#""a"5"#.as_slice(), LoadOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
}

#[test]
fn empty_containers_materialize_as_empty() {
    let arr = materialize_str("[]");
    assert_eq!(arr.as_array().unwrap().len(), 0);
    let obj = materialize_str("{}");
    assert_eq!(obj.as_object().unwrap().len(), 0);
}

#[test]
fn surrogate_pair_decodes_to_one_character() {
    let value = materialize_str("\"\\ud834\\udd1e\"");
    assert_eq!(value.as_str(), Some("\u{1D11E}"));
}

#[test]
fn unpaired_surrogate_is_rejected() {
    let err = load(br#""\ud834""#.as_slice(), LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::UnpairedSurrogate,
            ..
        }
    ));
}

#[test]
fn second_surrogate_half_not_a_surrogate_is_rejected() {
    let err = load(br#""\ud834\u00c4""#.as_slice(), LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            kind: SyntaxErrorKind::NotASurrogate,
            ..
        }
    ));
}

#[test]
fn loaded_as_container_distinguishes_scalar_root() {
    let loaded = load(b"42".as_slice(), LoadOptions::default()).unwrap();
    assert!(loaded.as_container().is_none());
    let loaded = load(b"[1]".as_slice(), LoadOptions::default()).unwrap();
    assert!(matches!(loaded, Loaded::Array(_)));
    assert!(loaded.as_container().is_some());
}
