//! `load_many` over NDJSON / concatenated-JSON sources.

use lazyjson::{LoadOptions, Loaded, Persistence, Value, load_many, to_standard_types};

#[test]
fn whitespace_separated_documents_yield_in_order() {
    let input = b"{\"a\": 1}\n[1, 2]\n3\ntrue\nnull\n\"x\"\n{}\n[]";
    let options = LoadOptions {
        persistence: Persistence::Persistent,
        ..LoadOptions::default()
    };
    let values: Vec<Value> = load_many(input.as_slice(), options)
        .map(|r| to_standard_types(r.unwrap()).unwrap())
        .collect();
    assert_eq!(values.len(), 8);
    assert_eq!(values[0].as_object().unwrap()["a"].as_str(), None);
    assert_eq!(values[1].as_array().unwrap().len(), 2);
    assert!(values[3].is_bool());
    assert!(values[4].is_null());
    assert_eq!(values[5].as_str(), Some("x"));
    assert_eq!(values[6].as_object().unwrap().len(), 0);
    assert_eq!(values[7].as_array().unwrap().len(), 0);
}

#[test]
fn abandoning_a_container_value_still_advances_to_the_next_document() {
    let input = b"[1, 2, 3]\n[4, 5]";
    let mut iter = load_many(input.as_slice(), LoadOptions::default());
    let first = iter.next().unwrap().unwrap();
    assert!(matches!(first, Loaded::Array(_)));
    // First array is never touched; load_many must drain it before handing
    // back the second document.
    let second = iter.next().unwrap().unwrap();
    let value = to_standard_types(second).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert!(iter.next().is_none());
}

#[test]
fn compact_back_to_back_numbers_need_a_delimiter() {
    // `3true` has no separating whitespace; the tokenizer requires a
    // delimiter after a number, so this is a lexical error rather than two
    // documents. Documented as a known limitation.
    let input = b"3true";
    let mut iter = load_many(input.as_slice(), LoadOptions::default());
    let first = iter.next().unwrap();
    assert!(first.is_err());
}

#[test]
fn trailing_whitespace_after_the_last_value_is_fine() {
    let input = b"1 2 3   \n\t";
    let values: Vec<_> = load_many(input.as_slice(), LoadOptions::default()).map(Result::unwrap).collect();
    assert_eq!(values.len(), 3);
}
