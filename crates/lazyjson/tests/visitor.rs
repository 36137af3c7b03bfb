//! Black-box tests of [`lazyjson::visitor::visit`].

use lazyjson::visitor::{PathSegment, Visited, visit};
use lazyjson::{LoadOptions, load};

#[test]
fn reconstructs_document_shape_from_visited_paths() {
    let input = r#"{"a": [1, {"b": 2}], "c": [], "d": {}}"#;
    let loaded = load(input.as_bytes(), LoadOptions::default()).unwrap();

    let mut scalars = 0;
    let mut empties = 0;
    visit(loaded, |_path, visited| {
        match visited {
            Visited::Scalar(_) => scalars += 1,
            Visited::EmptyArray | Visited::EmptyObject => empties += 1,
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(scalars, 2);
    assert_eq!(empties, 2);
}

#[test]
fn paths_use_keys_for_objects_and_indices_for_arrays() {
    let loaded = load(br#"[10, 20]"#.as_slice(), LoadOptions::default()).unwrap();
    let mut paths = Vec::new();
    visit(loaded, |path, _| {
        paths.push(path.to_vec());
        Ok(())
    })
    .unwrap();
    assert_eq!(paths, vec![vec![PathSegment::Index(0)], vec![PathSegment::Index(1)]]);
}

#[test]
fn scalar_root_visits_once_with_an_empty_path() {
    let loaded = load(b"42".as_slice(), LoadOptions::default()).unwrap();
    let mut calls = 0;
    visit(loaded, |path, _| {
        calls += 1;
        assert!(path.is_empty());
        Ok(())
    })
    .unwrap();
    assert_eq!(calls, 1);
}

#[test]
fn callback_error_propagates_out_of_visit() {
    let loaded = load(br#"[1, 2]"#.as_slice(), LoadOptions::default()).unwrap();
    let err = visit(loaded, |_path, _| Err(lazyjson::Error::AlreadyStarted)).unwrap_err();
    assert!(matches!(err, lazyjson::Error::AlreadyStarted));
}
