//! Bounded-memory chunked byte source.

use lazyjson::source::ChunkIterSource;
use lazyjson::{Buffering, Element, LoadOptions, Loaded, TokenizerOptions, Value, load, to_standard_types};

fn chunks_of(data: &[u8], size: usize) -> impl Iterator<Item = std::io::Result<Vec<u8>>> {
    data.chunks(size).map(|c| Ok(c.to_vec())).collect::<Vec<_>>().into_iter()
}

#[test]
fn fifteen_byte_chunks_yield_three_materialised_tasks() {
    let input = br#"{"tasks":[{"id":1,"title":"task1"},{"id":2,"title":"task2"},{"id":3,"title":"task3"}]}"#;
    let source = ChunkIterSource::new(chunks_of(input, 15));
    let options = LoadOptions {
        tokenizer: TokenizerOptions {
            buffering: Buffering::Blocks(15),
            ..TokenizerOptions::default()
        },
        ..LoadOptions::default()
    };
    let root = match load(source, options).unwrap() {
        Loaded::Object(c) => c,
        _ => panic!("expected an object root"),
    };
    let tasks = match root.get_key("tasks").unwrap() {
        Element::Array(c) => c,
        _ => panic!("expected an array"),
    };
    let mut ids = Vec::new();
    for element in tasks.iter().unwrap() {
        let task = match element.unwrap() {
            Element::Object(c) => to_standard_types(Loaded::Object(c)).unwrap(),
            _ => panic!("expected an object task"),
        };
        let obj = task.as_object().unwrap();
        ids.push(obj["id"].clone());
        assert!(obj["title"].as_str().unwrap().starts_with("task"));
    }
    assert_eq!(ids.len(), 3);
}

#[test]
fn single_character_buffering_still_decodes_correctly() {
    let options = LoadOptions {
        tokenizer: TokenizerOptions {
            buffering: Buffering::SingleCharacter,
            ..TokenizerOptions::default()
        },
        ..LoadOptions::default()
    };
    let loaded = load(br#"{"a": "béc"}"#.as_slice(), options).unwrap();
    let value = to_standard_types(loaded).unwrap();
    assert_eq!(value.as_object().unwrap()["a"].as_str(), Some("b\u{e9}c"));
}

#[test]
fn strings_as_streams_reads_incrementally() {
    let options = LoadOptions {
        tokenizer: TokenizerOptions {
            strings_as_streams: true,
            ..TokenizerOptions::default()
        },
        ..LoadOptions::default()
    };
    let loaded = load(br#"["hello world"]"#.as_slice(), options).unwrap();
    let arr = match loaded {
        Loaded::Array(c) => c,
        _ => panic!("expected an array root"),
    };
    let mut iter = arr.iter().unwrap();
    let element = iter.next().unwrap().unwrap();
    let mut reader = match element {
        Element::Reader(r) => r,
        _ => panic!("expected a streamed string reader"),
    };
    let mut collected = String::new();
    loop {
        let chunk = reader.read(4).unwrap();
        if chunk.is_empty() && reader.complete() {
            break;
        }
        collected.push_str(&chunk);
        if reader.complete() {
            break;
        }
    }
    assert_eq!(collected, "hello world");
    assert!(iter.next().is_none());
}

#[test]
fn residual_chunk_spans_multiple_reads_without_data_loss() {
    let input = b"[1, 2, 3, 4, 5]";
    let source = ChunkIterSource::new(chunks_of(input, 3));
    let loaded = load(source, LoadOptions::default()).unwrap();
    let value = to_standard_types(loaded).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 5);
}
