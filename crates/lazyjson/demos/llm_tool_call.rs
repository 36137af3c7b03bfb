//! Demonstrates reacting to a moderation verdict as soon as it arrives,
//! while a sibling `code` field is still streaming in behind it: the kind of
//! document an LLM tool-call response delivers one network chunk at a time.
//!
//! The payload (abridged):
//!
//! ```text
//! {
//!   "moderation": { "decision": "allow" | "block", "reason": string | null },
//!   "filename": string,
//!   "language": string,
//!   "code": string
//! }
//! ```
//!
//! `moderation` always arrives first, so by the time we reach `code` we
//! already know whether to keep going. The document is fed through
//! [`ChunkIterSource`] in small, irregular pieces to mirror a real network
//! stream; `code` is read back as a [`StringReader`] so its fragments print
//! as they decode rather than only once the whole document has landed.
//!
//! Run with
//!
//! ```bash
//! cargo run -p lazyjson --example llm_tool_call
//! ```

use std::io;

use lazyjson::source::ChunkIterSource;
use lazyjson::{Element, LoadOptions, Loaded, Persistence, TokenizerOptions, Value, load};

fn main() {
    let simulated_stream: [&str; 10] = [
        r#"{"moderation":{"decision":"al"#,
        r#"lo"#,
        r#"w","reason":null},"#,
        r#""filename":"example.rs","#,
        r#""language":"rust","#,
        r#""code":"use lazyjson::load; "#,
        r#"fn main() {\n"#,
        r#"    let _ = load(&b\"[]\"[..], Default::default());\n"#,
        r#"    println!(\"hello from lazyjson\");\n}\n"#,
        r#""}"#,
    ];

    let chunks = simulated_stream.into_iter().map(|s| Ok::<_, io::Error>(s.as_bytes().to_vec()));
    let source = ChunkIterSource::new(chunks);

    let options = LoadOptions {
        tokenizer: TokenizerOptions {
            strings_as_streams: true,
            ..TokenizerOptions::default()
        },
        persistence: Persistence::Transient,
    };

    let root = match load(source, options) {
        Ok(Loaded::Object(c)) => c,
        Ok(_) => {
            eprintln!("expected an object document");
            return;
        }
        Err(e) => {
            eprintln!("parse error: {e}");
            return;
        }
    };

    for entry in root.entries().expect("transient root is only ever iterated once") {
        let (key, element) = entry.expect("well-formed document");
        match (key.as_str(), element) {
            ("moderation", Element::Object(moderation)) => {
                for entry in moderation.entries().expect("fresh nested object") {
                    let (key, element) = entry.expect("well-formed moderation object");
                    if key == "decision" {
                        let Element::Scalar(Value::String(decision)) = element else {
                            panic!("decision is always a string");
                        };
                        if decision == "block" {
                            eprintln!("moderation blocked the content, aborting");
                            return;
                        }
                        println!("moderation decision: {decision}");
                    }
                }
            }
            ("code", Element::Reader(mut reader)) => {
                print!("code: ");
                while !reader.complete() {
                    let fragment = reader.read(16).expect("well-formed string body");
                    print!("{fragment}");
                }
                println!();
            }
            (_, Element::Scalar(_)) => {}
            (_, Element::Reader(mut reader)) => {
                reader.read_to_string().expect("well-formed string body");
            }
            _ => {}
        }
    }
}
