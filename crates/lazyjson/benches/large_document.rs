//! Large-document, bounded-memory benchmark: parse a document far bigger
//! than any single retained buffer, pulling it through transient containers
//! so peak memory stays flat as the document grows.

use criterion::{Criterion, criterion_group, criterion_main};
use lazyjson::{Element, LoadOptions, Loaded, load};
use std::hint::black_box;

fn large_document(task_count: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"{\"tasks\":[");
    for i in 0..task_count {
        if i > 0 {
            out.push(b',');
        }
        out.extend_from_slice(format!(r#"{{"id":{i},"title":"task{i}","done":false}}"#).as_bytes());
    }
    out.extend_from_slice(b"]}");
    out
}

fn bench_transient_scan(c: &mut Criterion) {
    let doc = large_document(50_000);
    c.bench_function("transient_scan_50k_tasks", |b| {
        b.iter(|| {
            let root = match load(doc.as_slice(), LoadOptions::default()).unwrap() {
                Loaded::Object(c) => c,
                _ => unreachable!(),
            };
            let tasks = match root.get_key("tasks").unwrap() {
                Element::Array(c) => c,
                _ => unreachable!(),
            };
            let mut count = 0usize;
            for element in tasks.iter().unwrap() {
                black_box(element.unwrap());
                count += 1;
            }
            black_box(count)
        });
    });
}

criterion_group!(benches, bench_transient_scan);
criterion_main!(benches);
