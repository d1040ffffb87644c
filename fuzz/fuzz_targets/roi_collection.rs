//! Fuzz target for the collection reader.
//!
//! Splits the input into a few entries and reads them sequentially and in
//! parallel. Both paths must produce the same keys or the same failure.

#![no_main]

use ijroi::roi::{read_collection_with, CollectionOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 1024 * 1024 {
        return;
    }

    let parts = usize::from(data[0] % 4) + 1;
    let body = &data[1..];
    let chunk = (body.len() / parts).max(1);
    let entries: Vec<(String, Vec<u8>)> = body
        .chunks(chunk)
        .enumerate()
        .map(|(i, bytes)| {
            let mut bytes = bytes.to_vec();
            if bytes.len() >= 2 {
                bytes[0] = b'I';
                bytes[1] = b'o';
            }
            (format!("fuzz-{i}.roi"), bytes)
        })
        .collect();

    let use_names = data[0] & 0x80 == 0;
    let sequential = read_collection_with(
        &entries,
        &CollectionOptions {
            use_names,
            ..Default::default()
        },
    );
    let parallel = read_collection_with(
        &entries,
        &CollectionOptions {
            use_names,
            parallel: true,
            ..Default::default()
        },
    );

    match (sequential, parallel) {
        (Ok(a), Ok(b)) => assert!(a.keys().eq(b.keys())),
        (Err(a), Err(b)) => assert_eq!(a, b),
        (a, b) => panic!("sequential {a:?} disagrees with parallel {b:?}"),
    }
});
