//! Fuzzing entry points for tdlpack-core
//!
//! Each function takes arbitrary bytes and must never panic. They are meant
//! to be called from a cargo-fuzz target, e.g. `fuzz_target!(|data| fuzz_open(data))`.

use std::io::Cursor;
use tdlpack_core::{classifier::classify, Query, ReaderConfig, TdlpackReader};

/// Index a byte stream and, if it indexes, read every record
pub fn fuzz_open(data: &[u8]) {
    let Ok(mut reader) = TdlpackReader::from_reader(Cursor::new(data)) else {
        return;
    };

    for _record in reader.iter() {}

    let dates = reader.dates().to_vec();
    for date in dates {
        let _ = reader.fetch(&Query::new().date(date));
    }
}

/// Classify a frame's leading bytes, claiming the input length as frame length
pub fn fuzz_classify(data: &[u8]) {
    let _ = classify(data, data.len() as u32);
}

/// Index with a small frame limit so oversized markers are rejected early
pub fn fuzz_index_limited(data: &[u8]) {
    let config = ReaderConfig::new().max_frame_len(4096);
    let _ = tdlpack_core::index::build_index(&mut Cursor::new(data), &config);
}
