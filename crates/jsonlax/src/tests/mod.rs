mod numbers;
mod parse_good;

use crate::{Flags, JsonReader, ReaderOptions, Value};

/// Parses `text` under `flags` and returns the tree plus the reader for
/// diagnostic inspection.
fn read(flags: Flags, text: &str) -> (Value, JsonReader) {
    let mut reader = JsonReader::new(ReaderOptions {
        flags,
        ..ReaderOptions::default()
    });
    let mut root = Value::invalid();
    reader.parse_str(text, &mut root);
    (root, reader)
}
