use alloc::{string::String, vec::Vec};

use super::read;
use crate::{Flags, JsonReader, ReaderOptions, Value, ValueKind};

#[test]
fn empty_object() {
    let (root, reader) = read(Flags::STRICT, "{}");
    assert_eq!(root.kind(), ValueKind::Object);
    assert_eq!(root.len(), 0);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(reader.warning_count(), 0);
}

#[test]
fn empty_array() {
    let (root, reader) = read(Flags::STRICT, "[]");
    assert_eq!(root.kind(), ValueKind::Array);
    assert_eq!(root.len(), 0);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(reader.warning_count(), 0);
}

#[test]
fn single_property() {
    let (root, reader) = read(Flags::STRICT, r#"{"a":1}"#);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.get("a").and_then(Value::as_i64), Some(1));
}

#[test]
fn nested_objects() {
    let (root, reader) = read(Flags::STRICT, r#"{"a":{"b":2}}"#);
    assert_eq!(reader.error_count(), 0);
    let inner = root.get("a").expect("a");
    assert!(inner.is_object());
    assert_eq!(inner.get("b").and_then(Value::as_i64), Some(2));
}

#[test]
fn arrays() {
    let (root, reader) = read(Flags::STRICT, "[1,[2,3],4]");
    assert_eq!(reader.error_count(), 0);
    let items = root.as_array().expect("array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_i64(), Some(1));
    let inner = items[1].as_array().expect("inner");
    assert_eq!(inner[0].as_i64(), Some(2));
    assert_eq!(inner[1].as_i64(), Some(3));
    assert_eq!(items[2].as_i64(), Some(4));
}

#[test]
fn literals() {
    let (root, reader) = read(Flags::STRICT, "[null, true, false]");
    assert_eq!(reader.error_count(), 0);
    let items = root.as_array().expect("array");
    assert!(items[0].is_null());
    assert_eq!(items[1].as_bool(), Some(true));
    assert_eq!(items[2].as_bool(), Some(false));
}

#[test]
fn whitespace_and_trailing_junk_around_the_root() {
    let (root, reader) = read(
        Flags::STRICT,
        "  \n  { \"a\" : 1, \"b\" : [true, false] }  trailing junk\n",
    );
    assert_eq!(reader.error_count(), 0);
    assert_eq!(reader.warning_count(), 0);
    assert_eq!(root.len(), 2);
    assert_eq!(root.get("a").and_then(Value::as_i64), Some(1));
    let b = root.get("b").and_then(Value::as_array).expect("b");
    assert_eq!(b.len(), 2);
    assert_eq!(b[0].as_bool(), Some(true));
    assert_eq!(b[1].as_bool(), Some(false));
}

#[test]
fn leading_junk_is_ignored() {
    let (root, reader) = read(Flags::STRICT, "not json at all [1]");
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.as_array().map(<[Value]>::len), Some(1));
}

#[test]
fn string_escapes() {
    let (root, reader) = read(Flags::STRICT, r#"{"k": "a\tb\"c\\d\/e\n"}"#);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.get("k").and_then(Value::as_str), Some("a\tb\"c\\d/e\n"));
}

#[test]
fn unicode_escape_is_utf8_encoded() {
    let (root, reader) = read(Flags::STRICT, "{ \"k\": \"\\u00E9\" }");
    assert_eq!(reader.error_count(), 0);
    let k = root.get("k").and_then(Value::as_str).expect("k");
    assert_eq!(k, "\u{e9}");
    assert_eq!(k.as_bytes(), [0xC3, 0xA9]);
}

#[test]
fn trailing_comma_is_silently_accepted() {
    let (root, reader) = read(Flags::STRICT, "[1,2,]");
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.len(), 2);

    let (root, reader) = read(Flags::STRICT, r#"{"a":1,}"#);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.len(), 1);
}

#[test]
fn duplicate_keys_last_write_wins() {
    let (root, reader) = read(Flags::STRICT, r#"{"k":1,"k":2}"#);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.len(), 1);
    assert_eq!(root.get("k").and_then(Value::as_i64), Some(2));
}

#[test]
fn value_lines_point_at_their_delimiters() {
    let text = "{\n  \"a\": \"x\",\n  \"b\": [1,\n        2]\n}";
    let (root, reader) = read(Flags::STRICT, text);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.line(), Some(1));
    assert_eq!(root.get("a").and_then(Value::line), Some(2));
    let b = root.get("b").expect("b");
    assert_eq!(b.line(), Some(3));
    let items = b.as_array().expect("array");
    assert_eq!(items[0].line(), Some(3));
    assert_eq!(items[1].line(), Some(4));
}

#[test]
fn crlf_and_lf_report_the_same_lines() {
    let lf = "{\n\"a\":\n1\n}";
    let crlf = "{\r\n\"a\":\r\n1\r\n}";
    let (root_lf, _) = read(Flags::STRICT, lf);
    let (root_crlf, _) = read(Flags::STRICT, crlf);
    assert_eq!(
        root_lf.get("a").and_then(Value::line),
        root_crlf.get("a").and_then(Value::line),
    );
}

#[test]
fn reused_root_of_same_kind_appends() {
    let mut reader = JsonReader::new(ReaderOptions::default());
    let mut root = Value::invalid();
    reader.parse_str("[1]", &mut root);
    reader.parse_str("[2]", &mut root);
    let items = root.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].as_i64(), Some(2));
}

#[test]
fn reused_root_of_other_kind_is_reset() {
    let mut reader = JsonReader::new(ReaderOptions::default());
    let mut root = Value::invalid();
    reader.parse_str("[1]", &mut root);
    reader.parse_str(r#"{"a":2}"#, &mut root);
    assert!(root.is_object());
    assert_eq!(root.len(), 1);
}

#[test]
fn parse_from_stream_and_checker_mode() {
    let doc: Vec<u8> = Vec::from(&br#"{"a": [1, 2]}"#[..]);
    let mut reader = JsonReader::new(ReaderOptions::default());
    let mut root = Value::invalid();
    assert_eq!(reader.parse(doc.as_slice(), &mut root), 0);
    assert_eq!(root.get("a").map(Value::len), Some(2));

    assert_eq!(reader.check(&b"[true]"[..]), 0);
    assert_eq!(reader.check(&b"[quotes]"[..]), 1);
}

#[test]
fn deep_nesting_tracks_depth() {
    let mut text = String::new();
    for _ in 0..10 {
        text.push('[');
    }
    for _ in 0..10 {
        text.push(']');
    }
    let (_, reader) = read(Flags::STRICT, &text);
    assert_eq!(reader.error_count(), 0);
    assert_eq!(reader.depth(), 10);
}
