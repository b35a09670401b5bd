use super::read;
use crate::{Flags, Value, ValueKind};

#[test]
fn sign_driven_conversion_ladder() {
    let (root, reader) = read(
        Flags::STRICT,
        "[-9223372036854775808, 9223372036854775807, 9223372036854775808, \
         18446744073709551616, +1, -1]",
    );
    assert_eq!(reader.error_count(), 0);
    let items = root.as_array().expect("array");

    assert_eq!(items[0].as_i64(), Some(i64::MIN));
    assert_eq!(items[1].as_i64(), Some(i64::MAX));

    // One past i64::MAX falls through to the unsigned rung.
    assert_eq!(items[2].kind(), ValueKind::UnsignedInt);
    assert_eq!(items[2].as_u64(), Some(9_223_372_036_854_775_808));

    // One past u64::MAX falls through to the floating rung.
    assert_eq!(items[3].kind(), ValueKind::Double);
    assert_eq!(items[3].as_f64(), Some(18_446_744_073_709_551_616.0));

    // A leading '+' skips the signed rung entirely.
    assert_eq!(items[4].kind(), ValueKind::UnsignedInt);
    assert_eq!(items[4].as_u64(), Some(1));

    assert_eq!(items[5].as_i64(), Some(-1));
}

#[test]
fn plain_digits_prefer_signed() {
    let (root, _) = read(Flags::STRICT, "[0, 42, -0]");
    let items = root.as_array().expect("array");
    assert_eq!(items[0].kind(), ValueKind::SignedInt);
    assert_eq!(items[1].as_i64(), Some(42));
    assert_eq!(items[2].as_i64(), Some(0));
}

#[test]
fn fractions_and_exponents_become_doubles() {
    let (root, reader) = read(Flags::STRICT, "[1.5, -0.25, 1e3, 3.5e-2, +0.5]");
    assert_eq!(reader.error_count(), 0);
    let items = root.as_array().expect("array");
    for item in items {
        assert_eq!(item.kind(), ValueKind::Double);
    }
    assert_eq!(items[0].as_f64(), Some(1.5));
    assert_eq!(items[1].as_f64(), Some(-0.25));
    assert_eq!(items[2].as_f64(), Some(1000.0));
    assert_eq!(items[3].as_f64(), Some(0.035));
    assert_eq!(items[4].as_f64(), Some(0.5));
}

#[test]
fn malformed_numbers_are_incorrect_literals() {
    let (root, reader) = read(Flags::STRICT, "[1.2.3]");
    assert_eq!(reader.error_count(), 1);
    assert!(reader.errors()[0].contains("is incorrect"));
    assert_eq!(root.len(), 0);

    let (_, reader) = read(Flags::STRICT, "[--1]");
    assert_eq!(reader.error_count(), 1);

    let (_, reader) = read(Flags::STRICT, "[+]");
    assert_eq!(reader.error_count(), 1);
}

#[test]
fn numbers_terminate_on_any_delimiter() {
    let (root, reader) = read(Flags::STRICT, "{\"a\":1,\"b\":2}");
    assert_eq!(reader.error_count(), 0);
    assert_eq!(root.get("a").and_then(Value::as_i64), Some(1));
    assert_eq!(root.get("b").and_then(Value::as_i64), Some(2));

    let (root, _) = read(Flags::STRICT, "[1\t,2\n,3]");
    assert_eq!(root.len(), 3);
}
