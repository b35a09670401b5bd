//! Decimal conversion of unquoted numeric tokens.
//!
//! The integer routines are decimal-only and bounded by a lexicographic
//! check against the decimal expansion of `u64::MAX`, with sign-aware caps:
//! a negative literal may reach `-2^63`, a positive signed literal `2^63-1`,
//! an unsigned literal `2^64-1`. Floating conversion is ordinary
//! `str::parse::<f64>`.

const U64_MAX_DECIMAL: &[u8] = b"18446744073709551615";

/// Splits off an optional sign and accumulates the magnitude.
///
/// Returns `None` for an empty digit run, a non-digit byte, or a magnitude
/// beyond `u64::MAX`. Equal-length byte slices of ASCII digits order the
/// same lexicographically as numerically, which is what makes the cap check
/// a plain slice comparison.
fn decimal_magnitude(s: &str) -> Option<(u64, bool)> {
    let bytes = s.as_bytes();
    let (negative, digits) = match bytes.split_first()? {
        (b'-', rest) => (true, rest),
        (b'+', rest) => (false, rest),
        _ => (false, bytes),
    };
    if digits.is_empty()
        || digits.len() > U64_MAX_DECIMAL.len()
        || !digits.iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    if digits.len() == U64_MAX_DECIMAL.len() && digits > U64_MAX_DECIMAL {
        return None;
    }
    let mut magnitude: u64 = 0;
    for &d in digits {
        magnitude = magnitude * 10 + u64::from(d - b'0');
    }
    Some((magnitude, negative))
}

pub(crate) fn to_signed(s: &str) -> Option<i64> {
    let (magnitude, negative) = decimal_magnitude(s)?;
    if negative {
        (magnitude <= i64::MAX as u64 + 1).then(|| magnitude.wrapping_neg() as i64)
    } else {
        (magnitude <= i64::MAX as u64).then_some(magnitude as i64)
    }
}

pub(crate) fn to_unsigned(s: &str) -> Option<u64> {
    let (magnitude, negative) = decimal_magnitude(s)?;
    (!negative).then_some(magnitude)
}

pub(crate) fn to_double(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}
