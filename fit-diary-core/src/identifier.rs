//! Numeric identifiers inside composite item ids.
//!
//! Search results mix sources, so an item id may be prefixed with the name of
//! the table it came from (`taco_66`). The remote unit and conversion
//! endpoints only accept the trailing number.

/// Extracts the positive integer at the end of a possibly-prefixed id.
///
/// Returns `None` for anything that does not yield a positive integer:
/// `"taco_66"` is `Some(66)`, while `"abc"`, `"0"` and `"-5"` are `None`.
pub fn extract_numeric_id(raw: &str) -> Option<u64> {
    let segment = match raw.rsplit_once('_') {
        Some((_, tail)) => tail,
        None => raw,
    };

    parse_leading_int(segment)
        .filter(|n| *n > 0)
        .map(|n| n as u64)
}

/// Parses an optionally signed run of leading digits, ignoring leading
/// whitespace and anything after the digits (`"12abc"` is 12).
pub(crate) fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
