//! Binary magnitude suffixes for integer sizes
//!
//! Sizes are written with a trailing letter denoting a power of 1024:
//! `4k` is 4096, `1m` is 1048576, and so on. Parsing is strict and
//! case-sensitive; rendering truncates, so it is display-only and never
//! feeds back into filtering or sorting.

use crate::error::ParseIssue;

/// Suffix letters, indexed by their power of 1024.
const SUFFIXES: [&str; 5] = ["", "k", "m", "g", "t"];

/// Parse an integer with an optional binary magnitude suffix.
///
/// Leading ASCII digits are consumed; the remainder must be exactly one
/// of the recognized suffixes or the empty string.
///
/// # Examples
///
/// ```
/// use chaincalc::suffix::from_suffix;
///
/// assert_eq!(from_suffix("4k").unwrap(), 4096);
/// assert_eq!(from_suffix("1m").unwrap(), 1048576);
/// assert!(from_suffix("3x").is_err());
/// ```
pub fn from_suffix(s: &str) -> std::result::Result<u64, ParseIssue> {
    let digits_end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, rest) = s.split_at(digits_end);

    if digits.is_empty() {
        return Err(ParseIssue::EmptyInteger);
    }
    let base: u64 = digits.parse().map_err(|_| ParseIssue::Overflow)?;

    let index = SUFFIXES
        .iter()
        .position(|&suffix| suffix == rest)
        .ok_or(ParseIssue::BadSuffix)?;

    base.checked_mul(1024u64.pow(index as u32))
        .ok_or(ParseIssue::Overflow)
}

/// Render a value with the largest suffix that keeps it readable.
///
/// Divides by 1024 while the value is at least 10k, so the rendered
/// number always keeps two significant figures or more.
pub fn to_suffix(value: u64) -> String {
    let mut value = value;
    let mut index = 0;
    while value >= 10 * 1024 && index + 1 < SUFFIXES.len() {
        value /= 1024;
        index += 1;
    }
    format!("{}{}", value, SUFFIXES[index])
}
