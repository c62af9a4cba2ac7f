//! Cursor wire format
//!
//! `"<d1>_<d2>_..._<dN>,<index>,<nativeToken>"`, ASCII only. The native
//! token is percent-escaped so it can never contain a bare `_` or `,`.
//! Clients hold these strings across releases; the format must not drift.

use super::types::{BucketCursor, DayBucketSet, DAY_KEY_FORMAT};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for the outer cursor shape: dates, canonical index, escaped token
static CURSOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{8}(?:_[0-9]{8})*),(0|[1-9][0-9]*),(.*)$").unwrap());

const DAY_SEPARATOR: char = '_';
const FIELD_SEPARATOR: char = ',';

/// Serialize a cursor for the caller
pub fn encode(cursor: &BucketCursor) -> String {
    let days = cursor.buckets().as_slice().join("_");
    format!(
        "{days}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
        cursor.current_bucket_index(),
        escape_token(cursor.native_token())
    )
}

/// Parse a caller-held cursor for a window of `window_len` buckets
///
/// Returns `None` for blank input or anything that does not match the wire
/// format exactly. Callers treat that as "no cursor".
pub fn decode(raw: &str, window_len: usize) -> Option<BucketCursor> {
    let captures = CURSOR_REGEX.captures(raw)?;

    let days: Vec<String> = captures[1]
        .split(DAY_SEPARATOR)
        .map(str::to_string)
        .collect();
    if days.len() != window_len {
        return None;
    }
    if !days
        .iter()
        .all(|d| NaiveDate::parse_from_str(d, DAY_KEY_FORMAT).is_ok())
    {
        return None;
    }

    let index: usize = captures[2].parse().ok()?;
    let token = unescape_token(&captures[3])?;

    BucketCursor::new(DayBucketSet::new(days), index, token)
}

/// Percent-escape a native token
///
/// `%`, `_`, `,` and every byte outside printable ASCII become `%XX`.
pub fn escape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for byte in token.bytes() {
        if is_literal(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Reverse `escape_token`, rejecting anything it could not have produced
pub fn unescape_token(escaped: &str) -> Option<String> {
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else if is_literal(bytes[i]) {
            out.push(bytes[i]);
            i += 1;
        } else {
            return None;
        }
    }

    String::from_utf8(out).ok()
}

fn is_literal(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7E) && !matches!(byte, b'%' | b'_' | b',')
}
