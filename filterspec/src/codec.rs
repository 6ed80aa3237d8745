//! Field name codec.
//!
//! The storage backend reads every unescaped `.` in a key as a nesting
//! boundary. Field names are free-form user text, so a literal dot inside a
//! single name segment is written as the escape `\u002e` on the way to
//! storage and restored on the way back. The escape introducer itself (`\`)
//! is written as `\u005c`, which keeps `decode(encode(x)) == x` for every
//! string, including user text that already looks like an escape.

use serde_json::{Map, Value};

use crate::common::{ESCAPED_INTRODUCER, ESCAPED_SEPARATOR, ESCAPE_INTRODUCER, FIELD_SEPARATOR};

/// Escapes every literal `.` (and `\`) in a field name.
///
/// # Examples
///
/// ```rust
/// use filterspec::codec::{decode, encode};
///
/// let encoded = encode("cpu.load");
/// assert_eq!(encoded, r"cpu\u002eload");
/// assert_eq!(decode(&encoded), "cpu.load");
/// ```
pub fn encode(name: &str) -> String {
    if !name.contains([FIELD_SEPARATOR, ESCAPE_INTRODUCER]) {
        return name.to_string();
    }

    let mut encoded = String::with_capacity(name.len() + 2 * ESCAPED_SEPARATOR.len());
    for ch in name.chars() {
        match ch {
            FIELD_SEPARATOR => encoded.push_str(ESCAPED_SEPARATOR),
            ESCAPE_INTRODUCER => encoded.push_str(ESCAPED_INTRODUCER),
            _ => encoded.push(ch),
        }
    }
    encoded
}

/// Restores a field name produced by [`encode`].
///
/// Only the two exact escapes are rewritten. A backslash that does not start
/// one of them is copied through untouched, so near-misses such as `\u002E`
/// or `\u02e` survive as they are.
pub fn decode(name: &str) -> String {
    if !name.contains(ESCAPE_INTRODUCER) {
        return name.to_string();
    }

    let mut decoded = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(idx) = rest.find(ESCAPE_INTRODUCER) {
        decoded.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        if tail.starts_with(ESCAPED_SEPARATOR) {
            decoded.push(FIELD_SEPARATOR);
            rest = &tail[ESCAPED_SEPARATOR.len()..];
        } else if tail.starts_with(ESCAPED_INTRODUCER) {
            decoded.push(ESCAPE_INTRODUCER);
            rest = &tail[ESCAPED_INTRODUCER.len()..];
        } else {
            decoded.push(ESCAPE_INTRODUCER);
            rest = &tail[ESCAPE_INTRODUCER.len_utf8()..];
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Encodes each segment of a nested path and joins them with the separator.
pub fn encode_path<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut path = String::new();
    for (idx, segment) in segments.into_iter().enumerate() {
        if idx > 0 {
            path.push(FIELD_SEPARATOR);
        }
        path.push_str(&encode(segment));
    }
    path
}

/// Applies [`encode`] to every object key of a document, recursively.
/// Values are left alone.
pub fn encode_keys(document: &mut Value) {
    rewrite_keys(document, &encode)
}

/// Applies [`decode`] to every object key of a document, recursively.
pub fn decode_keys(document: &mut Value) {
    rewrite_keys(document, &decode)
}

fn rewrite_keys(value: &mut Value, rewrite: &dyn Fn(&str) -> String) {
    match value {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            let mut rewritten = Map::with_capacity(entries.len());
            for (key, mut child) in entries {
                rewrite_keys(&mut child, rewrite);
                rewritten.insert(rewrite(&key), child);
            }
            *map = rewritten;
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                rewrite_keys(item, rewrite);
            }
        }
        _ => {}
    }
}
