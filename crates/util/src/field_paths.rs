//! Dotted-path lookups into JSON payloads.
//!
//! Paths use `.` between segments and accept bracketed indexes, so
//! `data.items[0].slug` and `data.items.0.slug` address the same value.

use serde_json::Value;

/// Resolve `path` against `value`.
///
/// Object segments are looked up by key, array segments by numeric index.
/// Returns `None` as soon as a segment is missing; an empty path (or `.`)
/// returns the value itself.
pub fn deep_get<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    let mut current = value;
    for segment in path_segments(path) {
        current = match current {
            Value::Object(map) => map.get(segment.as_str())?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Split a dotted path into normalized segments.
pub fn path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.trim().chars().peekable();

    while let Some(character) = chars.next() {
        match character {
            '.' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let mut inner = String::new();
                while let Some(next_character) = chars.peek().copied() {
                    chars.next();
                    if next_character == ']' {
                        break;
                    }
                    inner.push(next_character);
                }
                let inner = inner.trim().trim_matches(|c| c == '"' || c == '\'');
                if !inner.is_empty() {
                    segments.push(inner.to_string());
                }
            }
            _ => current.push(character),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
