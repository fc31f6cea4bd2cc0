//! Field-path helpers over untyped export records.

use serde_json::Value;

/// Walk a path of object keys.
pub(crate) fn value_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.as_object()?.get(*key)?;
    }
    Some(cur)
}

/// String at path. Numbers are rendered; empty strings and other shapes
/// degrade to `None`.
pub(crate) fn string_at(root: &Value, path: &[&str]) -> Option<String> {
    match value_at(root, path)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Unsigned integer at path; accepts a number or a string of digits.
pub(crate) fn u64_at(root: &Value, path: &[&str]) -> Option<u64> {
    match value_at(root, path)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First string found among several candidate paths.
pub(crate) fn first_string(root: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|p| string_at(root, p))
}
