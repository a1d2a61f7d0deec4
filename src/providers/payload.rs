//! Read helpers for opaque webhook payloads.

use chrono::{DateTime, Utc};
use log::debug;
use serde_json::Value;

/// Non-empty string at a JSON pointer (e.g. `/pull_request/head/sha`).
pub fn str_at<'a>(payload: &'a Value, pointer: &str) -> Option<&'a str> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Owned variant of [`str_at`].
pub fn string_at(payload: &Value, pointer: &str) -> Option<String> {
    str_at(payload, pointer).map(ToString::to_string)
}

/// First pointer in `candidates` that resolves to a non-empty string.
pub fn first_str<'a>(payload: &'a Value, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|pointer| str_at(payload, pointer))
}

/// Last element of the array at `pointer`, if the array is non-empty.
pub fn last_entry<'a>(payload: &'a Value, pointer: &str) -> Option<&'a Value> {
    payload
        .pointer(pointer)
        .and_then(Value::as_array)
        .and_then(|entries| entries.last())
}

/// Parses an RFC 3339 timestamp, leaving it unset when the provider sent something else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .inspect_err(|e| debug!("Ignoring unparseable timestamp {raw:?}: {e}"))
        .ok()
}
