//! Lossy reduction of agent state into a bounded, JSON-safe summary.
//!
//! The summary always decodes to a mapping and fits the platform's state
//! column regardless of how large the source state grew: strings are capped
//! to a character budget, sequences keep their first elements, and nested
//! mappings are preserved to a fixed depth. Truncation is silent — no
//! ellipsis marker is added to shortened strings.

use std::collections::HashSet;

use bon::Builder;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::ValueKind;
use crate::error::{Result, StateError};

/// Default cap on retained string length, in characters.
pub const DEFAULT_MAX_FIELD_SIZE: usize = 1000;
/// Sequences keep only this many leading elements.
pub const MAX_LIST_ITEMS: usize = 10;
/// Nested mappings keep only this many leading entries.
pub const MAX_MAP_ENTRIES: usize = 20;
/// Nested mappings are preserved to this many levels.
pub const MAX_MAP_DEPTH: usize = 2;
/// Key under which an over-deep mapping is collapsed.
pub const TRUNCATED_KEY: &str = "<truncated>";

/// Settings for [`reduce`].
#[derive(Debug, Clone, Builder)]
pub struct ReduceOptions {
    /// Maximum character length retained for any string value.
    #[builder(default = DEFAULT_MAX_FIELD_SIZE)]
    pub max_field_size: usize,
    /// Field names dropped entirely regardless of value.
    #[builder(default = ReduceOptions::default_excluded_fields())]
    pub excluded_fields: HashSet<String>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            excluded_fields: Self::default_excluded_fields(),
        }
    }
}

impl ReduceOptions {
    /// The back-reference field and injected manager handles are never
    /// persisted.
    pub fn default_excluded_fields() -> HashSet<String> {
        ["agent_context", "storage_manager", "cache_manager"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}

/// Reduce a state to its bounded minimal form.
///
/// Total: an absent (`null`) state reduces to an empty mapping, and any
/// serialization failure is logged and recovered as an empty mapping so
/// persistence can never block a response.
pub fn reduce<S: Serialize>(state: &S, options: &ReduceOptions) -> Map<String, Value> {
    match try_reduce(state, options) {
        Ok(minimal) => minimal,
        Err(error) => {
            tracing::warn!(error = %error, "Failed to build minimal agent state");
            Map::new()
        }
    }
}

/// Fallible core of [`reduce`].
pub fn try_reduce<S: Serialize>(state: &S, options: &ReduceOptions) -> Result<Map<String, Value>> {
    let fields = match serde_json::to_value(state)? {
        Value::Null => return Ok(Map::new()),
        Value::Object(fields) => fields,
        other => return Err(StateError::NotAnObject(ValueKind::of(&other))),
    };

    let mut minimal = Map::new();
    for (key, value) in fields {
        if options.excluded_fields.contains(&key) {
            continue;
        }
        minimal.insert(key, reduce_field(value, options.max_field_size));
    }
    Ok(minimal)
}

fn reduce_field(value: Value, max_size: usize) -> Value {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => value,
        Value::String(text) => reduce_text(text, max_size),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .take(MAX_LIST_ITEMS)
                .map(|item| reduce_item(item, max_size))
                .collect(),
        ),
        Value::Object(map) => Value::Object(reduce_mapping(map, max_size, 1)),
    }
}

/// Sequence elements: scalars pass through under the same string cap, and a
/// mapping inside a sequence gets its own full depth budget. A sequence
/// nested directly inside a sequence is stringified rather than recursed
/// into, so the output stays JSON-safe without growing unboundedly.
fn reduce_item(value: Value, max_size: usize) -> Value {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => value,
        Value::String(text) => reduce_text(text, max_size),
        Value::Object(map) => Value::Object(reduce_mapping(map, max_size, 0)),
        Value::Array(_) => {
            tracing::debug!("Stringifying sequence nested inside a list field");
            truncate_chars(value.to_string(), max_size)
        }
    }
}

/// Nested mappings: bounded to [`MAX_MAP_DEPTH`] levels and
/// [`MAX_MAP_ENTRIES`] leading entries. Sequences at this level are collapsed
/// to a length descriptor — mapping contents matter for context, list
/// contents inside them do not.
fn reduce_mapping(map: Map<String, Value>, max_size: usize, depth: usize) -> Map<String, Value> {
    if depth >= MAX_MAP_DEPTH {
        // re-reducing an already-collapsed mapping keeps it stable
        if map.len() == 1 && map.contains_key(TRUNCATED_KEY) {
            return map;
        }
        let mut collapsed = Map::new();
        collapsed.insert(
            TRUNCATED_KEY.to_string(),
            Value::String(format!("{} items", map.len())),
        );
        return collapsed;
    }

    let mut reduced = Map::new();
    for (key, value) in map.into_iter().take(MAX_MAP_ENTRIES) {
        let value = match value {
            Value::Object(inner) => Value::Object(reduce_mapping(inner, max_size, depth + 1)),
            Value::String(text) => truncate_chars(text, max_size),
            Value::Array(items) => Value::String(format!("<list[{}]>", items.len())),
            other => other,
        };
        reduced.insert(key, value);
    }
    reduced
}

/// Strings at the top level and inside sequences: RFC 3339 timestamps are
/// re-emitted in canonical UTC form (a plain string that happens to parse as
/// RFC 3339 is normalized the same way); everything else is capped to
/// `max_size` characters.
fn reduce_text(text: String, max_size: usize) -> Value {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&text) {
        return Value::String(
            timestamp
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
    }
    truncate_chars(text, max_size)
}

/// Keep exactly the leading `max_size` characters. Counts characters, not
/// bytes, so multi-byte text is never cut mid-character.
fn truncate_chars(text: String, max_size: usize) -> Value {
    // byte length bounds character count, so short strings skip the scan
    if text.len() <= max_size {
        return Value::String(text);
    }
    match text.char_indices().nth(max_size) {
        Some((cut, _)) => {
            let mut text = text;
            text.truncate(cut);
            Value::String(text)
        }
        None => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_chars_counts_characters_not_bytes() {
        let text = "é".repeat(8);
        match truncate_chars(text, 5) {
            Value::String(kept) => assert_eq!(kept, "é".repeat(5)),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn truncate_chars_keeps_short_strings_verbatim() {
        match truncate_chars("hello".to_string(), 5) {
            Value::String(kept) => assert_eq!(kept, "hello"),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn reduce_text_normalizes_offset_timestamps_to_utc() {
        let reduced = reduce_text("2024-05-01T10:00:00+02:00".to_string(), 1000);
        assert_eq!(reduced, Value::String("2024-05-01T08:00:00Z".to_string()));
    }

    #[test]
    fn reduce_text_is_stable_on_canonical_timestamps() {
        let canonical = "2024-05-01T08:00:00Z";
        let reduced = reduce_text(canonical.to_string(), 1000);
        assert_eq!(reduced, Value::String(canonical.to_string()));
    }

    #[test]
    fn reduce_text_leaves_plain_strings_alone() {
        let reduced = reduce_text("not a timestamp".to_string(), 1000);
        assert_eq!(reduced, Value::String("not a timestamp".to_string()));
    }

    #[test]
    fn collapsed_mapping_is_stable_under_re_reduction() {
        let mut collapsed = Map::new();
        collapsed.insert(TRUNCATED_KEY.to_string(), Value::String("3 items".into()));
        let again = reduce_mapping(collapsed.clone(), 1000, MAX_MAP_DEPTH);
        assert_eq!(again, collapsed);
    }
}
