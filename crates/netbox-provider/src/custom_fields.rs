//! Custom field reconciliation
//!
//! Custom fields travel in two shapes. Configuration holds them as JSON object
//! text, where `""` means "none". NetBox returns them as a live object that lists
//! every field defined for the object type, with `null` for unset ones, and never
//! drops a key once defined: clearing a field means writing `null` to it.
//!
//! [`reconcile`] turns an old/new pair of configured values into the write payload.
//! [`flatten_for_read`] turns the applied object back into canonical text so it
//! diffs cleanly against configuration.

use crate::error::ProviderError;
use serde_json::{Map, Value};

/// Compute the custom-field write payload moving the server from `old` to `new`.
///
/// Every key in `new` is sent with its value as-is. Every key only in `old` is sent
/// as `null`. No other key appears. Empty (or blank) input means no custom fields.
///
/// # Errors
/// [`ProviderError::InvalidJson`] when non-empty input is not a JSON object.
pub fn reconcile(old: &str, new: &str) -> Result<Map<String, Value>, ProviderError> {
    let old = parse(old)?;
    let mut result = parse(new)?;

    for (key, _) in old {
        result.entry(key).or_insert(Value::Null);
    }

    Ok(result)
}

/// Render applied custom fields as compact JSON with sorted keys.
///
/// An empty object, or one whose values are all `null`, renders as `""`.
/// Explicit `null`s are otherwise kept.
///
/// # Errors
/// [`ProviderError::Marshal`] when `applied` is not a JSON object.
pub fn flatten_for_read(applied: &Value) -> Result<String, ProviderError> {
    let Value::Object(fields) = applied else {
        return Err(ProviderError::Marshal(format!(
            "expected a custom field object, got {}",
            kind_of(applied)
        )));
    };

    if fields.values().all(Value::is_null) {
        return Ok(String::new());
    }

    serde_json::to_string(&canonicalize(applied)).map_err(|e| ProviderError::Marshal(e.to_string()))
}

/// Whether two custom-field texts describe the same state.
///
/// Used to suppress diffs between configuration and read-back values: key order and
/// whitespace are ignored, and a key set to `null` equals an absent key, so `""`,
/// `"{}"` and an all-null object are equal. Unparseable text only equals itself.
pub fn semantically_equal(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn parse(text: &str) -> Result<Map<String, Value>, ProviderError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(text).map_err(ProviderError::InvalidJson)
}

fn normalize(text: &str) -> Option<String> {
    let mut fields = parse(text).ok()?;
    fields.retain(|_, value| !value.is_null());
    flatten_for_read(&Value::Object(fields)).ok()
}

/// Rebuild objects with keys inserted in sorted order, at every depth.
///
/// `serde_json::Map` only sorts on its own when the `preserve_order` feature is off.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
