//! Helper functions for the mock transport
//!
//! Routing of API paths and the object bookkeeping NetBox does server-side
//! (`id`, `url`, `display`, timestamps, custom-field merging).

use serde_json::{Map, Value};

/// Where an API path points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/api/status/`
    Status,
    /// `/api/<group>/<resource>/`
    Collection(String),
    /// `/api/<group>/<resource>/<id>/`
    Object(String, u64),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["api", "status"] => Some(Route::Status),
            ["api", group, resource] => Some(Route::Collection(format!("/api/{}/{}/", group, resource))),
            ["api", group, resource, id] => id
                .parse()
                .ok()
                .map(|id| Route::Object(format!("/api/{}/{}/", group, resource), id)),
            _ => None,
        }
    }
}

/// Fill in the fields NetBox assigns on creation
pub fn decorate(base_url: &str, collection: &str, id: u64, object: Value) -> Value {
    let mut map = match object {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let now = chrono::Utc::now().to_rfc3339();

    map.insert("id".to_string(), Value::from(id));
    map.insert("url".to_string(), Value::String(format!("{}{}{}/", base_url, collection, id)));
    let display = ["name", "asn", "comments"]
        .iter()
        .find_map(|key| map.get(*key))
        .map_or_else(|| id.to_string(), display_of);
    map.entry("display").or_insert(Value::String(display));
    map.entry("custom_fields").or_insert_with(|| Value::Object(Map::new()));
    map.entry("created").or_insert_with(|| Value::String(now.clone()));
    map.insert("last_updated".to_string(), Value::String(now));

    Value::Object(map)
}

/// Nested representation of a stored object, as NetBox embeds related objects
pub fn nested(object: &Value) -> Value {
    let mut map = Map::new();
    for key in ["id", "url", "display", "name", "slug"] {
        if let Some(value) = object.get(key) {
            map.insert(key.to_string(), value.clone());
        }
    }
    Value::Object(map)
}

/// Refresh `last_updated`
pub fn touch(object: &mut Value) {
    if let Value::Object(map) = object {
        map.insert("last_updated".to_string(), Value::String(chrono::Utc::now().to_rfc3339()));
    }
}

/// Apply a write body to a stored object.
///
/// Top-level fields are replaced, except `custom_fields` which merges key-wise:
/// NetBox keeps every defined custom field and only changes the keys it is sent.
/// `id` and `url` are never overwritten.
pub fn merge(object: &mut Value, body: Value) {
    let (Value::Object(target), Value::Object(patch)) = (object, body) else {
        return;
    };

    for (key, value) in patch {
        match (key.as_str(), value) {
            ("id" | "url", _) => {}
            ("custom_fields", Value::Object(fields)) => {
                let entry = target
                    .entry("custom_fields")
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                if let Value::Object(existing) = entry {
                    existing.extend(fields);
                }
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Whether an object matches equality filters on its top-level scalar fields.
///
/// Pagination parameters and filters on unknown fields are ignored.
pub fn matches_filters(object: &Value, filters: &[(String, String)]) -> bool {
    filters
        .iter()
        .filter(|(key, _)| key != "limit" && key != "offset")
        .all(|(key, expected)| match object.get(key) {
            Some(Value::String(s)) => s == expected,
            Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string() == *expected,
            _ => true,
        })
}

fn display_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
