//! NetBox API models
//!
//! These models match the NetBox REST API serializers. Response models carry the
//! nested representations NetBox returns; `Writable*` models carry the request shape
//! (related objects by ID, tags by name/slug).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Objects returned by NetBox with an ID and API URL
pub trait NetBoxObject {
    /// Primary key
    fn id(&self) -> u64;
    /// Absolute API URL of the object
    fn url(&self) -> &str;
}

macro_rules! impl_netbox_object {
    ($($ty:ty),* $(,)?) => {
        $(impl NetBoxObject for $ty {
            fn id(&self) -> u64 { self.id }
            fn url(&self) -> &str { &self.url }
        })*
    };
}

impl_netbox_object!(Asn, Tag, JournalEntry, NestedTag, NestedRir, NestedTenant);

// Nested serializers (simplified versions for references)

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedTag {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    pub slug: String,
}

/// Tag reference in write requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritableNestedTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedRir {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedTenant {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    pub slug: String,
}

/// ASN model matching NetBox ASNSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Asn {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub asn: u64,
    pub rir: Option<NestedRir>,
    pub tenant: Option<NestedTenant>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    /// Every custom field defined for ASNs; unset fields are `null`
    #[serde(default)]
    pub custom_fields: Value,
    pub created: Option<String>,
    pub last_updated: Option<String>,
}

/// Request body for creating or replacing an ASN
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WritableAsn {
    pub asn: u64,
    pub rir: Option<u64>,
    pub tenant: Option<u64>,
    pub description: String,
    pub comments: String,
    pub tags: Vec<WritableNestedTag>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub custom_fields: Map<String, Value>,
}

/// Tag model (from Extras API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Tag {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub color: String, // Hex color code without '#'
    #[serde(default)]
    pub description: String,
    pub created: Option<String>,
    pub last_updated: Option<String>,
}

/// Request body for creating or replacing a tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WritableTag {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub description: String,
}

/// Journal entry kind choices
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryKind {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

/// Journal entry model (from Extras API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JournalEntry {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub display: String,
    pub assigned_object_type: String,
    pub assigned_object_id: u64,
    #[serde(deserialize_with = "choice_value")]
    pub kind: JournalEntryKind,
    pub comments: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    pub created: Option<String>,
}

/// Request body for creating a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritableJournalEntry {
    pub assigned_object_type: String,
    pub assigned_object_id: u64,
    pub comments: String,
    pub kind: JournalEntryKind,
    pub tags: Vec<WritableNestedTag>,
}

/// Deserialize a choice field sent either as its plain value (`"success"`) or as
/// NetBox's `{"value": "success", "label": "Success"}` object.
fn choice_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Choice<T> {
        Labeled { value: T },
        Plain(T),
    }

    match Choice::<T>::deserialize(deserializer)? {
        Choice::Labeled { value } | Choice::Plain(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_journal_entry_kind_accepts_labeled_choice() {
        let entry: JournalEntry = serde_json::from_value(json!({
            "id": 7,
            "url": "http://netbox/api/extras/journal-entries/7/",
            "display": "2024-01-01 (Success)",
            "assigned_object_type": "ipam.asn",
            "assigned_object_id": 42,
            "kind": {"value": "success", "label": "Success"},
            "comments": "Created by Terraform",
            "tags": [],
            "created": "2024-01-01T00:00:00Z"
        }))
        .expect("journal entry should deserialize");
        assert_eq!(entry.kind, JournalEntryKind::Success);
        assert_eq!(entry.id(), 7);
    }

    #[test]
    fn test_journal_entry_kind_accepts_plain_choice() {
        let entry: JournalEntry = serde_json::from_value(json!({
            "id": 1,
            "url": "u",
            "assigned_object_type": "ipam.asn",
            "assigned_object_id": 1,
            "kind": "warning",
            "comments": "",
            "created": null
        }))
        .expect("journal entry should deserialize");
        assert_eq!(entry.kind, JournalEntryKind::Warning);
    }

    #[test]
    fn test_writable_journal_entry_serializes_kind_lowercase() {
        let entry = WritableJournalEntry {
            assigned_object_type: "ipam.asn".to_string(),
            assigned_object_id: 42,
            comments: "c".to_string(),
            kind: JournalEntryKind::Success,
            tags: vec![],
        };
        assert_eq!(
            serde_json::to_value(&entry).expect("serialize"),
            json!({
                "assigned_object_type": "ipam.asn",
                "assigned_object_id": 42,
                "comments": "c",
                "kind": "success",
                "tags": []
            })
        );
    }

    #[test]
    fn test_writable_asn_omits_empty_custom_fields() {
        let asn = WritableAsn {
            asn: 65000,
            rir: Some(1),
            ..Default::default()
        };
        let value = serde_json::to_value(&asn).expect("serialize");
        assert!(value.get("custom_fields").is_none());
        assert_eq!(value["rir"], json!(1));
        assert_eq!(value["tenant"], Value::Null);
    }
}
