//! Resource data handed to resources by the plugin host
//!
//! Holds the object ID and two attribute maps: `prior` (last known state) and
//! `planned` (desired state on create/update, refreshed state after read).

use crate::error::ProviderError;
use serde_json::{Map, Value};

/// Attribute map keyed by attribute name
pub type Attributes = Map<String, Value>;

/// State of one resource instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    prior: Attributes,
    planned: Attributes,
}

impl ResourceData {
    /// Data for a resource about to be created
    pub fn new(planned: Attributes) -> Self {
        Self {
            id: None,
            prior: Attributes::new(),
            planned,
        }
    }

    /// Data for an existing resource, as recorded in state
    pub fn from_state(id: impl Into<String>, state: Attributes) -> Self {
        Self {
            id: Some(id.into()),
            prior: state.clone(),
            planned: state,
        }
    }

    /// Replace the desired attributes, keeping the prior ones for [`Self::get_change`]
    #[must_use]
    pub fn with_planned(mut self, planned: Attributes) -> Self {
        self.planned = planned;
        self
    }

    /// Object ID, `None` when the resource does not exist
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Object ID as NetBox's numeric primary key
    pub fn id_u64(&self) -> Result<u64, ProviderError> {
        let id = self.id().ok_or_else(|| ProviderError::MissingAttribute("id".to_string()))?;
        id.parse().map_err(|_| ProviderError::InvalidAttribute {
            name: "id".to_string(),
            reason: format!("'{id}' is not a NetBox object ID"),
        })
    }

    /// Record the ID of a created object
    pub fn set_id(&mut self, id: u64) {
        self.id = Some(id.to_string());
    }

    /// Mark the resource as gone so the host drops it from state
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Current value of an attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.planned.get(name).filter(|v| !v.is_null())
    }

    /// String attribute; empty strings count as unset
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Non-negative integer attribute
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_u64)
    }

    /// List of strings; non-string elements are skipped
    pub fn get_string_list(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Required string attribute
    pub fn require_str(&self, name: &str) -> Result<&str, ProviderError> {
        self.get_str(name)
            .ok_or_else(|| ProviderError::MissingAttribute(name.to_string()))
    }

    /// Required integer attribute
    pub fn require_u64(&self, name: &str) -> Result<u64, ProviderError> {
        match self.get(name) {
            None => Err(ProviderError::MissingAttribute(name.to_string())),
            Some(value) => value.as_u64().ok_or_else(|| ProviderError::InvalidAttribute {
                name: name.to_string(),
                reason: format!("expected a non-negative integer, got {value}"),
            }),
        }
    }

    /// `(prior, planned)` value of an attribute
    pub fn get_change(&self, name: &str) -> (Option<&Value>, Option<&Value>) {
        (self.prior.get(name), self.planned.get(name))
    }

    /// Whether an attribute differs between prior and planned state
    pub fn has_change(&self, name: &str) -> bool {
        let (old, new) = self.get_change(name);
        old != new
    }

    /// Set an attribute of the resulting state
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.planned.insert(name.to_string(), value.into());
    }

    /// Resulting state, as handed back to the host
    pub fn attributes(&self) -> &Attributes {
        &self.planned
    }
}
