//! API operation descriptors
//!
//! Every REST call made by [`NetBoxClient`](crate::NetBoxClient) is described by an
//! [`Operation`] before it is handed to a [`Transport`](crate::Transport). The
//! descriptor is self-contained so any transport (HTTP, mock, decorator) can replay it.
//!
//! Operation identifiers follow the NetBox OpenAPI naming scheme
//! `<group>_<plural-model>_<verb>`, e.g. `ipam_asns_create`.

use reqwest::Method;
use serde_json::Value;

/// Operation identifier of the "create journal entry" call
pub const JOURNAL_ENTRY_CREATE: &str = "extras_journal-entries_create";

/// A single REST call against the NetBox API
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operation identifier, e.g. `ipam_asns_create`
    pub id: String,
    /// HTTP method
    pub method: Method,
    /// Path relative to the server URL, e.g. `/api/ipam/asns/42/`
    pub path: String,
    /// Query parameters, unencoded
    pub query: Vec<(String, String)>,
    /// JSON request body
    pub body: Option<Value>,
}

impl Operation {
    /// Create an operation without query parameters or body
    pub fn new(id: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append query parameters
    #[must_use]
    pub fn with_query(mut self, filters: &[(&str, &str)]) -> Self {
        self.query
            .extend(filters.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
        self
    }

    /// Set the JSON request body
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Whether this is the journal-entry create call itself
    pub fn is_journal_create(&self) -> bool {
        self.id == JOURNAL_ENTRY_CREATE
    }

    /// Whether the method is GET or DELETE
    pub fn is_read_or_delete(&self) -> bool {
        self.method == Method::GET || self.method == Method::DELETE
    }

    /// Object type addressed by this operation, see [`object_type_from_operation_id`]
    pub fn object_type(&self) -> Option<String> {
        object_type_from_operation_id(&self.id)
    }
}

/// Derive the `<group>.<model>` object type from an operation identifier.
///
/// The identifier is split into at most three `_`-delimited parts. The second part
/// is singularized by dropping one trailing `s`. Identifiers with fewer than three
/// parts, or with an empty group or model, have no object type.
///
/// ```
/// use netbox_client::operation::object_type_from_operation_id;
///
/// assert_eq!(object_type_from_operation_id("ipam_asns_create").as_deref(), Some("ipam.asn"));
/// assert_eq!(object_type_from_operation_id("status_list"), None);
/// ```
pub fn object_type_from_operation_id(operation_id: &str) -> Option<String> {
    let mut parts = operation_id.splitn(3, '_');
    let group = parts.next()?;
    let model = parts.next()?;
    parts.next()?;

    if group.is_empty() || model.is_empty() {
        return None;
    }

    let model = model.strip_suffix('s').unwrap_or(model);
    Some(format!("{group}.{model}"))
}

/// Response of a transport call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body; `None` for empty bodies (e.g. 204 No Content)
    pub payload: Option<Value>,
}

impl ApiResponse {
    /// Create a response
    pub fn new(status: u16, payload: Option<Value>) -> Self {
        Self { status, payload }
    }

    /// Deserialize the payload into a typed model
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> Result<T, crate::NetBoxError> {
        let payload = self.payload.unwrap_or(Value::Null);
        Ok(serde_json::from_value(payload)?)
    }
}

/// Capability of a response to expose the payload of the object it describes.
///
/// Responses differ per operation, so the journal decorator asks for this
/// capability instead of assuming a shape. A missing payload or a payload without
/// a numeric `id` yields `None`.
pub trait HasIdentifiablePayload {
    /// The decoded payload, if any
    fn payload(&self) -> Option<&Value>;

    /// Numeric `id` of the payload object
    fn payload_id(&self) -> Option<u64> {
        self.payload()?.get("id")?.as_u64()
    }
}

impl HasIdentifiablePayload for ApiResponse {
    fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_type_strips_one_trailing_s() {
        assert_eq!(object_type_from_operation_id("ipam_asns_create").as_deref(), Some("ipam.asn"));
        assert_eq!(object_type_from_operation_id("dcim_sites_update").as_deref(), Some("dcim.site"));
        assert_eq!(
            object_type_from_operation_id("ipam_vlans_partial_update").as_deref(),
            Some("ipam.vlan")
        );
        assert_eq!(
            object_type_from_operation_id("circuits_circuit-types_create").as_deref(),
            Some("circuits.circuit-type")
        );
    }

    #[test]
    fn test_object_type_requires_three_parts() {
        assert_eq!(object_type_from_operation_id("status"), None);
        assert_eq!(object_type_from_operation_id("status_list"), None);
        assert_eq!(object_type_from_operation_id(""), None);
    }

    #[test]
    fn test_object_type_rejects_empty_parts() {
        assert_eq!(object_type_from_operation_id("_asns_create"), None);
        assert_eq!(object_type_from_operation_id("ipam__create"), None);
    }

    #[test]
    fn test_journal_create_detection() {
        let op = Operation::new(JOURNAL_ENTRY_CREATE, Method::POST, "/api/extras/journal-entries/");
        assert!(op.is_journal_create());

        let op = Operation::new("ipam_asns_create", Method::POST, "/api/ipam/asns/");
        assert!(!op.is_journal_create());
    }

    #[test]
    fn test_read_or_delete() {
        assert!(Operation::new("ipam_asns_read", Method::GET, "/").is_read_or_delete());
        assert!(Operation::new("ipam_asns_delete", Method::DELETE, "/").is_read_or_delete());
        assert!(!Operation::new("ipam_asns_create", Method::POST, "/").is_read_or_delete());
        assert!(!Operation::new("ipam_asns_update", Method::PUT, "/").is_read_or_delete());
        assert!(!Operation::new("ipam_asns_partial_update", Method::PATCH, "/").is_read_or_delete());
    }

    #[test]
    fn test_payload_id() {
        let response = ApiResponse::new(201, Some(json!({"id": 42, "asn": 65000})));
        assert_eq!(response.payload_id(), Some(42));

        assert_eq!(ApiResponse::new(204, None).payload_id(), None);
        assert_eq!(ApiResponse::new(200, Some(json!({}))).payload_id(), None);
        assert_eq!(ApiResponse::new(200, Some(json!({"id": "42"}))).payload_id(), None);
        assert_eq!(ApiResponse::new(200, Some(json!([{"id": 1}]))).payload_id(), None);
    }

    #[test]
    fn test_with_query_appends() {
        let op = Operation::new("ipam_asns_list", Method::GET, "/api/ipam/asns/")
            .with_query(&[("asn", "65000")])
            .with_query(&[("limit", "50")]);
        assert_eq!(
            op.query,
            vec![
                ("asn".to_string(), "65000".to_string()),
                ("limit".to_string(), "50".to_string())
            ]
        );
    }
}
