//! Test utilities for unit testing resources
//!
//! This module provides helpers for creating resource data and a journaled client
//! over the in-memory mock.

#[cfg(test)]
use crate::config::JournalSettings;
#[cfg(test)]
use crate::provider::compose_transport;
#[cfg(test)]
use crate::resource_data::Attributes;
#[cfg(test)]
use netbox_client::{endpoints, MockTransport, NetBoxClient};
#[cfg(test)]
use serde_json::{json, Value};
#[cfg(test)]
use std::sync::Arc;

/// Mock NetBox plus a client that journals writes into it
#[cfg(test)]
pub fn journaled_client() -> (MockTransport, NetBoxClient) {
    let mock = MockTransport::new("http://test-netbox");
    let client = NetBoxClient::new(compose_transport(Arc::new(mock.clone()), &JournalSettings::default()));
    (mock, client)
}

/// Attribute map from a JSON object literal
#[cfg(test)]
pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// Seed an RIR and return its ID
#[cfg(test)]
pub fn insert_rir(mock: &MockTransport, name: &str) -> u64 {
    mock.insert(
        endpoints::IPAM_RIRS,
        json!({"name": name, "slug": crate::util::get_slug(name), "is_private": true}),
    )
}

/// Seed a tag and return its ID
#[cfg(test)]
pub fn insert_tag(mock: &MockTransport, name: &str) -> u64 {
    mock.insert(
        endpoints::EXTRAS_TAGS,
        json!({"name": name, "slug": crate::util::get_slug(name), "color": "9e9e9e"}),
    )
}
