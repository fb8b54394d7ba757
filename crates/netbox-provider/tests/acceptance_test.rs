//! Acceptance tests against a live NetBox
//!
//! These tests require a running NetBox instance.
//! Set NETBOX_URL and NETBOX_TOKEN environment variables to run.

use netbox_provider::{AsnResource, ClientRegistry, Provider, ProviderConfig, Resource, ResourceData, TagResource};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn config() -> anyhow::Result<ProviderConfig> {
    let url = std::env::var("NETBOX_URL").unwrap_or_else(|_| "http://localhost:8001".to_string());
    let token = std::env::var("NETBOX_TOKEN")?;
    Ok(ProviderConfig::new(url, token))
}

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

async fn provider(registry: &ClientRegistry) -> anyhow::Result<Arc<Provider>> {
    Ok(registry.get_or_configure(config()?).await?)
}

#[tokio::test]
#[ignore] // Requires running NetBox instance
async fn test_tag_lifecycle() -> anyhow::Result<()> {
    netbox_provider::logging::init();
    let registry = ClientRegistry::new();
    let provider = provider(&registry).await?;

    let mut data = ResourceData::new(attrs(json!({"name": "acc-test tag", "color_hex": "00bcd4"})));
    TagResource.create(provider.client(), &mut data).await?;
    assert_eq!(data.get_str("slug"), Some("acc-test-tag"));

    TagResource.delete(provider.client(), &mut data).await?;
    assert_eq!(data.id(), None);
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_asn_lifecycle() -> anyhow::Result<()> {
    let registry = ClientRegistry::new();
    let provider = provider(&registry).await?;

    // Requires an RIR with ID given by NETBOX_RIR_ID
    let rir: u64 = std::env::var("NETBOX_RIR_ID")?.parse()?;
    let mut data = ResourceData::new(attrs(json!({"asn": 4_200_000_123u64, "rir_id": rir})));
    AsnResource.create(provider.client(), &mut data).await?;

    let id = data.id().unwrap_or_default().to_string();
    let planned = attrs(json!({"asn": 4_200_000_123u64, "rir_id": rir, "description": "updated"}));
    let mut data = ResourceData::from_state(id, data.attributes().clone()).with_planned(planned);
    AsnResource.update(provider.client(), &mut data).await?;
    assert_eq!(data.get_str("description"), Some("updated"));

    AsnResource.delete(provider.client(), &mut data).await?;
    assert_eq!(registry.len().await, 1);
    Ok(())
}
