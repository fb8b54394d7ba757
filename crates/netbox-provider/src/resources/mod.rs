//! Managed resources
//!
//! Each resource maps one NetBox endpoint onto [`ResourceData`]:
//! - `asn.rs` - `netbox_asn` (`ipam/asns`), with tags and custom fields
//! - `tag.rs` - `netbox_tag` (`extras/tags`)

mod asn;
mod tag;

pub use asn::AsnResource;
pub use tag::TagResource;

use crate::error::ProviderError;
use crate::resource_data::ResourceData;
use async_trait::async_trait;
use netbox_client::NetBoxClient;

/// CRUD lifecycle of one resource type
///
/// `create` and `update` finish with a `read` so the resulting state reflects what
/// NetBox stored. `read` clears the ID when the object is gone instead of failing,
/// and `delete` treats an already missing object as deleted.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. `netbox_asn`
    fn type_name(&self) -> &'static str;

    /// Create the object from the planned attributes and record its ID
    async fn create(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError>;

    /// Refresh attributes from NetBox; clears the ID when the object is gone
    async fn read(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError>;

    /// Write the planned attributes to the existing object
    async fn update(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError>;

    /// Delete the object; an object that is already gone counts as deleted
    async fn delete(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError>;
}

/// Outcome of a read that may find the object gone
pub(crate) fn found<T>(
    type_name: &str,
    data: &mut ResourceData,
    result: Result<T, netbox_client::NetBoxError>,
) -> Result<Option<T>, ProviderError> {
    match result {
        Ok(object) => Ok(Some(object)),
        Err(e) if e.is_not_found() => {
            tracing::warn!(
                "{} {} no longer exists in NetBox, removing it from state",
                type_name,
                data.id().unwrap_or_default()
            );
            data.clear_id();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete an object, treating "already gone" as success
pub(crate) async fn delete_object(
    client: &NetBoxClient,
    endpoint: netbox_client::Endpoint,
    data: &mut ResourceData,
) -> Result<(), ProviderError> {
    let id = data.id_u64()?;
    match client.delete(endpoint, id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::debug!("{} {} was already deleted", endpoint.resource, id);
        }
        Err(e) => return Err(e.into()),
    }
    data.clear_id();
    Ok(())
}
