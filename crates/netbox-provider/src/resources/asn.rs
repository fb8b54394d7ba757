//! `netbox_asn` resource

use super::{delete_object, found, Resource};
use crate::custom_fields::{flatten_for_read, reconcile, semantically_equal};
use crate::error::ProviderError;
use crate::resource_data::ResourceData;
use crate::util::{tag_names, writable_tags};
use async_trait::async_trait;
use netbox_client::{endpoints, Asn, NetBoxClient, WritableAsn};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Autonomous system number in `ipam/asns`
#[derive(Debug, Clone, Copy, Default)]
pub struct AsnResource;

impl AsnResource {
    fn writable(data: &ResourceData, custom_fields: Map<String, Value>) -> Result<WritableAsn, ProviderError> {
        Ok(WritableAsn {
            asn: data.require_u64("asn")?,
            rir: Some(data.require_u64("rir_id")?),
            tenant: data.get_u64("tenant_id"),
            description: data.get_str("description").unwrap_or_default().to_string(),
            comments: data.get_str("comments").unwrap_or_default().to_string(),
            tags: writable_tags(&data.get_string_list("tags")),
            custom_fields,
        })
    }
}

/// Custom field text of a state value; unset means none
fn custom_field_text(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl Resource for AsnResource {
    fn type_name(&self) -> &'static str {
        "netbox_asn"
    }

    async fn create(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        let custom_fields = reconcile("", custom_field_text(data.get("custom_fields")))?;
        let body = Self::writable(data, custom_fields)?;

        let asn: Asn = client.create(endpoints::IPAM_ASNS, &body).await?;
        info!("Created ASN {} (ID: {})", asn.asn, asn.id);
        data.set_id(asn.id);

        self.read(client, data).await
    }

    async fn read(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = data.id_u64()?;
        let Some(asn) = found(self.type_name(), data, client.read::<Asn>(endpoints::IPAM_ASNS, id).await)? else {
            return Ok(());
        };

        data.set("asn", asn.asn);
        data.set("rir_id", asn.rir.as_ref().map(|r| r.id));
        data.set("tenant_id", asn.tenant.as_ref().map(|t| t.id));
        data.set("description", asn.description);
        data.set("comments", asn.comments);
        data.set("tags", tag_names(&asn.tags));

        let applied = flatten_for_read(&asn.custom_fields)?;
        let configured = custom_field_text(data.get("custom_fields")).to_string();
        if semantically_equal(&configured, &applied) {
            debug!("Custom fields of ASN {} match configuration", id);
        } else {
            data.set("custom_fields", applied);
        }
        Ok(())
    }

    async fn update(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = data.id_u64()?;
        if data.has_change("custom_fields") {
            debug!("Custom fields of ASN {} changed", id);
        }
        let (old, new) = data.get_change("custom_fields");
        let custom_fields = reconcile(custom_field_text(old), custom_field_text(new))?;
        let body = Self::writable(data, custom_fields)?;

        let asn: Asn = client.update(endpoints::IPAM_ASNS, id, &body).await?;
        info!("Updated ASN {} (ID: {})", asn.asn, asn.id);

        self.read(client, data).await
    }

    async fn delete(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        delete_object(client, endpoints::IPAM_ASNS, data).await
    }
}
