//! `netbox_tag` resource

use super::{delete_object, found, Resource};
use crate::error::ProviderError;
use crate::resource_data::ResourceData;
use crate::util::get_slug;
use async_trait::async_trait;
use netbox_client::{endpoints, NetBoxClient, Tag, WritableTag};
use tracing::info;

/// Tag in `extras/tags`
#[derive(Debug, Clone, Copy, Default)]
pub struct TagResource;

impl TagResource {
    fn writable(data: &ResourceData) -> Result<WritableTag, ProviderError> {
        let name = data.require_str("name")?;
        let slug = data.get_str("slug").map_or_else(|| get_slug(name), str::to_string);
        if slug.is_empty() {
            return Err(ProviderError::InvalidAttribute {
                name: "slug".to_string(),
                reason: format!("cannot derive a slug from '{name}'"),
            });
        }

        let color = match data.get_str("color_hex") {
            Some(hex) => Some(parse_color(hex)?),
            None => None,
        };

        Ok(WritableTag {
            name: name.to_string(),
            slug,
            color,
            description: data.get_str("description").unwrap_or_default().to_string(),
        })
    }
}

/// Six hex digits, lowercased, without the leading `#`
fn parse_color(hex: &str) -> Result<String, ProviderError> {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(hex.to_ascii_lowercase())
    } else {
        Err(ProviderError::InvalidAttribute {
            name: "color_hex".to_string(),
            reason: format!("'{hex}' is not a six digit hex color"),
        })
    }
}

#[async_trait]
impl Resource for TagResource {
    fn type_name(&self) -> &'static str {
        "netbox_tag"
    }

    async fn create(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        let body = Self::writable(data)?;
        let tag: Tag = client.create(endpoints::EXTRAS_TAGS, &body).await?;
        info!("Created tag {} (ID: {})", tag.name, tag.id);
        data.set_id(tag.id);

        self.read(client, data).await
    }

    async fn read(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = data.id_u64()?;
        let Some(tag) = found(self.type_name(), data, client.read::<Tag>(endpoints::EXTRAS_TAGS, id).await)? else {
            return Ok(());
        };

        data.set("name", tag.name);
        data.set("slug", tag.slug);
        data.set("color_hex", tag.color);
        data.set("description", tag.description);
        Ok(())
    }

    async fn update(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        let id = data.id_u64()?;
        let body = Self::writable(data)?;
        let tag: Tag = client.update(endpoints::EXTRAS_TAGS, id, &body).await?;
        info!("Updated tag {} (ID: {})", tag.name, tag.id);

        self.read(client, data).await
    }

    async fn delete(&self, client: &NetBoxClient, data: &mut ResourceData) -> Result<(), ProviderError> {
        delete_object(client, endpoints::EXTRAS_TAGS, data).await
    }
}
