//! NetBox Terraform provider core
//!
//! The pieces of the provider that do not depend on the plugin wire protocol:
//!
//! - [`custom_fields`]: turns configured custom-field JSON into write payloads that
//!   clear removed keys, and applied custom fields back into canonical text
//! - [`provider`]: builds the NetBox client from [`ProviderConfig`], composing the
//!   audit journal transport around the HTTP transport
//! - [`resources`]: `netbox_asn` and `netbox_tag` over [`ResourceData`]
//! - [`registry`]: configured providers shared across test runs
//!
//! # Example
//!
//! ```no_run
//! use netbox_provider::{logging, Provider, ProviderConfig, Resource, ResourceData};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! logging::init();
//! let provider = Provider::configure(ProviderConfig::from_env()?).await?;
//!
//! let mut planned = serde_json::Map::new();
//! planned.insert("name".to_string(), "Core Router".into());
//! let mut data = ResourceData::new(planned);
//!
//! if let Some(tag) = provider.resource("netbox_tag") {
//!     // Creates the tag, then a journal entry on extras.tag <id>
//!     tag.create(provider.client(), &mut data).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod custom_fields;
pub mod error;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod resource_data;
pub mod resources;
pub mod util;

#[cfg(test)]
mod custom_fields_test;
#[cfg(test)]
mod test_utils;

pub use config::{JournalSettings, ProviderConfig};
pub use error::ProviderError;
pub use provider::{compose_transport, Provider, SUPPORTED_NETBOX_VERSIONS};
pub use registry::ClientRegistry;
pub use resource_data::{Attributes, ResourceData};
pub use resources::{AsnResource, Resource, TagResource};
