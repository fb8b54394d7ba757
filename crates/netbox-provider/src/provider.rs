//! Provider initialization
//!
//! Builds the HTTP transport from [`ProviderConfig`], wraps it in the audit
//! journal decorator when journaling is enabled, and checks the server version.

use crate::config::{JournalSettings, ProviderConfig};
use crate::error::ProviderError;
use crate::resources::{AsnResource, Resource, TagResource};
use crate::util::join_with_final_conjunction;
use netbox_client::{AuditJournalTransport, HttpTransport, NetBoxClient, NetBoxError, Transport};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// NetBox `major.minor` releases the resources are written against
pub const SUPPORTED_NETBOX_VERSIONS: &[&str] = &["4.0", "4.1", "4.2", "4.3"];

/// Configured provider: a client plus the settings it was built from
#[derive(Debug, Clone)]
pub struct Provider {
    client: NetBoxClient,
    config: ProviderConfig,
}

impl Provider {
    /// Configure the provider against a live NetBox
    pub async fn configure(config: ProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let http = HttpTransport::new(
            build_http_client(&config)?,
            config.server_url.clone(),
            config.api_token.clone(),
        );
        Self::with_transport(config, Arc::new(http)).await
    }

    /// Configure the provider over an existing transport.
    ///
    /// The transport is wrapped in [`AuditJournalTransport`] when journaling is
    /// enabled; the version check runs through the composed transport.
    pub async fn with_transport(config: ProviderConfig, transport: Arc<dyn Transport>) -> Result<Self, ProviderError> {
        config.validate()?;
        let client = NetBoxClient::new(compose_transport(transport, &config.journal));
        let provider = Self { client, config };

        if provider.config.skip_version_check {
            debug!("Skipping NetBox version check");
        } else {
            provider.check_version().await?;
        }

        info!(
            "Configured NetBox provider for {} (journal: {})",
            provider.config.server_url,
            if provider.config.journal.enabled { "enabled" } else { "disabled" }
        );
        Ok(provider)
    }

    /// Client used by every resource
    pub fn client(&self) -> &NetBoxClient {
        &self.client
    }

    /// Settings the provider was configured with
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Resources this provider manages
    pub fn resources(&self) -> Vec<Box<dyn Resource>> {
        vec![Box::new(AsnResource), Box::new(TagResource)]
    }

    /// Look up a resource by its type name, e.g. `netbox_asn`
    pub fn resource(&self, type_name: &str) -> Option<Box<dyn Resource>> {
        self.resources().into_iter().find(|r| r.type_name() == type_name)
    }

    /// Fetch the server version and compare its `major.minor` with the supported list.
    ///
    /// Returns the full version string reported by NetBox.
    pub async fn check_version(&self) -> Result<String, ProviderError> {
        let status = self.client.status().await?;
        let version = status
            .get("netbox-version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| NetBoxError::Api("/api/status/ did not report netbox-version".to_string()))?
            .to_string();

        match major_minor(&version) {
            Some(release) if SUPPORTED_NETBOX_VERSIONS.contains(&release.as_str()) => {
                debug!("NetBox version {} is supported", version);
                Ok(version)
            }
            _ => {
                warn!("NetBox version {} is not supported", version);
                Err(ProviderError::UnsupportedVersion {
                    found: version,
                    supported: join_with_final_conjunction(SUPPORTED_NETBOX_VERSIONS, ", ", "and"),
                })
            }
        }
    }
}

/// Put the journal decorator in front of `transport` when journaling is enabled
pub fn compose_transport(transport: Arc<dyn Transport>, journal: &JournalSettings) -> Arc<dyn Transport> {
    if !journal.enabled {
        return transport;
    }
    Arc::new(
        AuditJournalTransport::new(transport, journal.comment.clone()).with_failure_policy(journal.failure_policy),
    )
}

fn build_http_client(config: &ProviderConfig) -> Result<reqwest::Client, ProviderError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ProviderError::InvalidConfig(format!("invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ProviderError::InvalidConfig(format!("invalid value for header '{name}': {e}")))?;
        headers.insert(name, value);
    }

    if config.allow_insecure_https {
        warn!("TLS certificate verification is disabled for {}", config.server_url);
    }

    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .danger_accept_invalid_certs(config.allow_insecure_https)
        .default_headers(headers)
        .build()
        .map_err(|e| ProviderError::NetBox(NetBoxError::Http(e)))
}

/// `"4.1.3"`, `"v4.1.3-Docker-3.0.1"` -> `"4.1"`
fn major_minor(version: &str) -> Option<String> {
    let mut parts = version.trim().trim_start_matches('v').split(['.', '-']);
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next()?.parse().ok()?;
    Some(format!("{major}.{minor}"))
}
