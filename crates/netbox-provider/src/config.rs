//! Provider configuration
//!
//! Settings come from the provider block or, for anything left unset there, from
//! `NETBOX_*` environment variables.

use crate::error::ProviderError;
use netbox_client::JournalFailurePolicy;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default comment written into audit journal entries
pub const DEFAULT_JOURNAL_COMMENT: &str = "Object created or updated by Terraform";

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Audit journal settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSettings {
    /// Write a journal entry after each create/update
    pub enabled: bool,
    /// Comment of every journal entry
    pub comment: String,
    /// Behaviour when a journal entry cannot be written
    pub failure_policy: JournalFailurePolicy,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            comment: DEFAULT_JOURNAL_COMMENT.to_string(),
            failure_policy: JournalFailurePolicy::FailClosed,
        }
    }
}

/// Provider configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// NetBox base URL, e.g. `https://netbox.example.com`
    pub server_url: String,
    /// API token
    pub api_token: String,
    /// Accept invalid TLS certificates
    pub allow_insecure_https: bool,
    /// Timeout of each HTTP request
    pub request_timeout: Duration,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Do not compare the server version against the supported versions
    pub skip_version_check: bool,
    /// Audit journal settings
    pub journal: JournalSettings,
}

// The token never ends up in logs
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("server_url", &self.server_url)
            .field("api_token", &"<redacted>")
            .field("allow_insecure_https", &self.allow_insecure_https)
            .field("request_timeout", &self.request_timeout)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("skip_version_check", &self.skip_version_check)
            .field("journal", &self.journal)
            .finish()
    }
}

impl ProviderConfig {
    /// Configuration with defaults for everything but URL and token
    pub fn new(server_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_token: api_token.into(),
            allow_insecure_https: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            headers: BTreeMap::new(),
            skip_version_check: false,
            journal: JournalSettings::default(),
        }
    }

    /// Load configuration from `NETBOX_*` environment variables
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let server_url = get("NETBOX_SERVER_URL").ok_or_else(|| {
            ProviderError::InvalidConfig("NETBOX_SERVER_URL environment variable is required".to_string())
        })?;
        let api_token = get("NETBOX_API_TOKEN").ok_or_else(|| {
            ProviderError::InvalidConfig("NETBOX_API_TOKEN environment variable is required".to_string())
        })?;

        let mut config = Self::new(server_url, api_token);

        if let Some(value) = get("NETBOX_ALLOW_INSECURE_HTTPS") {
            config.allow_insecure_https = parse_bool("NETBOX_ALLOW_INSECURE_HTTPS", &value)?;
        }
        if let Some(value) = get("NETBOX_REQUEST_TIMEOUT") {
            let seconds: u64 = value.trim().parse().map_err(|_| {
                ProviderError::InvalidConfig(format!(
                    "NETBOX_REQUEST_TIMEOUT must be a number of seconds, got '{value}'"
                ))
            })?;
            config.request_timeout = Duration::from_secs(seconds);
        }
        if let Some(value) = get("NETBOX_HEADERS") {
            config.headers = serde_json::from_str(&value).map_err(|e| {
                ProviderError::InvalidConfig(format!("NETBOX_HEADERS must be a JSON object of strings: {e}"))
            })?;
        }
        if let Some(value) = get("NETBOX_SKIP_VERSION_CHECK") {
            config.skip_version_check = parse_bool("NETBOX_SKIP_VERSION_CHECK", &value)?;
        }
        if let Some(value) = get("NETBOX_JOURNAL_ENABLED") {
            config.journal.enabled = parse_bool("NETBOX_JOURNAL_ENABLED", &value)?;
        }
        if let Some(value) = get("NETBOX_JOURNAL_COMMENT") {
            config.journal.comment = value;
        }
        if let Some(value) = get("NETBOX_JOURNAL_FAILURE_POLICY") {
            config.journal.failure_policy = value
                .parse()
                .map_err(|e: netbox_client::NetBoxError| ProviderError::InvalidConfig(e.to_string()))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values NetBox or reqwest would reject
    pub fn validate(&self) -> Result<(), ProviderError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ProviderError::InvalidConfig(format!(
                "server_url must start with http:// or https://, got '{}'",
                self.server_url
            )));
        }
        if self.api_token.trim().is_empty() {
            return Err(ProviderError::InvalidConfig("api_token must not be empty".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(ProviderError::InvalidConfig("request_timeout must be positive".to_string()));
        }
        for (name, value) in &self.headers {
            reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ProviderError::InvalidConfig(format!("invalid header name '{name}': {e}")))?;
            reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| ProviderError::InvalidConfig(format!("invalid value for header '{name}': {e}")))?;
        }
        if self.journal.enabled && self.journal.comment.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "journal comment must not be empty when journaling is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ProviderError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ProviderError::InvalidConfig(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}
