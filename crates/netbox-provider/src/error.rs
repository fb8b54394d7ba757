//! Provider error types.
//!
//! Errors raised by the provider core on top of the client's [`NetBoxError`].

use netbox_client::NetBoxError;
use thiserror::Error;

/// Errors that can occur in the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// NetBox API error
    #[error("NetBox error: {0}")]
    NetBox(#[from] NetBoxError),

    /// Custom field text is not a JSON object
    #[error("invalid custom fields JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Applied custom fields cannot be represented as JSON object text
    #[error("cannot marshal custom fields: {0}")]
    Marshal(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// NetBox version outside the supported range
    #[error("NetBox version {found} is not supported (supported: {supported}); set skip_version_check to ignore")]
    UnsupportedVersion {
        /// Version reported by `/api/status/`
        found: String,
        /// Human-readable list of supported versions
        supported: String,
    },

    /// Required attribute missing from resource data
    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    /// Attribute present but unusable
    #[error("invalid value for attribute {name}: {reason}")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ProviderError {
    /// Whether the underlying API call reported the object as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NetBox(e) if e.is_not_found())
    }
}
