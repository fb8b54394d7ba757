//! NetBox client errors

use thiserror::Error;

/// Errors that can occur when interacting with the NetBox API
#[derive(Debug, Error)]
pub enum NetBoxError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NetBox API returned an error
    #[error("NetBox API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The primary call succeeded but the audit journal entry could not be written.
    ///
    /// Returned instead of the primary result under the fail-closed journal policy.
    #[error("failed to write journal entry for {object_type} {object_id}: {source}")]
    JournalWriteFailed {
        /// Object type the entry was meant for, e.g. `ipam.asn`
        object_type: String,
        /// Object ID the entry was meant for
        object_id: u64,
        /// Error returned by the journal-entry call
        #[source]
        source: Box<NetBoxError>,
    },
}

impl NetBoxError {
    /// Whether this error means the addressed object does not exist (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, NetBoxError::NotFound(_))
    }
}
