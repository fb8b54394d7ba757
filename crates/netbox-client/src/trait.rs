//! Transport trait
//!
//! The single seam between the typed client and the wire. The reqwest-backed
//! [`HttpTransport`](crate::HttpTransport) implements it, decorators such as
//! [`AuditJournalTransport`](crate::AuditJournalTransport) wrap it, and tests swap in
//! the in-memory mock.

use crate::error::NetBoxError;
use crate::operation::{ApiResponse, Operation};
use std::sync::Arc;

/// Submits API operations to NetBox
///
/// All implementations must be `Send + Sync` so a single transport can be shared
/// across concurrently running resource operations.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Execute one operation and return its response
    async fn submit(&self, operation: Operation) -> Result<ApiResponse, NetBoxError>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn submit(&self, operation: Operation) -> Result<ApiResponse, NetBoxError> {
        (**self).submit(operation).await
    }
}
