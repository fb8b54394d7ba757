//! NetBox API client
//!
//! Typed CRUD operations over any [`Transport`]. Every call is first described as an
//! [`Operation`] so decorators (journaling) and mocks see exactly what the client sends.
//! Endpoints follow the NetBox API structure `/api/<group>/<resource>/[<id>/]`.

use crate::common::query::{offset_from_next, PAGE_SIZE};
use crate::common::PaginatedResponse;
use crate::error::NetBoxError;
use crate::models::{JournalEntry, WritableJournalEntry};
use crate::netbox_trait::Transport;
use crate::operation::{ApiResponse, Operation};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A NetBox REST endpoint, e.g. `ipam/asns`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// API group, e.g. `ipam`
    pub group: &'static str,
    /// Plural resource name as it appears in the URL, e.g. `asns`
    pub resource: &'static str,
}

impl Endpoint {
    /// Create an endpoint descriptor
    pub const fn new(group: &'static str, resource: &'static str) -> Self {
        Self { group, resource }
    }

    /// Collection path, e.g. `/api/ipam/asns/`
    pub fn collection_path(&self) -> String {
        format!("/api/{}/{}/", self.group, self.resource)
    }

    /// Object path, e.g. `/api/ipam/asns/42/`
    pub fn object_path(&self, id: u64) -> String {
        format!("/api/{}/{}/{}/", self.group, self.resource, id)
    }

    /// Operation identifier for a verb, e.g. `ipam_asns_create`
    pub fn operation_id(&self, verb: &str) -> String {
        format!("{}_{}_{}", self.group, self.resource, verb)
    }
}

/// Endpoints used by the provider
pub mod endpoints {
    use super::Endpoint;

    /// `/api/ipam/asns/`
    pub const IPAM_ASNS: Endpoint = Endpoint::new("ipam", "asns");
    /// `/api/ipam/rirs/`
    pub const IPAM_RIRS: Endpoint = Endpoint::new("ipam", "rirs");
    /// `/api/extras/tags/`
    pub const EXTRAS_TAGS: Endpoint = Endpoint::new("extras", "tags");
    /// `/api/extras/journal-entries/`
    pub const EXTRAS_JOURNAL_ENTRIES: Endpoint = Endpoint::new("extras", "journal-entries");
    /// `/api/tenancy/tenants/`
    pub const TENANCY_TENANTS: Endpoint = Endpoint::new("tenancy", "tenants");
}

/// NetBox API client
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct NetBoxClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for NetBoxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetBoxClient").finish_non_exhaustive()
    }
}

impl NetBoxClient {
    /// Create a client over a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Submit a raw operation
    pub async fn submit(&self, operation: Operation) -> Result<ApiResponse, NetBoxError> {
        self.transport.submit(operation).await
    }

    /// Fetch `/api/status/`
    ///
    /// Lightweight authenticated request, also used to discover the NetBox version.
    pub async fn status(&self) -> Result<Value, NetBoxError> {
        let operation = Operation::new("status_list", Method::GET, "/api/status/");
        let response = self.submit(operation).await?;
        Ok(response.payload.unwrap_or(Value::Null))
    }

    /// List objects of an endpoint
    ///
    /// # Arguments
    /// * `filters` - Query parameters (e.g., [("asn", "65000")])
    /// * `fetch_all` - If true, follow `next` links until every page is fetched
    pub async fn list<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        filters: &[(&str, &str)],
        fetch_all: bool,
    ) -> Result<Vec<T>, NetBoxError> {
        debug!("Listing {} with filters: {:?}", endpoint.collection_path(), filters);

        if !fetch_all {
            let operation = Operation::new(
                endpoint.operation_id("list"),
                Method::GET,
                endpoint.collection_path(),
            )
            .with_query(filters);
            let page: PaginatedResponse<T> = self.submit(operation).await?.into_typed()?;
            return Ok(page.results);
        }

        let limit = PAGE_SIZE.to_string();
        let mut offset = 0u64;
        let mut all_results = Vec::new();
        loop {
            let offset_str = offset.to_string();
            let operation = Operation::new(
                endpoint.operation_id("list"),
                Method::GET,
                endpoint.collection_path(),
            )
            .with_query(filters)
            .with_query(&[("limit", limit.as_str()), ("offset", offset_str.as_str())]);

            let page: PaginatedResponse<T> = self.submit(operation).await?.into_typed()?;
            let fetched = page.results.len() as u64;
            all_results.extend(page.results);

            match page.next.as_deref().and_then(offset_from_next) {
                Some(next) if next > offset => offset = next,
                Some(_) => {
                    return Err(NetBoxError::Api(format!(
                        "pagination of {} did not advance past offset {}",
                        endpoint.collection_path(),
                        offset
                    )));
                }
                None if page.next.is_some() && fetched > 0 => offset += fetched,
                None => break,
            }
        }

        Ok(all_results)
    }

    /// Get an object by ID
    pub async fn read<T: DeserializeOwned>(&self, endpoint: Endpoint, id: u64) -> Result<T, NetBoxError> {
        debug!("Fetching {} {} from NetBox", endpoint.resource, id);
        let operation = Operation::new(endpoint.operation_id("read"), Method::GET, endpoint.object_path(id));
        self.submit(operation).await?.into_typed()
    }

    /// Create an object
    pub async fn create<W, T>(&self, endpoint: Endpoint, body: &W) -> Result<T, NetBoxError>
    where
        W: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Creating {} in NetBox", endpoint.resource);
        let operation = Operation::new(
            endpoint.operation_id("create"),
            Method::POST,
            endpoint.collection_path(),
        )
        .with_body(serde_json::to_value(body)?);
        self.submit(operation).await?.into_typed()
    }

    /// Replace an object (PUT)
    pub async fn update<W, T>(&self, endpoint: Endpoint, id: u64, body: &W) -> Result<T, NetBoxError>
    where
        W: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Updating {} {} in NetBox", endpoint.resource, id);
        let operation = Operation::new(endpoint.operation_id("update"), Method::PUT, endpoint.object_path(id))
            .with_body(serde_json::to_value(body)?);
        self.submit(operation).await?.into_typed()
    }

    /// Patch selected fields of an object (PATCH)
    pub async fn partial_update<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: u64,
        patch: Value,
    ) -> Result<T, NetBoxError> {
        debug!("Patching {} {} in NetBox", endpoint.resource, id);
        let operation = Operation::new(
            endpoint.operation_id("partial_update"),
            Method::PATCH,
            endpoint.object_path(id),
        )
        .with_body(patch);
        self.submit(operation).await?.into_typed()
    }

    /// Delete an object
    pub async fn delete(&self, endpoint: Endpoint, id: u64) -> Result<(), NetBoxError> {
        debug!("Deleting {} {} from NetBox", endpoint.resource, id);
        let operation = Operation::new(endpoint.operation_id("delete"), Method::DELETE, endpoint.object_path(id));
        self.submit(operation).await?;
        Ok(())
    }

    /// Create a journal entry attached to an object
    pub async fn create_journal_entry(&self, entry: &WritableJournalEntry) -> Result<JournalEntry, NetBoxError> {
        self.create(endpoints::EXTRAS_JOURNAL_ENTRIES, entry).await
    }
}
