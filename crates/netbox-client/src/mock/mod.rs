//! Mock transport for unit testing
//!
//! This module provides an in-memory implementation of [`Transport`] that can be used
//! in unit tests without requiring a running NetBox instance. It understands the
//! generic `/api/<group>/<resource>/[<id>/]` layout, so every endpoint works without
//! per-type code.
//!
//! - `helpers.rs` - path routing, object decoration and merge semantics

mod helpers;

use crate::client::{endpoints, Endpoint};
use crate::error::NetBoxError;
use crate::netbox_trait::Transport;
use crate::operation::{ApiResponse, Operation};
use helpers::Route;
use reqwest::Method;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Page size used when a list request carries no `limit`
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Mock transport for testing
///
/// Stores objects in memory per collection path, records every submitted
/// operation, and can be told to fail specific operations.
/// Clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub(crate) base_url: String,
    // In-memory storage keyed by collection path, e.g. "/api/ipam/asns/"
    pub(crate) objects: Arc<Mutex<HashMap<String, BTreeMap<u64, Value>>>>,
    pub(crate) submitted: Arc<Mutex<Vec<Operation>>>,
    // Operation ID -> error message
    pub(crate) failures: Arc<Mutex<HashMap<String, String>>>,
    pub(crate) version: Arc<Mutex<String>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            submitted: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            version: Arc::new(Mutex::new("4.1.0".to_string())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Set the version reported by `/api/status/`
    #[must_use]
    pub fn with_version(self, version: impl Into<String>) -> Self {
        *lock(&self.version) = version.into();
        self
    }

    /// Set the ID assigned to the next created object
    pub fn set_next_id(&self, id: u64) {
        *lock(&self.next_id) = id;
    }

    /// Make every future submission of `operation_id` fail with an API error
    pub fn fail_operation(&self, operation_id: impl Into<String>, message: impl Into<String>) {
        lock(&self.failures).insert(operation_id.into(), message.into());
    }

    /// Stop failing `operation_id`
    pub fn clear_failure(&self, operation_id: &str) {
        lock(&self.failures).remove(operation_id);
    }

    /// Add an object to the mock store (for test setup) and return its ID
    pub fn insert(&self, endpoint: Endpoint, object: Value) -> u64 {
        let id = self.next_id();
        let path = endpoint.collection_path();
        let object = helpers::decorate(&self.base_url, &path, id, object);
        lock(&self.objects).entry(path).or_default().insert(id, object);
        id
    }

    /// Get a stored object
    pub fn get(&self, endpoint: Endpoint, id: u64) -> Option<Value> {
        lock(&self.objects)
            .get(&endpoint.collection_path())
            .and_then(|collection| collection.get(&id))
            .cloned()
    }

    /// All stored journal entries, in creation order
    pub fn journal_entries(&self) -> Vec<Value> {
        lock(&self.objects)
            .get(&endpoints::EXTRAS_JOURNAL_ENTRIES.collection_path())
            .map(|collection| collection.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every operation submitted so far, including failed ones
    pub fn submitted(&self) -> Vec<Operation> {
        lock(&self.submitted).clone()
    }

    /// IDs of every operation submitted so far
    pub fn submitted_ids(&self) -> Vec<String> {
        lock(&self.submitted).iter().map(|op| op.id.clone()).collect()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    fn list(&self, collection: &str, operation: &Operation) -> ApiResponse {
        let param = |name: &str| -> Option<usize> {
            operation
                .query
                .iter()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse().ok())
        };
        let limit = param("limit").unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let offset = param("offset").unwrap_or(0);

        let objects = lock(&self.objects);
        let all: Vec<Value> = objects
            .get(collection)
            .map(|c| {
                c.values()
                    .filter(|object| helpers::matches_filters(object, &operation.query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let results: Vec<Value> = all.iter().skip(offset).take(limit).cloned().collect();
        let next = (offset + limit < all.len()).then(|| {
            format!("{}{}?limit={}&offset={}", self.base_url, collection, limit, offset + limit)
        });

        ApiResponse::new(
            200,
            Some(json!({
                "count": all.len(),
                "next": next,
                "previous": Value::Null,
                "results": results,
            })),
        )
    }

    fn create(&self, collection: &str, body: Option<Value>) -> Result<ApiResponse, NetBoxError> {
        let mut body = body.unwrap_or_else(|| json!({}));
        let id = self.next_id();
        let mut objects = lock(&self.objects);
        resolve_references(&objects, &mut body)?;
        let object = helpers::decorate(&self.base_url, collection, id, body);
        objects
            .entry(collection.to_string())
            .or_default()
            .insert(id, object.clone());
        Ok(ApiResponse::new(201, Some(object)))
    }

    fn modify(&self, collection: &str, id: u64, body: Option<Value>) -> Result<ApiResponse, NetBoxError> {
        let mut objects = lock(&self.objects);
        let body = match body {
            Some(mut body) => {
                resolve_references(&objects, &mut body)?;
                Some(body)
            }
            None => None,
        };
        let object = objects
            .get_mut(collection)
            .and_then(|c| c.get_mut(&id))
            .ok_or_else(|| NetBoxError::NotFound(format!("{}{}/ not found", collection, id)))?;
        if let Some(body) = body {
            helpers::merge(object, body);
        }
        helpers::touch(object);
        Ok(ApiResponse::new(200, Some(object.clone())))
    }
}

/// Replace related-object references in a write body with their nested form.
///
/// NetBox accepts `"rir": 3` and `"tags": [{"name": .., "slug": ..}]` but answers with
/// nested objects, and rejects references to objects that do not exist.
fn resolve_references(
    objects: &HashMap<String, BTreeMap<u64, Value>>,
    body: &mut Value,
) -> Result<(), NetBoxError> {
    let Value::Object(fields) = body else {
        return Ok(());
    };

    for (field, endpoint) in [("rir", endpoints::IPAM_RIRS), ("tenant", endpoints::TENANCY_TENANTS)] {
        let Some(id) = fields.get(field).and_then(Value::as_u64) else {
            continue;
        };
        let related = objects
            .get(&endpoint.collection_path())
            .and_then(|c| c.get(&id))
            .ok_or_else(|| NetBoxError::InvalidRequest(format!("{field}: related object {id} does not exist")))?;
        fields.insert(field.to_string(), helpers::nested(related));
    }

    if let Some(Value::Array(tags)) = fields.get_mut("tags") {
        let known = objects.get(&endpoints::EXTRAS_TAGS.collection_path());
        for tag in tags.iter_mut() {
            let slug = tag.get("slug").and_then(Value::as_str);
            let name = tag.get("name").and_then(Value::as_str);
            let stored = known
                .and_then(|c| {
                    c.values().find(|t| {
                        (slug.is_some() && t.get("slug").and_then(Value::as_str) == slug)
                            || (name.is_some() && t.get("name").and_then(Value::as_str) == name)
                    })
                })
                .ok_or_else(|| NetBoxError::InvalidRequest(format!("tags: no tag matches {tag}")))?;
            *tag = helpers::nested(stored);
        }
    }

    Ok(())
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn submit(&self, operation: Operation) -> Result<ApiResponse, NetBoxError> {
        lock(&self.submitted).push(operation.clone());

        if let Some(message) = lock(&self.failures).get(&operation.id) {
            return Err(NetBoxError::Api(message.clone()));
        }

        let route = Route::parse(&operation.path)
            .ok_or_else(|| NetBoxError::NotFound(format!("no route for {}", operation.path)))?;

        match (route, operation.method.clone()) {
            (Route::Status, Method::GET) => Ok(ApiResponse::new(
                200,
                Some(json!({ "netbox-version": lock(&self.version).clone() })),
            )),
            (Route::Collection(collection), Method::GET) => Ok(self.list(&collection, &operation)),
            (Route::Collection(collection), Method::POST) => self.create(&collection, operation.body),
            (Route::Object(collection, id), Method::GET) => lock(&self.objects)
                .get(&collection)
                .and_then(|c| c.get(&id))
                .cloned()
                .map(|object| ApiResponse::new(200, Some(object)))
                .ok_or_else(|| NetBoxError::NotFound(format!("{}{}/ not found", collection, id))),
            (Route::Object(collection, id), Method::PUT | Method::PATCH) => {
                self.modify(&collection, id, operation.body)
            }
            (Route::Object(collection, id), Method::DELETE) => lock(&self.objects)
                .get_mut(&collection)
                .and_then(|c| c.remove(&id))
                .map(|_| ApiResponse::new(204, None))
                .ok_or_else(|| NetBoxError::NotFound(format!("{}{}/ not found", collection, id))),
            (_, method) => Err(NetBoxError::InvalidRequest(format!(
                "{} not supported on {}",
                method, operation.path
            ))),
        }
    }
}
