//! Audit journal transport
//!
//! [`AuditJournalTransport`] wraps another [`Transport`] and, after every successful
//! create or update, writes a NetBox journal entry against the object that was
//! changed. Call sites do not opt in: the decorator is installed once when the
//! client is built.
//!
//! Per call:
//! 1. delegate to the wrapped transport, propagating its error untouched;
//! 2. skip the journal-entry call itself, GET and DELETE;
//! 3. derive `<group>.<model>` from the operation identifier;
//! 4. take the object ID from the response payload;
//! 5. create the journal entry through a client over the wrapped transport.
//!
//! Nothing is retried. Under [`JournalFailurePolicy::FailClosed`] a failed journal
//! write replaces the primary result with [`NetBoxError::JournalWriteFailed`], even
//! though the primary change already happened server-side.

use crate::client::NetBoxClient;
use crate::error::NetBoxError;
use crate::models::{JournalEntryKind, WritableJournalEntry};
use crate::netbox_trait::Transport;
use crate::operation::{ApiResponse, HasIdentifiablePayload, Operation};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extracts the ID of the affected object from a response
pub type PayloadIdExtractor = fn(&ApiResponse) -> Option<u64>;

/// What to do when the journal entry cannot be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalFailurePolicy {
    /// Report the journal failure as the result of the call
    #[default]
    FailClosed,
    /// Log the journal failure and return the primary result
    FailOpen,
}

impl FromStr for JournalFailurePolicy {
    type Err = NetBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fail-closed" | "closed" => Ok(Self::FailClosed),
            "fail-open" | "open" => Ok(Self::FailOpen),
            other => Err(NetBoxError::InvalidRequest(format!(
                "unknown journal failure policy '{other}', expected 'fail-closed' or 'fail-open'"
            ))),
        }
    }
}

/// Why an operation was not journaled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The operation is the journal-entry create call
    JournalCall,
    /// GET or DELETE
    NotMutating,
    /// The operation identifier has no `<group>_<model>_<verb>` shape
    UnknownObjectType,
    /// The response carries no object ID
    NoObjectId,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::JournalCall => "journal-entry call",
            SkipReason::NotMutating => "read or delete",
            SkipReason::UnknownObjectType => "no object type in operation id",
            SkipReason::NoObjectId => "no object id in response",
        };
        f.write_str(reason)
    }
}

/// Transport decorator writing a journal entry after each create/update
pub struct AuditJournalTransport {
    inner: Arc<dyn Transport>,
    journal: NetBoxClient,
    comment: String,
    policy: JournalFailurePolicy,
    extractors: HashMap<String, PayloadIdExtractor>,
}

impl fmt::Debug for AuditJournalTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditJournalTransport")
            .field("comment", &self.comment)
            .field("policy", &self.policy)
            .field("extractors", &self.extractors.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl AuditJournalTransport {
    /// Wrap `inner`, journaling with a fixed `comment`
    pub fn new(inner: Arc<dyn Transport>, comment: impl Into<String>) -> Self {
        Self {
            journal: NetBoxClient::new(Arc::clone(&inner)),
            inner,
            comment: comment.into(),
            policy: JournalFailurePolicy::default(),
            extractors: HashMap::new(),
        }
    }

    /// Set the journal failure policy
    #[must_use]
    pub fn with_failure_policy(mut self, policy: JournalFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use `extractor` instead of the payload `id` for one operation identifier
    #[must_use]
    pub fn with_id_extractor(mut self, operation_id: impl Into<String>, extractor: PayloadIdExtractor) -> Self {
        self.extractors.insert(operation_id.into(), extractor);
        self
    }

    /// The comment written into every journal entry
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The configured failure policy
    pub fn failure_policy(&self) -> JournalFailurePolicy {
        self.policy
    }

    /// Object type and ID to journal for a completed operation
    pub fn journal_target(&self, operation: &Operation, response: &ApiResponse) -> Result<(String, u64), SkipReason> {
        if operation.is_journal_create() {
            return Err(SkipReason::JournalCall);
        }
        if operation.is_read_or_delete() {
            return Err(SkipReason::NotMutating);
        }

        let object_type = operation.object_type().ok_or(SkipReason::UnknownObjectType)?;
        let object_id = match self.extractors.get(&operation.id) {
            Some(extract) => extract(response),
            None => response.payload_id(),
        }
        .ok_or(SkipReason::NoObjectId)?;

        Ok((object_type, object_id))
    }
}

#[async_trait::async_trait]
impl Transport for AuditJournalTransport {
    async fn submit(&self, operation: Operation) -> Result<ApiResponse, NetBoxError> {
        let descriptor = Operation::new(operation.id.clone(), operation.method.clone(), operation.path.clone());
        let response = self.inner.submit(operation).await?;

        let (object_type, object_id) = match self.journal_target(&descriptor, &response) {
            Ok(target) => target,
            Err(reason) => {
                debug!("Not journaling {}: {}", descriptor.id, reason);
                return Ok(response);
            }
        };

        let entry = WritableJournalEntry {
            assigned_object_type: object_type.clone(),
            assigned_object_id: object_id,
            comments: self.comment.clone(),
            kind: JournalEntryKind::Success,
            tags: Vec::new(),
        };

        match self.journal.create_journal_entry(&entry).await {
            Ok(created) => {
                info!(
                    "Journaled {} on {} {} (entry ID: {})",
                    descriptor.id, object_type, object_id, created.id
                );
                Ok(response)
            }
            Err(e) => match self.policy {
                JournalFailurePolicy::FailClosed => Err(NetBoxError::JournalWriteFailed {
                    object_type,
                    object_id,
                    source: Box::new(e),
                }),
                JournalFailurePolicy::FailOpen => {
                    warn!(
                        "Failed to write journal entry for {} {} after {}: {}",
                        object_type, object_id, descriptor.id, e
                    );
                    Ok(response)
                }
            },
        }
    }
}
