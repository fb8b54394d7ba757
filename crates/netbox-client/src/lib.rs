//! NetBox REST API Client
//!
//! A Rust client library for the NetBox REST API. Every call is described as an
//! [`Operation`] and executed by a [`Transport`], which lets decorators such as
//! [`AuditJournalTransport`] observe every write without touching call sites.
//!
//! # Example
//!
//! ```no_run
//! use netbox_client::{endpoints, Asn, AuditJournalTransport, HttpTransport, NetBoxClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = HttpTransport::new(
//!     reqwest::Client::new(),
//!     "http://netbox:80".to_string(),
//!     "your-api-token".to_string(),
//! );
//! let journaled = AuditJournalTransport::new(Arc::new(http), "Changed by Terraform");
//! let client = NetBoxClient::new(Arc::new(journaled));
//!
//! // Creates the ASN, then a journal entry on ipam.asn <id>
//! let asn: Asn = client
//!     .create(endpoints::IPAM_ASNS, &serde_json::json!({"asn": 65000, "rir": 1}))
//!     .await?;
//! # let _ = asn;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Typed CRUD**: list/read/create/update/partial-update/delete per endpoint
//! - **Pagination**: Support for fetching all pages of large result sets
//! - **Audit journal**: Optional journal entry after every create/update
//! - **Mocking**: In-memory transport behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod journal;
pub mod models;
#[path = "trait.rs"]
pub mod netbox_trait;
pub mod operation;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;


pub use client::{endpoints, Endpoint, NetBoxClient};
pub use common::{HttpTransport, PaginatedResponse};
pub use error::NetBoxError;
pub use journal::{AuditJournalTransport, JournalFailurePolicy, SkipReason};
pub use models::*;
pub use netbox_trait::Transport;
pub use operation::{ApiResponse, HasIdentifiablePayload, Operation, JOURNAL_ENTRY_CREATE};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;
