/// Report storage module
///
/// The document database is an external collaborator; this module defines
/// its contract and ships:
/// - Document encoding plus the legacy-field read shim (document.rs)
/// - The query shape the views use (query.rs)
/// - Live snapshot subscriptions (subscription.rs)
/// - An in-process store for tests and offline builds (memory.rs)

pub mod document;
pub mod memory;
pub mod query;
pub mod subscription;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{NewReport, Report, ReportId, ReportPatch};

pub use document::{Document, DocumentError};
pub use memory::MemoryStore;
pub use query::ReportQuery;
pub use subscription::{Snapshot, Subscription};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("report {0} not found")]
    NotFound(ReportId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected the write: {0}")]
    Rejected(String),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The "reports" document collection
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Create a report; the store assigns the id
    async fn create(&self, report: NewReport) -> Result<ReportId, StoreError>;

    /// Write the fields a patch sets
    async fn update(&self, id: &ReportId, patch: ReportPatch) -> Result<(), StoreError>;

    async fn delete(&self, id: &ReportId) -> Result<(), StoreError>;

    /// One-shot query
    async fn query(&self, query: &ReportQuery) -> Result<Vec<Report>, StoreError>;

    /// Live query delivering full snapshots
    fn subscribe(&self, query: ReportQuery) -> Subscription;
}
