use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

use super::document::{decode, encode_new, encode_patch, Document};
use super::{ReportQuery, ReportStore, Snapshot, StoreError, Subscription};
use crate::model::{NewReport, Report, ReportId, ReportPatch};

/// In-process report collection with live snapshots.
///
/// Documents are kept in insertion order and stored in their encoded form,
/// so legacy-shaped documents can be seeded and read back through the same
/// shim a remote store would use.
pub struct MemoryStore {
    docs: Mutex<Vec<(ReportId, Document)>>,
    snapshots: watch::Sender<Snapshot>,
    offline: AtomicBool,
    pub write_calls: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let (snapshots, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            docs: Mutex::new(Vec::new()),
            snapshots,
            offline: AtomicBool::new(false),
            write_calls: AtomicU64::new(0),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a network outage: every call fails until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Seed a raw document, e.g. one written by an older client
    pub async fn insert_document(&self, id: ReportId, doc: Document) {
        let mut docs = self.docs.lock().await;
        docs.retain(|(existing, _)| *existing != id);
        docs.push((id, doc));
        self.publish(&docs);
    }

    /// Raw stored fields for one report
    pub async fn document(&self, id: &ReportId) -> Option<Document> {
        self.docs
            .lock()
            .await
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, doc)| doc.clone())
    }

    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store is offline".into()))
        } else {
            Ok(())
        }
    }

    fn decode_all(docs: &[(ReportId, Document)]) -> Vec<Report> {
        docs.iter()
            .filter_map(|(id, doc)| match decode(id, doc) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(error = %e, "skipping undecodable report");
                    None
                }
            })
            .collect()
    }

    /// Push a fresh full snapshot to every subscriber
    fn publish(&self, docs: &[(ReportId, Document)]) {
        let snapshot = Arc::new(Self::decode_all(docs));
        debug!(reports = snapshot.len(), "publishing snapshot");
        self.snapshots.send_replace(snapshot);
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn create(&self, report: NewReport) -> Result<ReportId, StoreError> {
        self.check_online()?;
        self.write_calls.fetch_add(1, Ordering::Relaxed);

        let id = ReportId::new(Uuid::new_v4().simple().to_string());
        let mut docs = self.docs.lock().await;
        docs.push((id.clone(), encode_new(&report)));
        self.publish(&docs);
        Ok(id)
    }

    async fn update(&self, id: &ReportId, patch: ReportPatch) -> Result<(), StoreError> {
        self.check_online()?;
        self.write_calls.fetch_add(1, Ordering::Relaxed);

        let mut docs = self.docs.lock().await;
        let (_, doc) = docs
            .iter_mut()
            .find(|(existing, _)| existing == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        doc.extend(encode_patch(&patch));
        self.publish(&docs);
        Ok(())
    }

    async fn delete(&self, id: &ReportId) -> Result<(), StoreError> {
        self.check_online()?;
        self.write_calls.fetch_add(1, Ordering::Relaxed);

        let mut docs = self.docs.lock().await;
        let before = docs.len();
        docs.retain(|(existing, _)| existing != id);
        if docs.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.publish(&docs);
        Ok(())
    }

    async fn query(&self, query: &ReportQuery) -> Result<Vec<Report>, StoreError> {
        self.check_online()?;
        let docs = self.docs.lock().await;
        let reports = Self::decode_all(&docs);
        Ok(query.apply(reports.iter()))
    }

    fn subscribe(&self, query: ReportQuery) -> Subscription {
        Subscription::new(self.snapshots.subscribe(), query)
    }
}
