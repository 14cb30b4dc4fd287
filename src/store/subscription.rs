use std::sync::Arc;
use tokio::sync::watch;

use super::ReportQuery;
use crate::model::Report;

/// Full collection snapshot published by a store
pub type Snapshot = Arc<Vec<Report>>;

/// A live query over the report collection.
///
/// Each call to `next_snapshot` yields the complete result set of the
/// query; consumers replace their local list rather than merging. The first
/// call returns immediately with the current state. Dropping the
/// subscription (or calling `unsubscribe`) ends it.
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
    query: ReportQuery,
    primed: bool,
}

impl Subscription {
    pub fn new(rx: watch::Receiver<Snapshot>, query: ReportQuery) -> Self {
        Self {
            rx,
            query,
            primed: false,
        }
    }

    pub fn query(&self) -> &ReportQuery {
        &self.query
    }

    /// Wait for the next snapshot; `None` once the store has gone away
    pub async fn next_snapshot(&mut self) -> Option<Vec<Report>> {
        if self.primed {
            self.rx.changed().await.ok()?;
        }
        self.primed = true;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(self.query.apply(snapshot.iter()))
    }

    /// A snapshot is waiting that has not been read yet
    pub fn has_update(&self) -> bool {
        !self.primed || self.rx.has_changed().unwrap_or(false)
    }

    /// End the subscription
    pub fn unsubscribe(self) {}
}
