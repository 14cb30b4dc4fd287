use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::filter::{FacetFilter, Filtered};
use super::{position, ViewError};
use crate::model::{Report, ReportId};
use crate::store::{ReportQuery, ReportStore, Subscription};
use crate::workflow::{authorize_delete, plan, Action, Actor};

/// Live view over every report, newest first, with facets and counters
pub struct AdminDashboard {
    store: Arc<dyn ReportStore>,
    subscription: Subscription,
    reports: Vec<Report>,
    filter: FacetFilter,
}

impl AdminDashboard {
    pub fn open(store: Arc<dyn ReportStore>) -> Self {
        let subscription = store.subscribe(ReportQuery::all().newest_first());
        Self {
            store,
            subscription,
            reports: Vec::new(),
            filter: FacetFilter::default(),
        }
    }

    /// Wait for the next snapshot and replace the local list with it.
    ///
    /// Returns `false` once the store has closed the subscription.
    pub async fn refresh(&mut self) -> bool {
        match self.subscription.next_snapshot().await {
            Some(snapshot) => {
                debug!(reports = snapshot.len(), "admin snapshot");
                self.reports = snapshot;
                true
            }
            None => false,
        }
    }

    /// Apply a snapshot only if one is already waiting
    pub async fn catch_up(&mut self) -> bool {
        if self.subscription.has_update() {
            self.refresh().await
        } else {
            false
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn filter(&self) -> &FacetFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FacetFilter) {
        self.filter = filter;
    }

    /// The filtered table and the counters for exactly that table
    pub fn view(&self) -> Filtered {
        self.filter.apply(&self.reports)
    }

    /// Pending → In-Progress
    pub async fn assign(&mut self, id: &ReportId) -> Result<(), ViewError> {
        self.transition(id, Action::AssignForAction).await
    }

    /// Pending / In-Progress → Resolved
    pub async fn resolve(&mut self, id: &ReportId) -> Result<(), ViewError> {
        self.transition(id, Action::MarkFixed).await
    }

    #[instrument(skip(self))]
    async fn transition(&mut self, id: &ReportId, action: Action) -> Result<(), ViewError> {
        let idx = position(&self.reports, id)?;
        let patch = plan(&self.reports[idx], &Actor::Admin, action, Utc::now())?;

        self.store.update(id, patch.clone()).await?;
        patch.apply_to(&mut self.reports[idx]);
        info!(%id, status = %self.reports[idx].status, "status updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: &ReportId) -> Result<(), ViewError> {
        let idx = position(&self.reports, id)?;
        authorize_delete(&self.reports[idx], &Actor::Admin)?;

        self.store.delete(id).await?;
        self.reports.remove(idx);
        info!(%id, "report deleted");
        Ok(())
    }

    /// Stop listening for snapshots
    pub fn close(self) {
        self.subscription.unsubscribe();
    }
}
