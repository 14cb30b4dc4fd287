use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::filter::ReportStats;
use super::{position, ViewError};
use crate::model::{Confirmation, Report, ReportId};
use crate::store::{ReportQuery, ReportStore, StoreError};
use crate::workflow::{authorize_delete, plan, Action, Actor};

/// "My reports": the signed-in citizen's own reports, newest first.
///
/// Local state only changes after the store accepted a write, so a failed
/// confirmation or withdrawal leaves the list exactly as it was.
pub struct CitizenDashboard {
    store: Arc<dyn ReportStore>,
    actor: Actor,
    email: String,
    reports: Vec<Report>,
}

impl CitizenDashboard {
    pub fn new(store: Arc<dyn ReportStore>, email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            store,
            actor: Actor::citizen(email.clone()),
            email,
            reports: Vec::new(),
        }
    }

    /// Reload the citizen's reports from the store
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let query = ReportQuery::by_reporter(self.email.clone()).newest_first();
        self.reports = self.store.query(&query).await?;
        Ok(())
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Total, resolved and pending (legacy records without a status count as pending)
    pub fn stats(&self) -> ReportStats {
        ReportStats::tally(&self.reports)
    }

    /// Resolved reports still waiting for the citizen's answer
    pub fn pending_confirmations(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(|r| r.needs_confirmation())
    }

    /// Answer "did the fix solve your problem?"
    #[instrument(skip(self), fields(email = %self.email))]
    pub async fn confirm(&mut self, id: &ReportId, answer: Confirmation) -> Result<(), ViewError> {
        let idx = position(&self.reports, id)?;
        let patch = plan(
            &self.reports[idx],
            &self.actor,
            Action::Confirm(answer),
            Utc::now(),
        )?;

        self.store.update(id, patch.clone()).await?;
        patch.apply_to(&mut self.reports[idx]);
        info!(%id, answer = answer.as_str(), status = %self.reports[idx].status, "confirmation recorded");
        Ok(())
    }

    /// Delete one of the citizen's own reports
    #[instrument(skip(self), fields(email = %self.email))]
    pub async fn withdraw(&mut self, id: &ReportId) -> Result<(), ViewError> {
        let idx = position(&self.reports, id)?;
        authorize_delete(&self.reports[idx], &self.actor)?;

        self.store.delete(id).await?;
        self.reports.remove(idx);
        info!(%id, "report withdrawn");
        Ok(())
    }
}
