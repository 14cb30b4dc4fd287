use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::draft::ReportDraft;
use crate::model::{CitizenProfile, NewReport, ReportId};
use crate::store::{ReportStore, StoreError};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Required fields the draft is still missing; nothing was written
    #[error("please complete: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("sign in before reporting")]
    SignedOut,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReportDraft {
    /// Build the record to create, or list what is missing
    pub fn to_new_report(
        &self,
        profile: &CitizenProfile,
        now: DateTime<Utc>,
    ) -> Result<NewReport, SubmitError> {
        if profile.email.trim().is_empty() {
            return Err(SubmitError::SignedOut);
        }

        let missing = self.missing_fields();
        let (Some(category), Some(city), Some(evidence), true) = (
            self.category(),
            self.city(),
            self.evidence(),
            missing.is_empty(),
        ) else {
            return Err(SubmitError::Incomplete(missing));
        };

        Ok(NewReport {
            email: profile.email.clone(),
            citizen_name: profile.reporter_name().to_string(),
            category,
            description: self.description().trim().to_string(),
            image: evidence.image.data_url().to_string(),
            location: evidence.location,
            priority: evidence.priority,
            ai_analysis: evidence.summary.clone(),
            city: city.name.to_string(),
            created_at: now,
        })
    }
}

/// Persist a verified draft as a new Pending report.
///
/// Validation happens before any store call, so an incomplete draft never
/// produces a write. The draft itself is left for the caller to reset.
#[instrument(skip_all, fields(email = %profile.email))]
pub async fn submit(
    store: &dyn ReportStore,
    draft: &ReportDraft,
    profile: &CitizenProfile,
) -> Result<ReportId, SubmitError> {
    let report = draft.to_new_report(profile, Utc::now()).map_err(|e| {
        warn!(error = %e, "submission refused");
        e
    })?;
    let category = report.category;
    let priority = report.priority;

    let id = store.create(report).await?;
    info!(%id, %category, %priority, "report submitted");
    Ok(id)
}
