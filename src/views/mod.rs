/// Read-side views module
///
/// Derived, read-only slices of the report collection plus the few
/// actions each screen offers:
/// - Facet filtering and headline counters (filter.rs)
/// - The signed-in citizen's own reports (citizen.rs)
/// - The live admin dashboard (admin.rs)
/// - The public issue map (map.rs)

pub mod admin;
pub mod citizen;
pub mod filter;
pub mod map;

use thiserror::Error;

use crate::model::{Report, ReportId};
use crate::store::StoreError;
use crate::workflow::TransitionError;

pub use admin::AdminDashboard;
pub use citizen::CitizenDashboard;
pub use filter::{Facet, FacetFilter, Filtered, ReportStats};
pub use map::{Marker, PublicMap};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("report {0} is not in this view")]
    UnknownReport(ReportId),

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn position(reports: &[Report], id: &ReportId) -> Result<usize, ViewError> {
    reports
        .iter()
        .position(|r| &r.id == id)
        .ok_or_else(|| ViewError::UnknownReport(id.clone()))
}
