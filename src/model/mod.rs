/// Data model module
///
/// These types represent the report collection as it flows between
/// the document store, the submission workflow and the dashboards:
/// - Reports, status, priority and citizen confirmation (report.rs)
/// - The fixed problem-category set (category.rs)
/// - The static city reference table (city.rs)
/// - Citizen profile / session payload (profile.rs)

pub mod category;
pub mod city;
pub mod profile;
pub mod report;

pub use category::Category;
pub use city::{City, Viewport, NATIONAL_VIEW};
pub use profile::{CitizenProfile, ANONYMOUS_CITIZEN};
pub use report::{
    Confirmation, NewReport, Priority, Report, ReportId, ReportPatch, ReportStatus,
};
