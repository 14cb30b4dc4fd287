/// Reporting workflow module
///
/// This module handles:
/// - The report form state and its verified evidence (draft.rs)
/// - Photo capture through the gate and the locator (capture.rs)
/// - Turning a ready draft into a stored report (submit.rs)
/// - Actor-scoped status transitions (lifecycle.rs)

pub mod capture;
pub mod draft;
pub mod lifecycle;
pub mod submit;

pub use capture::{CaptureError, CapturePipeline};
pub use draft::{DraftError, DraftMessage, Evidence, ReportDraft};
pub use lifecycle::{authorize_delete, plan, Action, Actor, TransitionError};
pub use submit::{submit, SubmitError};
