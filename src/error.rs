//! Crate-wide error type
//!
//! Each module owns its error enum; `Error` wraps them for callers that
//! drive several modules and only want one `?` target.

use thiserror::Error;

use crate::config::ConfigError;
use crate::imaging::ImagingError;
use crate::session::{AccessError, AuthError, ProfileError, SessionError};
use crate::store::StoreError;
use crate::views::ViewError;
use crate::workflow::{CaptureError, DraftError, SubmitError, TransitionError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl Error {
    /// Errors the user can fix by changing their input, as opposed to
    /// infrastructure failures worth retrying
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Draft(_)
                | Error::Submit(SubmitError::Incomplete(_))
                | Error::Capture(CaptureError::Rejected { .. } | CaptureError::NoCategory)
                | Error::Profile(ProfileError::Incomplete(_))
                | Error::Access(_)
                | Error::Transition(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> Result<()> {
        let submitted: Result<(), SubmitError> = Err(SubmitError::Incomplete(vec!["city"]));
        submitted?;
        Ok(())
    }

    #[test]
    fn test_question_mark_converts() {
        let err = fails().unwrap_err();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "please complete: city");
    }

    #[test]
    fn test_store_failures_are_not_user_errors() {
        let err = Error::from(StoreError::Unavailable("offline".into()));
        assert!(!err.is_user_error());
    }
}
