use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use super::{AccessError, SessionContext, SessionError};
use crate::imaging::{self, CompressionProfile, ImagingError};
use crate::model::CitizenProfile;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("please fill in: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Edits coming from the profile form
#[derive(Debug, Clone)]
pub enum ProfileMessage {
    FullNameChanged(String),
    PhoneChanged(String),
    AddressChanged(String),
    WardChanged(String),
    DobChanged(String),
    CityChanged(String),
}

/// Edit buffer for the citizen profile.
///
/// The form works on a copy; nothing reaches the session store until
/// `save` succeeds, so opening and abandoning the form changes nothing.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    draft: CitizenProfile,
}

impl ProfileForm {
    /// Start editing the signed-in citizen's profile
    pub fn open(session: &SessionContext) -> Result<Self, AccessError> {
        let mut draft = session.require_signed_in()?.clone();
        if draft.full_name.trim().is_empty() {
            draft.full_name = draft.name.clone();
        }
        Ok(Self { draft })
    }

    pub fn profile(&self) -> &CitizenProfile {
        &self.draft
    }

    pub fn update(&mut self, message: ProfileMessage) {
        let draft = &mut self.draft;
        match message {
            ProfileMessage::FullNameChanged(v) => draft.full_name = v,
            ProfileMessage::PhoneChanged(v) => draft.phone = v,
            ProfileMessage::AddressChanged(v) => draft.address = v,
            ProfileMessage::WardChanged(v) => draft.ward_no = v,
            ProfileMessage::DobChanged(v) => draft.dob = v,
            ProfileMessage::CityChanged(v) => draft.city = v,
        }
    }

    /// Replace the avatar with a 300x300 crop of the picked file.
    ///
    /// Returns `false` when the picker was cancelled.
    pub async fn set_picture(&mut self, path: Option<PathBuf>) -> Result<bool, ProfileError> {
        match imaging::compress_file(path, CompressionProfile::Avatar).await? {
            Some(image) => {
                self.draft.picture = image.into_data_url();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Validate, mark complete and persist
    pub fn save(
        mut self,
        session: &mut SessionContext,
        now: DateTime<Utc>,
    ) -> Result<CitizenProfile, ProfileError> {
        let missing = self.draft.missing_required_fields();
        if !missing.is_empty() {
            return Err(ProfileError::Incomplete(missing));
        }

        for field in [
            &mut self.draft.full_name,
            &mut self.draft.phone,
            &mut self.draft.city,
        ] {
            *field = field.trim().to_string();
        }
        self.draft.is_profile_complete = true;
        self.draft.setup_date = Some(now.format("%m/%d/%Y").to_string());

        session.save_citizen(self.draft.clone())?;
        info!(email = %self.draft.email, city = %self.draft.city, "profile saved");
        Ok(self.draft)
    }
}
