/// Session module
///
/// Who is signed in, and the local file that remembers it:
/// - The SQLite-backed key/value session file (store.rs)
/// - Citizen and administrator sign-in (auth.rs)
/// - The profile form that completes a citizen session (profile.rs)
///
/// `SessionContext` is the one object views consult for the current user;
/// nothing else reads the session file.

pub mod auth;
pub mod profile;
pub mod store;

use chrono::Utc;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::CitizenProfile;

pub use auth::{AdminDirectory, AdminRole, AdminSession, AuthError, AuthProvider, AuthUser};
pub use profile::{ProfileError, ProfileForm, ProfileMessage};
pub use store::{SessionStore, ADMIN_KEY, CITIZEN_KEY};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not determine a data directory for the session file")]
    NoDataDir,

    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Why a screen that needs a citizen cannot be shown
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("sign in to continue")]
    SignedOut,

    #[error("complete your profile to continue")]
    ProfileIncomplete,

    #[error("administrator sign-in required")]
    NotAdmin,
}

/// The current citizen and admin sessions, backed by a `SessionStore`
pub struct SessionContext {
    store: SessionStore,
    citizen: Option<CitizenProfile>,
    admin: Option<AdminSession>,
}

impl SessionContext {
    /// Load whatever sessions the file holds.
    ///
    /// An unreadable entry is discarded and treated as signed out.
    pub fn load(store: SessionStore) -> Result<Self, SessionError> {
        let citizen = Self::load_entry(&store, CITIZEN_KEY)?;
        let admin = Self::load_entry(&store, ADMIN_KEY)?;
        info!(
            citizen = citizen.is_some(),
            admin = admin.is_some(),
            "sessions loaded"
        );
        Ok(Self {
            store,
            citizen,
            admin,
        })
    }

    fn load_entry<T: serde::de::DeserializeOwned>(
        store: &SessionStore,
        key: &str,
    ) -> Result<Option<T>, SessionError> {
        match store.get(key) {
            Ok(value) => Ok(value),
            Err(SessionError::Json(e)) => {
                warn!(key, error = %e, "discarding unreadable session entry");
                store.remove(key)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    // ========== Citizen ==========

    pub fn citizen(&self) -> Option<&CitizenProfile> {
        self.citizen.as_ref()
    }

    /// Sign in through the identity provider.
    ///
    /// An existing citizen session is reused without prompting.
    pub async fn sign_in_citizen(
        &mut self,
        provider: &dyn AuthProvider,
    ) -> Result<&CitizenProfile, SessionError> {
        if self.citizen.is_none() {
            let user = provider.sign_in().await?;
            let profile = CitizenProfile::try_from(user)?;
            info!(email = %profile.email, "citizen signed in");
            self.save_citizen(profile)?;
        }
        self.require_signed_in().map_err(|_| SessionError::Auth(AuthError::Denied))
    }

    /// Persist the citizen session, replacing the previous one
    pub fn save_citizen(&mut self, profile: CitizenProfile) -> Result<(), SessionError> {
        self.store.put(CITIZEN_KEY, &profile)?;
        self.citizen = Some(profile);
        Ok(())
    }

    pub fn sign_out_citizen(&mut self) -> Result<(), SessionError> {
        self.store.remove(CITIZEN_KEY)?;
        if let Some(profile) = self.citizen.take() {
            info!(email = %profile.email, "citizen signed out");
        }
        Ok(())
    }

    pub fn require_signed_in(&self) -> Result<&CitizenProfile, AccessError> {
        self.citizen.as_ref().ok_or(AccessError::SignedOut)
    }

    /// The report form and the citizen dashboard need a complete profile
    pub fn require_complete_profile(&self) -> Result<&CitizenProfile, AccessError> {
        let profile = self.require_signed_in()?;
        if profile.is_profile_complete {
            Ok(profile)
        } else {
            Err(AccessError::ProfileIncomplete)
        }
    }

    // ========== Admin ==========

    pub fn admin(&self) -> Option<&AdminSession> {
        self.admin.as_ref()
    }

    pub fn sign_in_admin(
        &mut self,
        directory: &AdminDirectory,
        email: &str,
        passphrase: &str,
    ) -> Result<&AdminSession, SessionError> {
        let session = directory.sign_in(email, passphrase, Utc::now()).map_err(|e| {
            warn!(email, "admin sign-in refused");
            e
        })?;
        self.store.put(ADMIN_KEY, &session)?;
        info!(email = %session.email, "admin signed in");
        Ok(self.admin.insert(session))
    }

    pub fn sign_out_admin(&mut self) -> Result<(), SessionError> {
        self.store.remove(ADMIN_KEY)?;
        self.admin = None;
        Ok(())
    }

    pub fn require_admin(&self) -> Result<&AdminSession, AccessError> {
        self.admin.as_ref().ok_or(AccessError::NotAdmin)
    }
}
