//! Sign-in for citizens (external identity provider) and administrators
//! (configured allow-list plus passphrase).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::CitizenProfile;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("sign-in was cancelled")]
    Cancelled,

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("the identity provider returned no email address")]
    MissingEmail,

    #[error("access denied")]
    Denied,

    #[error("administrator sign-in is not configured")]
    NotConfigured,
}

/// Identity returned by the provider's popup flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
}

/// External identity provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self) -> Result<AuthUser, AuthError>;
}

impl TryFrom<AuthUser> for CitizenProfile {
    type Error = AuthError;

    /// A fresh citizen session; the profile form fills in the rest
    fn try_from(user: AuthUser) -> Result<Self, Self::Error> {
        let email = user
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(AuthError::MissingEmail)?;
        Ok(CitizenProfile {
            uid: user.uid,
            name: user.display_name.unwrap_or_default(),
            email,
            photo: user.photo_url.unwrap_or_default(),
            phone: user.phone_number.unwrap_or_default(),
            ..CitizenProfile::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRole {
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,
}

/// A signed-in administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub email: String,
    pub role: AdminRole,
    pub token: String,
    /// Milliseconds since the Unix epoch
    pub login_time: i64,
}

impl AdminSession {
    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.login_time)
    }
}

/// Who may sign in as an administrator
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    emails: Vec<String>,
    passphrase: Option<String>,
}

impl AdminDirectory {
    pub fn new<I, S>(emails: I, passphrase: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            passphrase: passphrase.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_authorized(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.emails.iter().any(|e| *e == email)
    }

    /// Check the credentials and mint a session
    pub fn sign_in(
        &self,
        email: &str,
        passphrase: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, AuthError> {
        let expected = self.passphrase.as_deref().ok_or(AuthError::NotConfigured)?;
        if !self.is_authorized(email) || passphrase != expected {
            return Err(AuthError::Denied);
        }
        Ok(AdminSession {
            email: email.trim().to_string(),
            role: AdminRole::SuperAdmin,
            token: format!("SESSION_{}", Uuid::new_v4().simple()),
            login_time: now.timestamp_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> AdminDirectory {
        AdminDirectory::new(
            ["admin.chennai@example.com", " Team.One@example.com "],
            Some("correct horse".into()),
        )
    }

    #[test]
    fn test_admin_sign_in() {
        let now = Utc::now();
        let session = directory()
            .sign_in("ADMIN.chennai@example.com", "correct horse", now)
            .unwrap();
        assert_eq!(session.role, AdminRole::SuperAdmin);
        assert!(session.token.starts_with("SESSION_"));
        assert_eq!(session.login_time, now.timestamp_millis());
        assert!(directory().is_authorized("team.one@example.com"));
    }

    #[test]
    fn test_admin_sign_in_rejections() {
        let now = Utc::now();
        assert_eq!(
            directory().sign_in("admin.chennai@example.com", "wrong", now),
            Err(AuthError::Denied)
        );
        assert_eq!(
            directory().sign_in("intruder@example.com", "correct horse", now),
            Err(AuthError::Denied)
        );
        let unconfigured = AdminDirectory::new(["admin.chennai@example.com"], None);
        assert_eq!(
            unconfigured.sign_in("admin.chennai@example.com", "", now),
            Err(AuthError::NotConfigured)
        );
    }

    #[test]
    fn test_session_serializes_like_older_clients() {
        let session = AdminSession {
            email: "admin@example.com".into(),
            role: AdminRole::SuperAdmin,
            token: "SESSION_x".into(),
            login_time: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["role"], "SUPER_ADMIN");
        assert_eq!(json["loginTime"], 1_700_000_000_000i64);
        assert!(session.logged_in_at().is_some());
    }

    #[test]
    fn test_citizen_from_provider_identity() {
        let profile = CitizenProfile::try_from(AuthUser {
            uid: "g-123".into(),
            display_name: Some("Asha Raman".into()),
            email: Some("asha@example.com".into()),
            photo_url: None,
            phone_number: None,
        })
        .unwrap();
        assert_eq!(profile.name, "Asha Raman");
        assert_eq!(profile.phone, "");
        assert!(!profile.is_profile_complete);

        assert_eq!(
            CitizenProfile::try_from(AuthUser::default()),
            Err(AuthError::MissingEmail)
        );
    }
}
