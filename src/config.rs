use std::{
    env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr, sync::Arc,
    time::Duration,
};

use thiserror::Error;
use tracing::{info, warn};

use crate::session::{AdminDirectory, SessionError, SessionStore};
use crate::triage::{GeminiClassifier, TriageGate};
use crate::views::map::DEFAULT_MAP_LIMIT;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_CLASSIFIER_TIMEOUT_SECS: &str = "20";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Runtime settings, read from `CIVIC_*` environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Empty when unset; the gate then fails open on every photo
    pub gemini_key: String,
    pub gemini_model: String,
    pub classifier_timeout: Duration,
    pub session_db: PathBuf,
    pub admin_emails: Vec<String>,
    pub admin_passphrase: Option<String>,
    pub map_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in `load`)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_db = match lookup("CIVIC_SESSION_DB") {
            Some(path) => PathBuf::from(path),
            None => {
                let path = SessionStore::default_path()?;
                info!("CIVIC_SESSION_DB not set, using default: {}", path.display());
                path
            }
        };

        let timeout_secs: u64 = try_load(
            &lookup,
            "CIVIC_CLASSIFIER_TIMEOUT_SECS",
            DEFAULT_CLASSIFIER_TIMEOUT_SECS,
        )?;
        // Zero would time out every call and silently disable the gate
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "CIVIC_CLASSIFIER_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be at least one second".into(),
            });
        }

        Ok(Self {
            gemini_key: lookup("CIVIC_GEMINI_KEY")
                .or_else(|| read_secret("CIVIC_GEMINI_KEY"))
                .map(|k| k.trim().to_string())
                .unwrap_or_else(|| {
                    warn!("CIVIC_GEMINI_KEY not set, photo triage will fall back to manual review");
                    String::new()
                }),
            gemini_model: try_load(&lookup, "CIVIC_GEMINI_MODEL", DEFAULT_GEMINI_MODEL)?,
            classifier_timeout: Duration::from_secs(timeout_secs),
            session_db,
            admin_emails: lookup("CIVIC_ADMIN_EMAILS")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|e| !e.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            admin_passphrase: lookup("CIVIC_ADMIN_PASSPHRASE").filter(|p| !p.is_empty()),
            map_limit: try_load(&lookup, "CIVIC_MAP_LIMIT", &DEFAULT_MAP_LIMIT.to_string())?,
        })
    }

    /// Gate backed by the Gemini adapter with the configured timeout
    pub fn triage_gate(&self) -> TriageGate {
        let classifier = GeminiClassifier::new(self.gemini_key.clone(), self.gemini_model.clone());
        TriageGate::new(Arc::new(classifier)).with_timeout(self.classifier_timeout)
    }

    pub fn admin_directory(&self) -> AdminDirectory {
        AdminDirectory::new(&self.admin_emails, self.admin_passphrase.clone())
    }

    pub fn open_session_store(&self) -> Result<SessionStore, ConfigError> {
        Ok(SessionStore::open(&self.session_db)?)
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            Err(ConfigError::Invalid {
                key,
                reason: e.to_string(),
                value,
            })
        }
    }
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret file: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}
