use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::SessionError;

/// Key holding the signed-in citizen
pub const CITIZEN_KEY: &str = "citizen";

/// Key holding the admin session
pub const ADMIN_KEY: &str = "adminUser";

/// Local key/value file holding the signed-in sessions.
///
/// Values are JSON documents, so a record written by an older client with
/// fewer fields still loads.
pub struct SessionStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SessionStore {
    /// Open (or create) the session database at `db_path`
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let db_path = db_path.into();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&db_path)?;
        let store = SessionStore { conn, db_path };
        store.init_schema()?;

        info!(path = %store.db_path.display(), "session store opened");
        Ok(store)
    }

    /// In-memory store, for previews and tests
    pub fn open_in_memory() -> Result<Self, SessionError> {
        let store = SessionStore {
            conn: Connection::open_in_memory()?,
            db_path: PathBuf::from(":memory:"),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Where the session file lives by default:
    /// - Linux: ~/.local/share/civic-report/session.db
    /// - macOS: ~/Library/Application Support/civic-report/session.db
    /// - Windows: %APPDATA%\civic-report\session.db
    pub fn default_path() -> Result<PathBuf, SessionError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(SessionError::NoDataDir)?;
        path.push("civic-report");
        path.push("session.db");
        Ok(path)
    }

    fn init_schema(&self) -> Result<(), SessionError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                key             TEXT PRIMARY KEY,
                value_json      TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Read and deserialize one entry
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value_json FROM sessions WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace one entry
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionError> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO sessions (key, value_json, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json,
                                            updated_at = excluded.updated_at",
            params![key, json, chrono::Utc::now().timestamp()],
        )?;
        debug!(key, "session entry saved");
        Ok(())
    }

    /// Remove one entry; returns whether it existed
    pub fn remove(&self, key: &str) -> Result<bool, SessionError> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE key = ?1", params![key])?;
        debug!(key, removed, "session entry removed");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CitizenProfile;
    use tempfile::tempdir;

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");

        let profile = CitizenProfile {
            email: "asha@example.com".into(),
            city: "Chennai".into(),
            ..CitizenProfile::default()
        };
        {
            let store = SessionStore::open(&path).unwrap();
            store.put(CITIZEN_KEY, &profile).unwrap();
        }

        let store = SessionStore::open(&path).unwrap();
        let loaded: Option<CitizenProfile> = store.get(CITIZEN_KEY).unwrap();
        assert_eq!(loaded, Some(profile));
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_put_replaces_and_remove_reports() {
        let store = SessionStore::open_in_memory().unwrap();
        store.put("k", &1u32).unwrap();
        store.put("k", &2u32).unwrap();
        assert_eq!(store.get::<u32>("k").unwrap(), Some(2));

        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert_eq!(store.get::<u32>("k").unwrap(), None);
    }

    #[test]
    fn test_legacy_session_shape_loads() {
        let store = SessionStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO sessions (key, value_json, updated_at) VALUES (?1, ?2, 0)",
                params![
                    CITIZEN_KEY,
                    r#"{"name":"Asha","email":"asha@example.com","photo":"","phone":"","city":"","address":"","uid":"u1"}"#
                ],
            )
            .unwrap();
        let loaded: CitizenProfile = store.get(CITIZEN_KEY).unwrap().unwrap();
        assert_eq!(loaded.uid, "u1");
        assert!(!loaded.is_profile_complete);
    }
}
