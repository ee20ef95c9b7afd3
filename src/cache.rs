use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use wargatui::api::UserProfile;

/// Signed-in session persisted between runs
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub profile: Option<UserProfile>,
    pub base_url: String,
}

/// SQLite store for the bearer token and the last fetched profile
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        let cache_dir = Self::get_cache_dir();
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create {}", cache_dir.display()))?;

        let conn = Connection::open(cache_dir.join("session.db"))?;
        Self::with_connection(conn)
    }

    /// Throwaway store for tests
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = SessionStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn get_cache_dir() -> PathBuf {
        match dirs::cache_dir() {
            Some(cache_dir) => cache_dir.join("wargatui"),
            // Fallback to the temp dir if no cache dir available
            None => crate::utils::get_cache_fallback_path(),
        }
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                base_url TEXT NOT NULL,
                token TEXT NOT NULL,
                profile_json TEXT,
                saved_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Session saved for this server, if any
    ///
    /// A session saved for another `base_url` is ignored; a profile that no
    /// longer decodes is dropped and refetched later.
    pub fn load(&self, base_url: &str) -> Result<Option<StoredSession>> {
        let row = self
            .conn
            .query_row(
                "SELECT base_url, token, profile_json FROM session WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((stored_url, token, profile_json)) = row else {
            return Ok(None);
        };
        if stored_url != base_url {
            tracing::debug!(stored_url, "ignoring session saved for another server");
            return Ok(None);
        }

        let profile = profile_json.and_then(|json| match serde_json::from_str(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "stored profile no longer decodes");
                None
            }
        });

        Ok(Some(StoredSession {
            token,
            profile,
            base_url: stored_url,
        }))
    }

    pub fn save(&self, base_url: &str, token: &str, profile: Option<&UserProfile>) -> Result<()> {
        let profile_json = profile.map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT OR REPLACE INTO session (id, base_url, token, profile_json, saved_at)
             VALUES (1, ?1, ?2, ?3, ?4)",
            params![
                base_url,
                token,
                profile_json,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM session", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wargatui::api::Role;

    const URL: &str = "http://localhost:8000/api";

    fn profile() -> UserProfile {
        UserProfile {
            id: 3,
            name: "Bu Ani".to_string(),
            email: Some("ani@example.id".to_string()),
            phone: None,
            role: Role::PemilikKost,
            rt: None,
            rw: None,
        }
    }

    #[test]
    fn test_empty_store() {
        let store = SessionStore::in_memory().unwrap();
        assert!(store.load(URL).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let store = SessionStore::in_memory().unwrap();
        store.save(URL, "tok-1", Some(&profile())).unwrap();

        let session = store.load(URL).unwrap().unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.profile, Some(profile()));
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let store = SessionStore::in_memory().unwrap();
        store.save(URL, "old", Some(&profile())).unwrap();
        store.save(URL, "new", None).unwrap();

        let session = store.load(URL).unwrap().unwrap();
        assert_eq!(session.token, "new");
        assert!(session.profile.is_none());
    }

    #[test]
    fn test_other_server_session_is_ignored() {
        let store = SessionStore::in_memory().unwrap();
        store.save("https://other.example.id/api", "tok", None).unwrap();
        assert!(store.load(URL).unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let store = SessionStore::in_memory().unwrap();
        store.save(URL, "tok", None).unwrap();
        store.clear().unwrap();
        assert!(store.load(URL).unwrap().is_none());
    }
}
