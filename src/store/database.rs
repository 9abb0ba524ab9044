//! SQLite store lifecycle.
//!
//! Opening the store is an explicit startup step: the application directory
//! is created, the connection opened, and the schema applied before any data
//! access. Tests substitute a temporary path via [`Database::open`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS commit_patterns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    repo_path TEXT NOT NULL,
    commit_type TEXT NOT NULL,
    message_format TEXT NOT NULL,
    frequency INTEGER NOT NULL DEFAULT 1,
    last_used TEXT NOT NULL,
    UNIQUE(repo_path, commit_type, message_format)
);

CREATE TABLE IF NOT EXISTS repo_config (
    repo_path TEXT PRIMARY KEY,
    branch_pattern TEXT NOT NULL,
    commit_style TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patterns_repo ON commit_patterns(repo_path);
CREATE INDEX IF NOT EXISTS idx_patterns_type ON commit_patterns(commit_type);
"#;

/// Errors raised by the persistent store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The per-user application directory could not be determined.
    #[error("Failed to determine home directory")]
    NoHomeDir,
    /// The application directory could not be created.
    #[error("Failed to create store directory: {0}")]
    CreateDir(std::io::Error),
    /// A connection lock was poisoned by a panicking thread.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    /// Path to the database file.
    pub path: PathBuf,
}

impl Database {
    /// Opens or creates a database at the specified path and applies the
    /// schema.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Opens the database in the default location, `~/.gitflow/gitflow.db`.
    pub fn open_default() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Self::open(home.join(".gitflow").join("gitflow.db"))
    }

    /// Returns a handle to the connection for data access objects.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store").join("test.db");
        let db = Database::open(path.clone()).unwrap();
        assert!(path.exists());

        let conn = db.connection();
        let conn = conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('commit_patterns', 'repo_config')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        drop(Database::open(path.clone()).unwrap());
        Database::open(path).unwrap();
    }
}
