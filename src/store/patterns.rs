//! Commit pattern and repository configuration data access.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::analysis::CommitStyle;
use crate::store::StoreError;

/// A stored commit-message convention with its usage counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitPattern {
    /// Commit type token, e.g. a conventional-commit type.
    pub commit_type: String,
    /// The accepted message text.
    pub message_format: String,
    /// How many times this exact message has been used.
    pub frequency: i64,
}

/// Per-repository configuration persisted by `gitflow init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Inferred default branch name.
    pub branch_pattern: String,
    /// Detected commit style.
    pub commit_style: CommitStyle,
}

/// Data access object for commit patterns and repository configuration.
///
/// Writes are single-statement upserts, so concurrent gitflow processes on
/// the same repository never corrupt a counter or duplicate a row.
#[derive(Clone)]
pub struct PatternStore {
    conn: Arc<Mutex<Connection>>,
}

impl PatternStore {
    /// Creates a store over a database connection.
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Records an accepted commit message. A row with the same repository,
    /// type, and exact message text has its frequency incremented and
    /// `last_used` refreshed; otherwise a new row starts at frequency 1.
    ///
    /// Dedup is exact text match: near-duplicate messages stay separate.
    pub fn record_pattern(
        &self,
        repo_path: &str,
        commit_type: &str,
        message_format: &str,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO commit_patterns (repo_path, commit_type, message_format, frequency, last_used)
             VALUES (?1, ?2, ?3, 1, ?4)
             ON CONFLICT(repo_path, commit_type, message_format) DO UPDATE SET
                 frequency = frequency + 1,
                 last_used = ?4",
            params![repo_path, commit_type, message_format, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns up to `limit` patterns for a repository, most frequent first,
    /// ties broken by most recent use.
    pub fn top_patterns(
        &self,
        repo_path: &str,
        limit: usize,
    ) -> Result<Vec<CommitPattern>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT commit_type, message_format, frequency
             FROM commit_patterns
             WHERE repo_path = ?1
             ORDER BY frequency DESC, last_used DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![repo_path, limit as i64], |row| {
            Ok(CommitPattern {
                commit_type: row.get(0)?,
                message_format: row.get(1)?,
                frequency: row.get(2)?,
            })
        })?;

        let mut patterns = Vec::new();
        for pattern in rows {
            patterns.push(pattern?);
        }
        Ok(patterns)
    }

    /// Saves (or replaces) the configuration row for a repository.
    pub fn save_config(
        &self,
        repo_path: &str,
        branch_pattern: &str,
        commit_style: CommitStyle,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO repo_config (repo_path, branch_pattern, commit_style, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(repo_path) DO UPDATE SET
                 branch_pattern = excluded.branch_pattern,
                 commit_style = excluded.commit_style",
            params![
                repo_path,
                branch_pattern,
                commit_style.to_string(),
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Returns the configuration for a repository, if one was saved.
    pub fn get_config(&self, repo_path: &str) -> Result<Option<RepoConfig>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let config = conn
            .query_row(
                "SELECT branch_pattern, commit_style FROM repo_config WHERE repo_path = ?1",
                params![repo_path],
                |row| {
                    let branch_pattern: String = row.get(0)?;
                    let style: String = row.get(1)?;
                    Ok((branch_pattern, style))
                },
            )
            .optional()?;

        Ok(config.map(|(branch_pattern, style)| RepoConfig {
            branch_pattern,
            commit_style: style.parse().unwrap_or(CommitStyle::Standard),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;
    use tempfile::tempdir;

    fn setup_store() -> (tempfile::TempDir, PatternStore) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        let store = PatternStore::new(db.connection());
        (dir, store)
    }

    #[test]
    fn record_same_message_increments_frequency() {
        let (_dir, store) = setup_store();

        store.record_pattern("/repo", "feat", "feat: add parser").unwrap();
        store.record_pattern("/repo", "feat", "feat: add parser").unwrap();

        let patterns = store.top_patterns("/repo", 10).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].frequency, 2);
    }

    #[test]
    fn record_different_message_creates_new_row() {
        let (_dir, store) = setup_store();

        store.record_pattern("/repo", "feat", "feat: add parser").unwrap();
        store.record_pattern("/repo", "feat", "feat: add lexer").unwrap();

        let patterns = store.top_patterns("/repo", 10).unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().all(|p| p.frequency == 1));
    }

    #[test]
    fn top_patterns_orders_by_frequency_and_respects_limit() {
        let (_dir, store) = setup_store();

        store.record_pattern("/repo", "fix", "fix: one").unwrap();
        for _ in 0..3 {
            store.record_pattern("/repo", "feat", "feat: popular").unwrap();
        }
        store.record_pattern("/repo", "docs", "docs: two").unwrap();
        store.record_pattern("/repo", "docs", "docs: two").unwrap();
        store.record_pattern("/repo", "chore", "chore: rare").unwrap();

        let patterns = store.top_patterns("/repo", 3).unwrap();
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0].message_format, "feat: popular");
        assert_eq!(patterns[0].frequency, 3);
        assert_eq!(patterns[1].message_format, "docs: two");
        // "fix: one" and "chore: rare" tie at frequency 1; the more
        // recently recorded one wins the last slot.
        assert_eq!(patterns[2].message_format, "chore: rare");
    }

    #[test]
    fn equal_frequency_ties_rank_most_recent_first() {
        let (_dir, store) = setup_store();

        store.record_pattern("/repo", "feat", "feat: earlier").unwrap();
        store.record_pattern("/repo", "fix", "fix: later").unwrap();

        let patterns = store.top_patterns("/repo", 10).unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().all(|p| p.frequency == 1));
        assert_eq!(patterns[0].message_format, "fix: later");
        assert_eq!(patterns[1].message_format, "feat: earlier");
    }

    #[test]
    fn top_patterns_isolates_repositories() {
        let (_dir, store) = setup_store();

        store.record_pattern("/repo-a", "feat", "feat: a").unwrap();
        store.record_pattern("/repo-b", "feat", "feat: b").unwrap();

        let patterns = store.top_patterns("/repo-a", 10).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].message_format, "feat: a");
    }

    #[test]
    fn config_upsert_replaces_both_fields() {
        let (_dir, store) = setup_store();

        store
            .save_config("/repo", "master", CommitStyle::Standard)
            .unwrap();
        store
            .save_config("/repo", "main", CommitStyle::Conventional)
            .unwrap();

        let config = store.get_config("/repo").unwrap().unwrap();
        assert_eq!(config.branch_pattern, "main");
        assert_eq!(config.commit_style, CommitStyle::Conventional);
    }

    #[test]
    fn get_config_missing_repo_is_none() {
        let (_dir, store) = setup_store();
        assert!(store.get_config("/nowhere").unwrap().is_none());
    }
}
