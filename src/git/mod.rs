//! Git operations and repository queries.

use thiserror::Error;

pub mod repository;

pub use repository::{CommitInfo, GitRepository};

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 7;

/// Errors raised by git operations.
///
/// Divergence queries (ahead/behind counts, shared commits) never raise:
/// they degrade to zero/empty values instead, because they feed advisory
/// heuristics where a false "no divergence" is safer than crashing a
/// safety check.
#[derive(Error, Debug)]
pub enum GitError {
    /// The working directory is not inside a git repository.
    #[error("Not a git repository (run \"git init\" first)")]
    NotARepository,

    /// The git backend rejected a commit, e.g. nothing staged or a hook
    /// failure. Carries the backend's own message.
    #[error("Commit failed: {0}")]
    CommitFailed(String),
}

/// Truncates a commit hash to [`SHORT_HASH_LEN`] characters.
pub fn short_hash(hash: &str) -> &str {
    if hash.len() > SHORT_HASH_LEN {
        &hash[..SHORT_HASH_LEN]
    } else {
        hash
    }
}
