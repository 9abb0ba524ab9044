//! Persistent, repository-scoped memory of accepted commit conventions.

pub mod database;
pub mod patterns;

pub use database::{Database, StoreError};
pub use patterns::{CommitPattern, PatternStore, RepoConfig};
