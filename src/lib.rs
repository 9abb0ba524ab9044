//! # gitflow
//!
//! A smart Git workflow assistant.
//!
//! gitflow inspects repository state (staged changes, branch divergence,
//! commit history) and produces advisory output: suggested commit messages,
//! safety assessments before a rebase, and lightweight review flags on
//! recent commits. It learns a repository's commit-message conventions from
//! accepted messages and biases future suggestions accordingly.
//!
//! All heuristics are deterministic and all git queries are local.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod git;
pub mod store;

pub use crate::cli::Cli;

/// The current version of gitflow.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
