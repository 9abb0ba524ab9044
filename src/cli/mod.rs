//! CLI interface for gitflow.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commit;
pub mod display;
pub mod init;
pub mod prompt;
pub mod rebase;
pub mod review;

pub use commit::CommitCommand;
pub use init::InitCommand;
pub use rebase::RebaseSafeCommand;
pub use review::ReviewCommand;

/// gitflow: smart Git workflow assistant.
#[derive(Parser)]
#[command(name = "gitflow")]
#[command(about = "Smart Git workflow assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize gitflow for this repository.
    Init(InitCommand),
    /// Generate smart commit messages based on staged changes.
    Commit(CommitCommand),
    /// Review recent commits for potential issues.
    Review(ReviewCommand),
    /// Check if rebasing is safe.
    #[command(name = "rebase-safe")]
    RebaseSafe(RebaseSafeCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init(cmd) => cmd.execute(),
            Commands::Commit(cmd) => cmd.execute(),
            Commands::Review(cmd) => cmd.execute(),
            Commands::RebaseSafe(cmd) => cmd.execute(),
        }
    }
}
