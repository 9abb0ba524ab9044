//! Init command — analyzes the repository and persists its configuration.

use anyhow::{Context, Result};
use clap::Parser;

use crate::analysis::{detect_commit_style, CommitStyle};
use crate::cli::display::{self, StatusLine};
use crate::git::GitRepository;
use crate::store::{Database, PatternStore};

/// How many commits to sample when detecting the commit style.
const STYLE_SAMPLE_SIZE: usize = 20;

/// Init command options.
#[derive(Parser)]
pub struct InitCommand {}

impl InitCommand {
    /// Executes the init command.
    pub fn execute(self) -> Result<()> {
        let db = Database::open_default().context("Failed to open the gitflow store")?;
        let store = PatternStore::new(db.connection());
        self.run(&store)
    }

    fn run(self, store: &PatternStore) -> Result<()> {
        display::header("GitFlow Initialization");

        let repo = GitRepository::discover()?;
        let status = StatusLine::start("Analyzing repository...");

        let root = repo.root()?;
        let root = root.to_string_lossy();
        let branches = match repo.branches(false) {
            Ok(branches) => branches,
            Err(e) => {
                status.fail();
                return Err(e);
            }
        };
        let commits = match repo.recent_commits(STYLE_SAMPLE_SIZE) {
            Ok(commits) => commits,
            Err(e) => {
                status.fail();
                return Err(e);
            }
        };

        let branch_pattern = if branches.iter().any(|b| b.contains("main")) {
            "main"
        } else if branches.iter().any(|b| b.contains("master")) {
            "master"
        } else {
            "develop"
        };

        let messages: Vec<String> = commits.iter().map(|c| c.message.clone()).collect();
        let commit_style = if messages.is_empty() {
            CommitStyle::Standard
        } else {
            detect_commit_style(&messages)
        };

        store.save_config(&root, branch_pattern, commit_style)?;
        status.succeed();

        success_summary(&root, branch_pattern, commit_style, branches.len());
        if messages.is_empty() {
            display::info("No commit history yet; defaulting to the standard commit style.");
        }

        Ok(())
    }
}

fn success_summary(root: &str, branch_pattern: &str, style: CommitStyle, branch_count: usize) {
    display::success(&format!("Repository: {root}"));
    display::info(&format!("Default branch: {branch_pattern}"));
    display::info(&format!("Commit style: {style}"));
    display::info(&format!("Total branches: {branch_count}"));
    println!();
    display::success("GitFlow initialized! You can now use:");
    println!("  • gitflow commit      - Smart commit message generation");
    println!("  • gitflow review      - Review commits for issues");
    println!("  • gitflow rebase-safe - Check rebase safety");
}
