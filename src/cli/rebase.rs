//! Rebase-safe command — checks whether rebasing is safe before anyone
//! rewrites history.

use std::io::{self, BufRead, IsTerminal};

use anyhow::{bail, Result};
use clap::Parser;

use crate::analysis::{RebaseSafetyReport, SafetyVerdict};
use crate::cli::display::{self, StatusLine};
use crate::cli::prompt;
use crate::git::GitRepository;

/// Rebase-safe command options.
#[derive(Parser)]
pub struct RebaseSafeCommand {
    /// Target branch to rebase onto.
    #[arg(short, long)]
    pub target: Option<String>,
}

impl RebaseSafeCommand {
    /// Executes the rebase-safe command.
    pub fn execute(self) -> Result<()> {
        let stdin = io::stdin();
        let is_terminal = stdin.is_terminal();
        let mut reader = stdin.lock();
        self.run(is_terminal, &mut reader)
    }

    /// Runs the flow with an injected reader so tests can script the target
    /// branch selection.
    pub fn run(self, is_terminal: bool, reader: &mut dyn BufRead) -> Result<()> {
        display::header("Rebase Safety Check");

        let repo = GitRepository::discover()?;

        // A dirty tree is unsafe to even attempt.
        if repo.has_uncommitted_changes()? {
            display::error("You have uncommitted changes.");
            bail!("Commit or stash your changes before rebasing");
        }

        let current_branch = repo.current_branch();

        let target_branch = match self.target {
            Some(target) => target,
            None => {
                let others: Vec<String> = repo
                    .branches(false)?
                    .into_iter()
                    .filter(|b| *b != current_branch)
                    .collect();

                if others.is_empty() {
                    bail!("No other branches found");
                }

                match prompt::select_one(
                    "Select target branch to rebase onto:",
                    &others,
                    is_terminal,
                    reader,
                )? {
                    Some(branch) => branch,
                    None => {
                        display::warning("Rebase check cancelled.");
                        return Ok(());
                    }
                }
            }
        };

        display::info(&format!("Current branch: {current_branch}"));
        display::info(&format!("Target branch: {target_branch}"));
        println!();

        let status = StatusLine::start("Analyzing branches...");
        // These degrade to 0/empty if the target ref cannot be resolved.
        let commits_ahead = repo.commits_ahead(&current_branch, &target_branch);
        let commits_behind = repo.commits_behind(&current_branch, &target_branch);
        let shared_commits = repo.shared_commits(&current_branch, &target_branch);
        let branch_on_remote = repo
            .branches(true)?
            .iter()
            .any(|b| b.contains(&current_branch));
        status.succeed();

        println!("Branch Analysis:");
        println!();
        display::info(&format!("Commits ahead of {target_branch}: {commits_ahead}"));
        display::info(&format!("Commits behind {target_branch}: {commits_behind}"));
        println!();

        if commits_behind == 0 {
            display::success("Your branch is up to date with target.");
        } else {
            display::info(&format!("Target has {commits_behind} new commit(s)."));
        }

        if !shared_commits.is_empty() {
            display::error(&format!(
                "DANGER: Found {} shared commit(s)!",
                shared_commits.len()
            ));
        }

        if branch_on_remote {
            display::warning("Branch exists on remote.");
        }

        let report = RebaseSafetyReport::evaluate(
            &current_branch,
            &target_branch,
            commits_ahead,
            commits_behind,
            shared_commits,
            branch_on_remote,
        );

        println!();
        display::separator();
        println!();

        if !report.warnings.is_empty() {
            println!("Warnings:");
            println!();
            for warning in &report.warnings {
                display::warning(&format!("  • {warning}"));
            }
            println!();
        }

        match report.verdict() {
            SafetyVerdict::Safe => {
                display::success("Rebase appears SAFE!");
                display::info(&format!("You can proceed with: git rebase {target_branch}"));
            }
            SafetyVerdict::PossibleWithCaution => {
                display::warning("Rebase is possible but requires caution.");
                display::info("Review warnings above before proceeding.");
            }
            SafetyVerdict::NotRecommended => {
                display::error("Rebase is NOT RECOMMENDED!");
                display::info(&format!(
                    "Consider using merge instead: git merge {target_branch}"
                ));
            }
        }

        Ok(())
    }
}
