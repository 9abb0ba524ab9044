//! Review command — scans recent commits for potential issues.

use anyhow::Result;
use clap::Parser;

use crate::analysis::analyze_diff;
use crate::cli::display;
use crate::git::{short_hash, GitRepository};

/// Review command options.
#[derive(Parser)]
pub struct ReviewCommand {
    /// Number of commits to review.
    #[arg(short = 'n', long = "number", default_value_t = 5)]
    pub count: usize,
}

impl ReviewCommand {
    /// Executes the review command.
    pub fn execute(self) -> Result<()> {
        display::header("Commit Review");

        let repo = GitRepository::discover()?;
        let commits = repo.recent_commits(self.count)?;

        if commits.is_empty() {
            display::warning("No commits found.");
            return Ok(());
        }

        display::info(&format!("Reviewing last {} commit(s)...", commits.len()));
        println!();

        let mut total_issues = 0;

        for commit in &commits {
            println!("📝 {}: {}", short_hash(&commit.hash), commit.summary());
            println!("   Author: {}", commit.author);
            println!("   Date: {}", commit.date.to_rfc2822());
            println!();

            // Patch and file list are fetched independently per commit.
            let diff = repo.commit_patch(&commit.hash)?;
            let files = repo.commit_files(&commit.hash)?;

            let issues = analyze_diff(&diff, &files);
            if issues.is_empty() {
                display::success("No issues found.");
                println!();
                continue;
            }

            total_issues += issues.len();
            for issue in &issues {
                println!(
                    "   {} [{}] {}",
                    display::severity_icon(issue.severity),
                    issue.severity.to_string().to_uppercase(),
                    issue.kind
                );
                println!("      {}", issue.message);
                if let Some(line) = issue.line {
                    println!("      Line: {line}");
                }
            }
            println!();
        }

        display::separator();
        if total_issues == 0 {
            display::success(&format!("All {} commit(s) look good!", commits.len()));
        } else {
            display::warning(&format!(
                "Found {} potential issue(s) across {} commit(s)",
                total_issues,
                commits.len()
            ));
        }

        Ok(())
    }
}
