//! Commit command — suggestion-driven commit flow.

use std::io::{self, BufRead, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;

use crate::analysis::generate_commit_suggestion;
use crate::cli::display::{self, StatusLine};
use crate::cli::prompt;
use crate::git::GitRepository;
use crate::store::{Database, PatternStore};

/// Menu entry that switches to free-text message entry.
const CUSTOM_MESSAGE_CHOICE: &str = "Write custom message";

/// How many stored patterns to offer alongside the fresh suggestion.
const PATTERN_CANDIDATES: usize = 3;

/// Commit command options.
#[derive(Parser)]
pub struct CommitCommand {
    /// Use this commit message directly, skipping the suggestion flow.
    #[arg(short, long)]
    pub message: Option<String>,

    /// Skip git hooks (passes --no-verify).
    #[arg(long)]
    pub skip_hooks: bool,
}

impl CommitCommand {
    /// Executes the commit command.
    pub fn execute(self) -> Result<()> {
        let db = Database::open_default().context("Failed to open the gitflow store")?;
        let store = PatternStore::new(db.connection());

        let stdin = io::stdin();
        let is_terminal = stdin.is_terminal();
        let mut reader = stdin.lock();
        self.run(&store, is_terminal, &mut reader)
    }

    /// Runs the flow with an injected reader so tests can script the
    /// selection and confirmation steps.
    pub fn run(
        self,
        store: &PatternStore,
        is_terminal: bool,
        reader: &mut dyn BufRead,
    ) -> Result<()> {
        display::header("Smart Commit");

        let repo = GitRepository::discover()?;

        let staged = repo.staged_files()?;
        if staged.is_empty() {
            // Nothing staged is an advisory, not an error: exit zero.
            display::warning("No staged files found.");
            display::info("Use \"git add <files>\" to stage changes first.");
            return Ok(());
        }

        display::info(&format!("Staged files ({}):", staged.len()));
        for file in &staged {
            println!("  • {file}");
        }
        println!();

        // A literal message bypasses suggestions entirely.
        if let Some(message) = self.message {
            let status = StatusLine::start("Committing changes...");
            match repo.commit(&message, self.skip_hooks) {
                Ok(()) => status.succeed(),
                Err(e) => {
                    status.fail();
                    return Err(e);
                }
            }
            display::success(&format!("Committed: {message}"));
            return Ok(());
        }

        let status = StatusLine::start("Analyzing changes...");
        let diff = match repo.diff(true) {
            Ok(diff) => diff,
            Err(e) => {
                status.fail();
                return Err(e);
            }
        };
        status.succeed();

        let suggestion = generate_commit_suggestion(&diff, &staged);
        let root = repo.root()?;
        let root = root.to_string_lossy();
        let patterns = store.top_patterns(&root, PATTERN_CANDIDATES)?;

        // Candidates are deduplicated by exact text. Stored patterns render
        // as the type token prefixed to the recorded subject, so a
        // conventional subject shows a doubled type here ("fix: fix: ...");
        // that rendering is intentional, not a formatting bug.
        let mut candidates = vec![suggestion.formatted()];
        for pattern in &patterns {
            let message = format!("{}: {}", pattern.commit_type, pattern.message_format);
            if !candidates.contains(&message) {
                candidates.push(message);
            }
        }
        candidates.push(CUSTOM_MESSAGE_CHOICE.to_string());

        let selected = match prompt::select_one(
            "Select commit message:",
            &candidates,
            is_terminal,
            reader,
        )? {
            Some(choice) => choice,
            None => {
                display::warning("Commit cancelled.");
                return Ok(());
            }
        };

        let final_message = if selected == CUSTOM_MESSAGE_CHOICE {
            match prompt::prompt_text(
                "Enter commit message",
                prompt::non_empty,
                is_terminal,
                reader,
            )? {
                Some(text) => text,
                None => {
                    display::warning("Commit cancelled.");
                    return Ok(());
                }
            }
        } else {
            selected
        };

        let confirmed = prompt::confirm(
            &format!("Commit with message: \"{final_message}\"?"),
            true,
            is_terminal,
            reader,
        )?;
        if !confirmed {
            display::warning("Commit cancelled.");
            return Ok(());
        }

        let status = StatusLine::start("Committing changes...");
        match repo.commit(&final_message, self.skip_hooks) {
            Ok(()) => status.succeed(),
            Err(e) => {
                status.fail();
                return Err(e);
            }
        }

        // Reinforce the accepted pattern: the type is the text before the
        // first colon (the whole message when there is none).
        let commit_type = final_message
            .split(':')
            .next()
            .unwrap_or(&final_message)
            .trim();
        store.record_pattern(&root, commit_type, &final_message)?;

        display::success("Committed successfully!");
        display::info(&format!("Message: {final_message}"));

        Ok(())
    }
}
