//! Git repository queries.
//!
//! [`GitRepository`] translates git backend state into the facts the rest of
//! the crate needs, without interpreting or judging that state. All
//! operations are read-only except [`GitRepository::commit`].

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{BranchType, DiffFormat, ErrorCode, Repository, Status, StatusOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::git::GitError;

/// A single entry from the commit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full SHA-1 hash of the commit.
    pub hash: String,
    /// Commit author name and email address.
    pub author: String,
    /// Commit date with the author's timezone offset.
    pub date: DateTime<FixedOffset>,
    /// The full commit message as written by the author.
    pub message: String,
}

impl CommitInfo {
    fn from_git_commit(commit: &git2::Commit<'_>) -> Result<Self> {
        let author = format!(
            "{} <{}>",
            commit.author().name().unwrap_or("Unknown"),
            commit.author().email().unwrap_or("unknown@example.com")
        );

        let timestamp = commit.author().when();
        let date = DateTime::from_timestamp(timestamp.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(
                &FixedOffset::east_opt(timestamp.offset_minutes() * 60)
                    .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap()),
            );

        Ok(Self {
            hash: commit.id().to_string(),
            author,
            date,
            message: commit.message().unwrap_or("").to_string(),
        })
    }

    /// Returns the first line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Git repository wrapper.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Opens the repository containing the current directory.
    pub fn discover() -> Result<Self, GitError> {
        Self::discover_at(".")
    }

    /// Opens the repository containing `path`, searching parent directories.
    pub fn discover_at<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(|_| GitError::NotARepository)?;
        Ok(Self { repo })
    }

    /// Checks whether `path` is inside a git repository. Never fails: any
    /// backend error is treated as "not a repository".
    pub fn is_repository<P: AsRef<Path>>(path: P) -> bool {
        Repository::discover(path).is_ok()
    }

    /// Returns the absolute top-level path of the working tree.
    pub fn root(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .context("Repository has no working tree (bare repository)")
    }

    /// Returns the current branch name, or "unknown" when HEAD is detached
    /// or unavailable.
    pub fn current_branch(&self) -> String {
        match self.repo.head() {
            Ok(head) => match head.shorthand() {
                Some(name) if name != "HEAD" => name.to_string(),
                _ => "unknown".to_string(),
            },
            Err(_) => "unknown".to_string(),
        }
    }

    /// Returns the files in the index ready to commit, in status order.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let staged = Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_DELETED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE;

        let statuses = self
            .repo
            .statuses(Some(StatusOptions::new().include_untracked(false)))
            .context("Failed to get repository status")?;

        let mut files = Vec::new();
        for entry in statuses.iter() {
            if entry.status().intersects(staged) {
                if let Some(path) = entry.path() {
                    files.push(path.to_string());
                }
            }
        }

        Ok(files)
    }

    /// Returns the unified diff of staged changes when `staged` is true,
    /// otherwise the diff of the working tree against the index.
    pub fn diff(&self, staged: bool) -> Result<String> {
        let diff = if staged {
            let head_tree = match self.repo.head() {
                Ok(head) => Some(head.peel_to_tree().context("Failed to peel HEAD to tree")?),
                // Unborn HEAD: diff the index against an empty tree.
                Err(_) => None,
            };
            self.repo
                .diff_tree_to_index(head_tree.as_ref(), None, None)
                .context("Failed to diff index against HEAD")?
        } else {
            self.repo
                .diff_index_to_workdir(None, None)
                .context("Failed to diff working tree against index")?
        };

        render_patch(&diff)
    }

    /// Returns the most recent `count` commits reachable from HEAD, newest
    /// first. An unborn HEAD yields an empty list rather than an error.
    pub fn recent_commits(&self, count: usize) -> Result<Vec<CommitInfo>> {
        let mut walk = self.repo.revwalk().context("Failed to create revwalk")?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .context("Failed to set revwalk sorting")?;

        if let Err(e) = walk.push_head() {
            return match e.code() {
                ErrorCode::UnbornBranch | ErrorCode::NotFound => Ok(Vec::new()),
                _ => Err(e).context("Failed to start log walk from HEAD"),
            };
        }

        let mut commits = Vec::new();
        for oid in walk.take(count) {
            let oid = oid.context("Failed to read commit from walker")?;
            let commit = self
                .repo
                .find_commit(oid)
                .context("Failed to find commit")?;
            commits.push(CommitInfo::from_git_commit(&commit)?);
        }

        Ok(commits)
    }

    /// Returns local branch names, or remote branch names when `remote` is
    /// true.
    pub fn branches(&self, remote: bool) -> Result<Vec<String>> {
        let kind = if remote {
            BranchType::Remote
        } else {
            BranchType::Local
        };

        let mut names = Vec::new();
        for branch in self
            .repo
            .branches(Some(kind))
            .context("Failed to list branches")?
        {
            let (branch, _) = branch.context("Failed to read branch")?;
            if let Some(name) = branch.name().context("Branch name is not valid UTF-8")? {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Returns true if the index or working tree differs from HEAD in any
    /// tracked way. Untracked files do not count.
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        let statuses = self
            .repo
            .statuses(Some(StatusOptions::new().include_untracked(false)))
            .context("Failed to get repository status")?;

        Ok(!statuses.is_empty())
    }

    /// Counts commits reachable from `branch` but not from `target`.
    ///
    /// Degrades to 0 on any backend error (e.g. an unknown ref) instead of
    /// propagating, so comparisons against a malformed target read as "no
    /// divergence" rather than aborting the flow.
    pub fn commits_ahead(&self, branch: &str, target: &str) -> usize {
        match self.ahead_behind(branch, target) {
            Ok((ahead, _)) => ahead,
            Err(e) => {
                debug!("ahead count for {branch}..{target} failed, defaulting to 0: {e}");
                0
            }
        }
    }

    /// Counts commits reachable from `target` but not from `branch`. Same
    /// fail-soft policy as [`GitRepository::commits_ahead`].
    pub fn commits_behind(&self, branch: &str, target: &str) -> usize {
        match self.ahead_behind(branch, target) {
            Ok((_, behind)) => behind,
            Err(e) => {
                debug!("behind count for {branch}..{target} failed, defaulting to 0: {e}");
                0
            }
        }
    }

    fn ahead_behind(&self, branch: &str, target: &str) -> Result<(usize, usize)> {
        let local = self.resolve_commit_id(branch)?;
        let upstream = self.resolve_commit_id(target)?;
        self.repo
            .graph_ahead_behind(local, upstream)
            .context("Failed to compute ahead/behind counts")
    }

    /// Returns the commit hashes in the three-dot range `a...b`: commits
    /// reachable from either tip but not from their merge base. Empty on
    /// any backend error.
    pub fn shared_commits(&self, a: &str, b: &str) -> Vec<String> {
        match self.symmetric_range(a, b) {
            Ok(hashes) => hashes,
            Err(e) => {
                debug!("shared commit lookup for {a}...{b} failed, defaulting to empty: {e}");
                Vec::new()
            }
        }
    }

    fn symmetric_range(&self, a: &str, b: &str) -> Result<Vec<String>> {
        let left = self.resolve_commit_id(a)?;
        let right = self.resolve_commit_id(b)?;

        let mut walk = self.repo.revwalk().context("Failed to create revwalk")?;
        walk.push(left).context("Failed to push left tip")?;
        walk.push(right).context("Failed to push right tip")?;
        if let Ok(base) = self.repo.merge_base(left, right) {
            walk.hide(base).context("Failed to hide merge base")?;
        }

        let mut hashes = Vec::new();
        for oid in walk {
            let oid = oid.context("Failed to read commit from walker")?;
            hashes.push(oid.to_string());
        }

        Ok(hashes)
    }

    fn resolve_commit_id(&self, refspec: &str) -> Result<git2::Oid> {
        let object = self
            .repo
            .revparse_single(refspec)
            .with_context(|| format!("Failed to resolve ref: {refspec}"))?;
        let commit = object
            .peel_to_commit()
            .with_context(|| format!("Ref does not point to a commit: {refspec}"))?;
        Ok(commit.id())
    }

    /// Returns the full patch text for a single commit against its first
    /// parent (or the empty tree for a root commit).
    pub fn commit_patch(&self, hash: &str) -> Result<String> {
        let diff = self.commit_diff(hash)?;
        render_patch(&diff)
    }

    /// Returns the paths changed by a single commit.
    pub fn commit_files(&self, hash: &str) -> Result<Vec<String>> {
        let diff = self.commit_diff(hash)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            if let Some(path) = delta.new_file().path().and_then(Path::to_str) {
                files.push(path.to_string());
            }
        }

        Ok(files)
    }

    fn commit_diff(&self, hash: &str) -> Result<git2::Diff<'_>> {
        let commit = self
            .repo
            .find_commit(self.resolve_commit_id(hash)?)
            .context("Failed to find commit")?;

        let commit_tree = commit.tree().context("Failed to get commit tree")?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(
                commit
                    .parent(0)
                    .context("Failed to get parent commit")?
                    .tree()
                    .context("Failed to get parent tree")?,
            )
        } else {
            None
        };

        self.repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)
            .context("Failed to create diff")
    }

    /// Records a new commit with the given message by invoking `git commit`,
    /// so that any configured hooks run. `skip_hooks` passes `--no-verify`.
    pub fn commit(&self, message: &str, skip_hooks: bool) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("commit").arg("-m").arg(message);
        if skip_hooks {
            cmd.arg("--no-verify");
        }
        if let Ok(workdir) = self.root() {
            cmd.current_dir(workdir);
        }

        let output = cmd.output().context("Failed to execute git commit")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(GitError::CommitFailed(detail).into());
        }

        debug!("created commit: {}", message.lines().next().unwrap_or(""));
        Ok(())
    }
}

/// Formats a diff as unified patch text.
fn render_patch(diff: &git2::Diff<'_>) -> Result<String> {
    let mut patch = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = std::str::from_utf8(line.content()).unwrap_or("<binary>");
        let prefix = match line.origin() {
            '+' => "+",
            '-' => "-",
            ' ' => " ",
            '@' => "@",
            _ => "",
        };
        patch.push_str(prefix);
        patch.push_str(content);
        true
    })
    .context("Failed to format diff")?;

    Ok(patch)
}
