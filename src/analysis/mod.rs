//! Diff analysis heuristics.
//!
//! Pure functions over diff text, changed-file lists, and commit-message
//! history: risk-issue detection, commit-type/scope inference, commit-style
//! detection, and rebase safety evaluation. Everything here is stateless and
//! deterministic; no I/O.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Diffs larger than this (in characters) trigger a large-change issue.
const LARGE_DIFF_THRESHOLD: usize = 1_000_000;

/// How many characters of an offending line to embed in a secret warning.
const SECRET_SNIPPET_LEN: usize = 50;

/// How many file paths the suggestion summary lists before "and N more".
const SUMMARY_FILE_LIMIT: usize = 3;

static SECRET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["api[_-]?key", "secret", "password", "token", "aws[_-]?access"]
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
});

static CONVENTIONAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|docs|style|refactor|test|chore)(\(.+\))?: .+").unwrap()
});

const BREAKING_KEYWORDS: &[&str] = &["BREAKING CHANGE", "breaking:", "BREAKING:"];

/// Category of a review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The diff is unusually large and should probably be split.
    LargeChange,
    /// An added line looks like it may contain a credential.
    Secret,
    /// The diff announces a breaking change.
    BreakingChange,
    /// A housekeeping concern, e.g. a dependency manifest changed.
    Formatting,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::LargeChange => "large_change",
            IssueKind::Secret => "secret",
            IssueKind::BreakingChange => "breaking_change",
            IssueKind::Formatting => "formatting",
        };
        write!(f, "{s}")
    }
}

/// Severity of a review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    Low,
    /// Worth a look before pushing.
    Medium,
    /// Should be resolved before sharing the commit.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{s}")
    }
}

/// A single finding from [`analyze_diff`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewIssue {
    /// Finding category.
    pub kind: IssueKind,
    /// Finding severity.
    pub severity: Severity,
    /// Affected file path, or a sentinel ("multiple", "unknown") when the
    /// finding does not attach to a single known file.
    pub file: String,
    /// Human-readable explanation.
    pub message: String,
    /// 1-based line number within the scanned diff text, where applicable.
    pub line: Option<usize>,
}

/// A heuristic commit-message suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSuggestion {
    /// Conventional-commit type token.
    pub commit_type: String,
    /// Optional scope derived from the changed path's first segment.
    pub scope: Option<String>,
    /// Short summary listing the changed files.
    pub message: String,
    /// Optional multi-line body enumerating every changed file.
    pub body: Option<String>,
}

impl CommitSuggestion {
    /// Renders the suggestion as a conventional-commit subject line.
    pub fn formatted(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}({}): {}", self.commit_type, scope, self.message),
            None => format!("{}: {}", self.commit_type, self.message),
        }
    }
}

/// A repository's dominant commit-message convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
    /// Most messages follow the conventional-commits format.
    Conventional,
    /// No dominant machine-readable format.
    Standard,
}

impl fmt::Display for CommitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommitStyle::Conventional => "conventional",
            CommitStyle::Standard => "standard",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CommitStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conventional" => Ok(CommitStyle::Conventional),
            "standard" => Ok(CommitStyle::Standard),
            other => Err(format!("unknown commit style: {other}")),
        }
    }
}

/// Scans a diff and its changed-file list for risk signals.
///
/// All rules run independently and their findings are concatenated; nothing
/// short-circuits.
pub fn analyze_diff(diff: &str, files: &[String]) -> Vec<ReviewIssue> {
    let mut issues = Vec::new();

    if diff.len() > LARGE_DIFF_THRESHOLD {
        issues.push(ReviewIssue {
            kind: IssueKind::LargeChange,
            severity: Severity::Medium,
            file: "multiple".to_string(),
            message: "Large diff detected (>1MB). Consider splitting into smaller commits."
                .to_string(),
            line: None,
        });
    }

    // The line counter advances over every diff line, matched or not, so
    // reported line numbers index into the full diff text.
    for (index, line) in diff.lines().enumerate() {
        if !line.starts_with('+') {
            continue;
        }
        for pattern in SECRET_PATTERNS.iter() {
            if pattern.is_match(line) {
                let snippet: String = line.chars().take(SECRET_SNIPPET_LEN).collect();
                issues.push(ReviewIssue {
                    kind: IssueKind::Secret,
                    severity: Severity::High,
                    file: "unknown".to_string(),
                    message: format!("Potential secret detected: \"{snippet}...\""),
                    line: Some(index + 1),
                });
            }
        }
    }

    for keyword in BREAKING_KEYWORDS {
        if diff.contains(keyword) {
            issues.push(ReviewIssue {
                kind: IssueKind::BreakingChange,
                severity: Severity::High,
                file: "multiple".to_string(),
                message: "Breaking change detected in commit. Ensure proper versioning."
                    .to_string(),
                line: None,
            });
        }
    }

    for file in files {
        if file.contains("package.json") && diff.contains("dependencies") {
            issues.push(ReviewIssue {
                kind: IssueKind::Formatting,
                severity: Severity::Low,
                file: file.clone(),
                message: "Dependencies changed. Remember to install them.".to_string(),
                line: None,
            });
        }

        if file.ends_with(".env") || file.ends_with(".env.example") {
            issues.push(ReviewIssue {
                kind: IssueKind::Secret,
                severity: Severity::Medium,
                file: file.clone(),
                message: "Environment file changed. Verify no secrets are committed.".to_string(),
                line: None,
            });
        }
    }

    issues
}

/// Builds a commit-message suggestion from a staged diff and file list.
pub fn generate_commit_suggestion(diff: &str, files: &[String]) -> CommitSuggestion {
    let single = files.len() == 1;

    // Classification by priority, first match wins.
    let commit_type = if single && (files[0].contains("test") || files[0].contains("spec")) {
        "test"
    } else if single && (files[0].contains("README") || files[0].ends_with(".md")) {
        "docs"
    } else if files
        .iter()
        .any(|f| f.contains("config") || f.contains(".json") || f.contains(".yaml"))
    {
        "chore"
    } else if diff.contains("fix") || diff.contains("bug") {
        "fix"
    } else if diff.contains("refactor") {
        "refactor"
    } else {
        "change"
    };

    // Scope only makes sense for a single file under a directory.
    let scope = if single {
        files[0]
            .split('/')
            .next()
            .filter(|first| *first != files[0])
            .map(str::to_string)
    } else {
        None
    };

    let listed = files
        .iter()
        .take(SUMMARY_FILE_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let message = if files.len() > SUMMARY_FILE_LIMIT {
        format!(
            "update {listed} and {} more",
            files.len() - SUMMARY_FILE_LIMIT
        )
    } else {
        format!("update {listed}")
    };

    let body = if files.is_empty() {
        None
    } else {
        let listing = files
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("Modified files:\n{listing}"))
    };

    CommitSuggestion {
        commit_type: commit_type.to_string(),
        scope,
        message,
        body,
    }
}

/// Classifies a repository's commit style from its recent messages.
///
/// More than 70% of messages matching the conventional-commits pattern
/// classifies as [`CommitStyle::Conventional`]. Callers should supply at
/// least one message; an empty slice reads as [`CommitStyle::Standard`].
pub fn detect_commit_style(messages: &[String]) -> CommitStyle {
    if messages.is_empty() {
        return CommitStyle::Standard;
    }

    let matching = messages
        .iter()
        .filter(|m| CONVENTIONAL_PATTERN.is_match(m))
        .count();

    if matching as f64 / messages.len() as f64 > 0.7 {
        CommitStyle::Conventional
    } else {
        CommitStyle::Standard
    }
}

/// Three-way classification of a rebase safety report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    /// No warnings at all; rebase away.
    Safe,
    /// Safe in principle, but the warnings deserve a read first.
    PossibleWithCaution,
    /// Rebasing would rewrite history others may depend on, or there is
    /// nothing to rebase.
    NotRecommended,
}

/// The outcome of a rebase safety analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebaseSafetyReport {
    /// Branch that would be rebased.
    pub current_branch: String,
    /// Branch it would be rebased onto.
    pub target_branch: String,
    /// Commits on the current branch not on the target.
    pub commits_ahead: usize,
    /// Commits on the target not on the current branch.
    pub commits_behind: usize,
    /// Commits in the symmetric history between the two branches.
    pub shared_commits: Vec<String>,
    /// Overall boolean verdict; false when any check forces "unsafe".
    pub safe: bool,
    /// Accumulated warnings from the independent checks.
    pub warnings: Vec<String>,
}

impl RebaseSafetyReport {
    /// Applies the safety policy. Each check is independent and contributes
    /// to the warning list; some also force the verdict to unsafe.
    pub fn evaluate(
        current_branch: &str,
        target_branch: &str,
        commits_ahead: usize,
        commits_behind: usize,
        shared_commits: Vec<String>,
        branch_on_remote: bool,
    ) -> Self {
        let mut warnings = Vec::new();
        let mut safe = true;

        if commits_ahead == 0 {
            warnings.push("No commits to rebase - consider pulling instead.".to_string());
            safe = false;
        }

        if !shared_commits.is_empty() {
            warnings.push(
                "Rebasing shared commits will rewrite history for other developers.".to_string(),
            );
            warnings
                .push("This can cause issues for anyone who has pulled these commits.".to_string());
            safe = false;
        }

        // Requires a force push afterwards, but does not by itself make the
        // rebase unsafe.
        if branch_on_remote {
            warnings.push(
                "After rebasing, you'll need to force push (git push --force-with-lease)."
                    .to_string(),
            );
        }

        Self {
            current_branch: current_branch.to_string(),
            target_branch: target_branch.to_string(),
            commits_ahead,
            commits_behind,
            shared_commits,
            safe,
            warnings,
        }
    }

    /// Final classification of the report.
    pub fn verdict(&self) -> SafetyVerdict {
        if self.safe && self.warnings.is_empty() {
            SafetyVerdict::Safe
        } else if self.safe {
            SafetyVerdict::PossibleWithCaution
        } else {
            SafetyVerdict::NotRecommended
        }
    }
}
