//! Shared display formatting for CLI commands.
//!
//! The flows emit plain structured data; everything about color and layout
//! lives here.

use std::io::Write;

use crate::analysis::Severity;

/// Prints a boxed section header.
pub fn header(title: &str) {
    let width = title.chars().count() + 4;
    let bar: String = "─".repeat(width);
    println!("╭{bar}╮");
    println!("│  \x1b[1;36m{title}\x1b[0m  │");
    println!("╰{bar}╯");
}

/// Prints a success line.
pub fn success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {message}");
}

/// Prints an error line.
pub fn error(message: &str) {
    println!("\x1b[31m✗\x1b[0m {message}");
}

/// Prints a warning line.
pub fn warning(message: &str) {
    println!("\x1b[33m⚠\x1b[0m {message}");
}

/// Prints an informational line.
pub fn info(message: &str) {
    println!("\x1b[34mℹ\x1b[0m {message}");
}

/// Prints a horizontal separator.
pub fn separator() {
    println!("{}", "─".repeat(60));
}

/// Returns an icon representing issue severity.
pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
    }
}

/// An in-progress status line, resolved with [`StatusLine::succeed`] or
/// [`StatusLine::fail`].
pub struct StatusLine {
    text: String,
}

impl StatusLine {
    /// Starts a status line.
    pub fn start(text: &str) -> Self {
        print!("… {text}");
        let _ = std::io::stdout().flush();
        Self {
            text: text.to_string(),
        }
    }

    /// Marks the operation as completed.
    pub fn succeed(self) {
        println!("\r\x1b[32m✓\x1b[0m {}", self.text);
    }

    /// Marks the operation as failed.
    pub fn fail(self) {
        println!("\r\x1b[31m✗\x1b[0m {}", self.text);
    }
}
