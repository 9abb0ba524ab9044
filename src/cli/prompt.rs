//! Interactive prompts.
//!
//! `is_terminal` and `reader` are injected so tests can drive every prompt
//! with scripted input instead of blocking on real stdin. A closed reader or
//! a non-interactive stdin reads as cancellation, which the flows treat
//! exactly like an explicit decline.

use std::io::{self, BufRead, Write};

use anyhow::Result;

/// Presents an ordered list of choices and returns the chosen entry, or
/// `None` when the prompt is cancelled.
pub fn select_one(
    prompt: &str,
    choices: &[String],
    is_terminal: bool,
    reader: &mut dyn BufRead,
) -> Result<Option<String>> {
    if choices.is_empty() {
        return Ok(None);
    }

    if !is_terminal {
        eprintln!("warning: stdin is not interactive, cannot prompt for a selection");
        return Ok(None);
    }

    println!("{prompt}");
    for (index, choice) in choices.iter().enumerate() {
        println!("  {}) {choice}", index + 1);
    }

    loop {
        print!("Enter choice [1-{}]: ", choices.len());
        io::stdout().flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input)? == 0 {
            return Ok(None);
        }

        match input.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= choices.len() => return Ok(Some(choices[n - 1].clone())),
            _ => println!("Invalid choice. Enter a number between 1 and {}.", choices.len()),
        }
    }
}

/// Asks a yes/no question. Cancellation (closed stdin, non-interactive
/// session) reads as a decline.
pub fn confirm(
    prompt: &str,
    default: bool,
    is_terminal: bool,
    reader: &mut dyn BufRead,
) -> Result<bool> {
    if !is_terminal {
        eprintln!("warning: stdin is not interactive, cannot prompt for confirmation");
        return Ok(false);
    }

    let hint = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        print!("{prompt} {hint} ");
        io::stdout().flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        match input.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer 'y' or 'n'."),
        }
    }
}

/// Prompts for a line of text, re-prompting while `validate` rejects the
/// input. Returns `None` when the prompt is cancelled.
pub fn prompt_text(
    prompt: &str,
    validate: impl Fn(&str) -> Result<(), String>,
    is_terminal: bool,
    reader: &mut dyn BufRead,
) -> Result<Option<String>> {
    if !is_terminal {
        eprintln!("warning: stdin is not interactive, cannot prompt for input");
        return Ok(None);
    }

    loop {
        print!("{prompt}: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if reader.read_line(&mut input)? == 0 {
            return Ok(None);
        }

        let text = input.trim().to_string();
        match validate(&text) {
            Ok(()) => return Ok(Some(text)),
            Err(message) => println!("{message}"),
        }
    }
}

/// Validator requiring non-empty input.
pub fn non_empty(input: &str) -> Result<(), String> {
    if input.trim().is_empty() {
        Err("Message cannot be empty".to_string())
    } else {
        Ok(())
    }
}
