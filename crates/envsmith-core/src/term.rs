//! Terminal utilities for status output.

use colored::*;
use std::io::{self, IsTerminal};

/// Check if we're running in a controlling terminal.
pub fn in_controlling_terminal() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Get terminal width in columns.
pub fn terminal_width() -> usize {
    console::Term::stderr()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(80)
}

/// `✓ message` in green.
pub fn success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// `✗ message` in red.
pub fn failure(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}

/// `! message` in yellow.
pub fn warning(message: &str) -> String {
    format!("{} {}", "!".yellow().bold(), message)
}

/// A horizontal rule sized to the terminal, capped at 72 columns.
pub fn rule() -> String {
    "─".repeat(terminal_width().min(72))
}
