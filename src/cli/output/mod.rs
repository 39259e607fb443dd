//! CLI output formatting module
//!
//! Commands render through [`CommandOutput`] so every command supports both
//! human-readable and `--json` output.

pub mod progress;
pub mod table;

use serde::Serialize;

pub use progress::{create_progress_bar, create_spinner, ProgressBarExt, ProgressObserver};
pub use table::TableFormatter;

/// Result of a command, printable for people or as JSON.
pub trait CommandOutput: Serialize {
    /// Text shown in a terminal
    fn to_human(&self) -> String;

    /// Value printed with `--json`
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Print a command result to stdout.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
