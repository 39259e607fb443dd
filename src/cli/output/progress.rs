//! Progress display for batch runs using indicatif
//!
//! Bars draw to stderr; stdout carries only results.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::truncate;
use crate::domain::models::{FanOutResult, Prompt};
use crate::services::BatchObserver;

const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg} (ETA: {eta})";
const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";

const PROGRESS_CHARS: &str = "█▓▒░ ";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Longest prompt excerpt shown in the progress message.
const MESSAGE_PROMPT_CHARS: usize = 40;

/// Create a standard progress bar with ETA calculation
///
/// # Example
/// ```
/// use fanout::cli::output::progress::create_progress_bar;
///
/// let pb = create_progress_bar(3);
/// pb.set_message("Processing: best ETFs");
/// pb.inc(1);
/// pb.finish_with_message("Complete");
/// ```
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars(PROGRESS_CHARS));
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_spinner(), |s| s.tick_chars(SPINNER_CHARS));
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Extension trait for ProgressBar to add common utility methods
pub trait ProgressBarExt {
    /// Finish with a success message (green checkmark)
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with an error message (red X)
    fn finish_error(&self, message: impl Into<String>);

    /// Finish with a warning message (yellow !)
    fn finish_warning(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✓ {}", message.into()));
    }

    fn finish_error(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✗ {}", message.into()));
    }

    fn finish_warning(&self, message: impl Into<String>) {
        self.finish_with_message(format!("! {}", message.into()));
    }
}

/// Drives a progress bar from batch events.
///
/// Failed prompts are reported inline above the bar as they happen.
pub struct ProgressObserver {
    bar: ProgressBar,
    failures: usize,
}

impl ProgressObserver {
    /// Observer drawing to the terminal.
    pub fn new(total: usize) -> Self {
        Self::with_bar(create_progress_bar(total as u64))
    }

    /// Observer that tracks progress without drawing anything.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    const fn with_bar(bar: ProgressBar) -> Self {
        Self { bar, failures: 0 }
    }

    /// Number of failed prompts seen so far.
    pub const fn failures(&self) -> usize {
        self.failures
    }

    /// Close the bar with a summary line.
    pub fn finish(&self, aborted: bool) {
        let done = self.bar.position();
        if aborted {
            self.bar.finish_error(format!("Aborted after {done} prompt(s)"));
        } else if self.failures > 0 {
            self.bar
                .finish_warning(format!("Processed {done} prompt(s), {} failed", self.failures));
        } else {
            self.bar.finish_success(format!("Processed {done} prompt(s)"));
        }
    }
}

impl BatchObserver for ProgressObserver {
    fn on_start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_prompt(&mut self, _index: usize, prompt: &Prompt) {
        self.bar.set_message(format!(
            "Processing: {}",
            truncate(prompt.as_str(), MESSAGE_PROMPT_CHARS)
        ));
    }

    fn on_result(&mut self, _index: usize, result: &FanOutResult) -> Result<()> {
        if let Some(error) = result.error() {
            self.failures += 1;
            self.bar
                .println(format!("✗ {}: {error}", result.original_prompt));
        }
        self.bar.inc(1);
        Ok(())
    }
}
