//! Table output formatting for CLI commands
//!
//! Renders fan-out results and model listings with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{FanOutResult, ModelInfo};
use crate::infrastructure::export::{PROMPT_HEADER, QUERIES_HEADER};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format fan-out results, one row per prompt with bulleted queries
    pub fn format_results(&self, results: &[FanOutResult]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new(PROMPT_HEADER).add_attribute(Attribute::Bold),
            Cell::new(QUERIES_HEADER).add_attribute(Attribute::Bold),
        ]);

        for result in results {
            let queries = result.display_text();
            let queries_cell = match (self.use_colors, result.queries()) {
                (true, None) => Cell::new(queries).fg(Color::Red),
                (true, Some([])) => Cell::new(queries).fg(Color::DarkGrey),
                _ => Cell::new(queries),
            };

            table.add_row(vec![Cell::new(&result.original_prompt), queries_cell]);
        }

        table.to_string()
    }

    /// Format a list of models as a table
    pub fn format_models(&self, models: &[ModelInfo]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Display Name").add_attribute(Attribute::Bold),
            Cell::new("generateContent").add_attribute(Attribute::Bold),
        ]);

        for model in models {
            let supported = model.supports_generate_content();
            let support_cell = match (self.use_colors, supported) {
                (true, true) => Cell::new("yes").fg(Color::Green),
                (true, false) => Cell::new("no").fg(Color::DarkGrey),
                (false, true) => Cell::new("✓ yes"),
                (false, false) => Cell::new("✗ no"),
            };

            table.add_row(vec![
                Cell::new(&model.name),
                Cell::new(model.display_name.as_deref().unwrap_or("-")),
                support_cell,
            ]);
        }

        table.to_string()
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}
