//! Prompt input from delimited text files
//!
//! The prompt column is chosen by header name, in a fixed priority order,
//! falling back to the first column.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::models::Prompt;

/// Header names recognized as the prompt column, highest priority first.
pub const PROMPT_COLUMN_PRIORITY: [&str; 5] =
    ["prompts", "Primary Prompt", "Prompt", "query", "keyword"];

/// Errors raised while reading a prompt file
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file has no columns")]
    NoColumns,
}

/// Which column prompts were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelection {
    /// A header from [`PROMPT_COLUMN_PRIORITY`] matched.
    Recognized(String),
    /// Nothing matched; the first column was used.
    Fallback(String),
}

impl ColumnSelection {
    /// Header name of the selected column.
    pub fn name(&self) -> &str {
        match self {
            Self::Recognized(name) | Self::Fallback(name) => name,
        }
    }
}

/// Prompts loaded from a file.
#[derive(Debug, Clone)]
pub struct PromptFile {
    /// Column the prompts came from
    pub column: ColumnSelection,
    /// Non-blank prompts in file order
    pub prompts: Vec<Prompt>,
    /// Rows skipped because the cell was blank or missing
    pub skipped: usize,
}

impl PromptFile {
    /// Notice to show the user when the first column was used as a fallback.
    pub fn fallback_notice(&self) -> Option<String> {
        match &self.column {
            ColumnSelection::Fallback(name) => Some(format!(
                "Could not find a standard column name. Using content from first column: '{name}'"
            )),
            ColumnSelection::Recognized(_) => None,
        }
    }
}

/// Load prompts from a CSV file on disk.
pub fn load_prompt_csv(path: impl AsRef<Path>) -> Result<PromptFile, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_prompt_csv(file)
}

/// Read prompts from CSV data with a header row.
pub fn read_prompt_csv<R: Read>(reader: R) -> Result<PromptFile, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(InputError::NoColumns);
    }

    let (index, column) = select_column(&headers);
    debug!(column = column.name(), index, "prompt column selected");

    let mut prompts = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        match record.get(index).and_then(Prompt::new) {
            Some(prompt) => prompts.push(prompt),
            None => skipped += 1,
        }
    }

    Ok(PromptFile {
        column,
        prompts,
        skipped,
    })
}

fn select_column(headers: &csv::StringRecord) -> (usize, ColumnSelection) {
    PROMPT_COLUMN_PRIORITY
        .iter()
        .find_map(|wanted| {
            headers
                .iter()
                .position(|h| h == *wanted)
                .map(|i| (i, ColumnSelection::Recognized((*wanted).to_string())))
        })
        .unwrap_or_else(|| (0, ColumnSelection::Fallback(headers[0].to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(file: &PromptFile) -> Vec<&str> {
        file.prompts.iter().map(Prompt::as_str).collect()
    }

    #[test]
    fn test_recognized_header() {
        let data = "id,Primary Prompt\n1,Best investments 2026\n2,Billig strøm\n3,Cheap flights\n";
        let file = read_prompt_csv(data.as_bytes()).unwrap();

        assert_eq!(
            file.column,
            ColumnSelection::Recognized("Primary Prompt".to_string())
        );
        assert_eq!(
            texts(&file),
            vec!["Best investments 2026", "Billig strøm", "Cheap flights"]
        );
        assert!(file.fallback_notice().is_none());
    }

    #[test]
    fn test_header_priority_order() {
        let data = "keyword,Prompt,prompts\nk,p,winner\n";
        let file = read_prompt_csv(data.as_bytes()).unwrap();

        assert_eq!(file.column.name(), "prompts");
        assert_eq!(texts(&file), vec!["winner"]);
    }

    #[test]
    fn test_header_match_is_exact() {
        let data = "PROMPTS,other\nfirst,second\n";
        let file = read_prompt_csv(data.as_bytes()).unwrap();

        assert_eq!(file.column, ColumnSelection::Fallback("PROMPTS".to_string()));
    }

    #[test]
    fn test_fallback_to_first_column() {
        let data = "Question,Notes\nWhat is SEO?,n1\nHow do LLMs search?,n2\n";
        let file = read_prompt_csv(data.as_bytes()).unwrap();

        assert_eq!(file.column, ColumnSelection::Fallback("Question".to_string()));
        assert_eq!(texts(&file), vec!["What is SEO?", "How do LLMs search?"]);
        let notice = file.fallback_notice().unwrap();
        assert!(notice.contains("'Question'"));
    }

    #[test]
    fn test_blank_and_missing_cells_are_skipped() {
        let data = "note,query\na,first\nb,\nc,   \nd\ne,second\n";
        let file = read_prompt_csv(data.as_bytes()).unwrap();

        assert_eq!(texts(&file), vec!["first", "second"]);
        assert_eq!(file.skipped, 3);
    }

    #[test]
    fn test_quoted_prompt_with_comma() {
        let data = "prompts\n\"line one, with comma\"\n";
        let file = read_prompt_csv(data.as_bytes()).unwrap();

        assert_eq!(texts(&file), vec!["line one, with comma"]);
    }

    #[test]
    fn test_empty_input_has_no_columns() {
        let result = read_prompt_csv("".as_bytes());
        assert!(matches!(result, Err(InputError::NoColumns)));
    }

    #[test]
    fn test_missing_file() {
        let result = load_prompt_csv("/no/such/prompts.csv");
        assert!(matches!(result, Err(InputError::Open { .. })));
    }
}
