use serde::{Deserialize, Serialize};

use super::prompt::Prompt;

/// Text shown when the model answered without issuing any search.
pub const NO_QUERIES_TEXT: &str =
    "No specific search queries triggered (AI answered from internal knowledge).";

/// Prefix for failed rows in display and export.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Bullet placed before each query in the display representation.
pub const BULLET: &str = "• ";

/// What the pipeline learned about one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The search queries the service issued, in the order it reported them.
    /// Empty means it answered without searching.
    Queries(Vec<String>),
    /// The request could not be completed.
    Failed(String),
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutResult {
    /// The prompt exactly as it was read.
    pub original_prompt: String,
    /// Queries or error.
    pub outcome: QueryOutcome,
}

impl FanOutResult {
    /// Successful result carrying the extracted queries.
    pub fn with_queries(prompt: &Prompt, queries: Vec<String>) -> Self {
        Self {
            original_prompt: prompt.as_str().to_string(),
            outcome: QueryOutcome::Queries(queries),
        }
    }

    /// Failed result carrying the error message.
    pub fn failed(prompt: &Prompt, message: impl Into<String>) -> Self {
        Self {
            original_prompt: prompt.as_str().to_string(),
            outcome: QueryOutcome::Failed(message.into()),
        }
    }

    /// Extracted queries, or `None` if the request failed.
    pub fn queries(&self) -> Option<&[String]> {
        match &self.outcome {
            QueryOutcome::Queries(queries) => Some(queries),
            QueryOutcome::Failed(_) => None,
        }
    }

    /// Error message, or `None` if the request succeeded.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            QueryOutcome::Queries(_) => None,
            QueryOutcome::Failed(message) => Some(message),
        }
    }

    /// Terminal representation: one bulleted query per line.
    pub fn display_text(&self) -> String {
        self.render(|queries| {
            queries
                .iter()
                .map(|q| format!("{BULLET}{q}"))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    /// Spreadsheet representation: queries joined by newlines, no bullets.
    pub fn export_text(&self) -> String {
        self.render(|queries| queries.join("\n"))
    }

    fn render(&self, join: impl Fn(&[String]) -> String) -> String {
        match &self.outcome {
            QueryOutcome::Queries(queries) if queries.is_empty() => NO_QUERIES_TEXT.to_string(),
            QueryOutcome::Queries(queries) => join(queries),
            QueryOutcome::Failed(message) => format!("{ERROR_PREFIX}{message}"),
        }
    }
}

/// Ordered collection of results; insertion order is input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<FanOutResult>,
}

impl ResultTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result.
    pub fn push(&mut self, result: FanOutResult) {
        self.rows.push(result);
    }

    /// Rows in input order.
    pub fn rows(&self) -> &[FanOutResult] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows whose request failed.
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.error().is_some()).count()
    }

    /// Total number of extracted queries across all rows.
    pub fn query_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(FanOutResult::queries)
            .map(<[String]>::len)
            .sum()
    }
}

impl FromIterator<FanOutResult> for ResultTable {
    fn from_iter<I: IntoIterator<Item = FanOutResult>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a FanOutResult;
    type IntoIter = std::slice::Iter<'a, FanOutResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
