//! Result export
//!
//! Results are written as a spreadsheet by default. When the spreadsheet
//! writer fails, the same rows are written as CSV next to the requested path.

mod delimited;
mod xlsx;

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::models::{ResultTable, TargetMarket};

pub use delimited::write_csv;
pub use xlsx::write_xlsx;

/// Worksheet name used for spreadsheet exports.
pub const SHEET_NAME: &str = "SEO Fan-Out";

/// Header of the prompt column.
pub const PROMPT_HEADER: &str = "Primary Prompt";

/// Header of the search query column.
pub const QUERIES_HEADER: &str = "Raw Search Queries";

/// Errors raised while exporting results
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet export failed ({xlsx_error}) and the CSV fallback failed too: {csv_error}")]
    FallbackFailed { xlsx_error: String, csv_error: String },
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Excel workbook
    #[default]
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Format implied by a file extension; anything but `.csv` is a spreadsheet.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }
}

/// Default export file name for a market, e.g. `seo_fanout_denmark.xlsx`.
pub fn default_export_path(market: TargetMarket, format: ExportFormat) -> PathBuf {
    PathBuf::from(format!("seo_fanout_{}.{}", market.slug(), format.extension()))
}

/// Work out where to write and in which format.
///
/// An explicit format wins over the extension of `output`. Without an output
/// path the default file name for `market` is used.
pub fn resolve_target(
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    market: TargetMarket,
) -> (PathBuf, ExportFormat) {
    match (output, format) {
        (Some(path), Some(format)) => (path, format),
        (Some(path), None) => {
            let format = ExportFormat::from_path(&path);
            (path, format)
        }
        (None, format) => {
            let format = format.unwrap_or_default();
            (default_export_path(market, format), format)
        }
    }
}

/// Where the results ended up.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// File that was written
    pub path: PathBuf,
    /// Format of that file
    pub format: ExportFormat,
    /// Rows written, excluding the header
    pub rows: usize,
    /// Spreadsheet error that triggered the CSV fallback, if any
    pub fallback_reason: Option<String>,
}

impl ExportReport {
    /// Whether the CSV fallback was used.
    pub const fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Export `table` to `path`, falling back to CSV if the spreadsheet fails.
pub fn export_results(
    table: &ResultTable,
    path: &Path,
    format: ExportFormat,
) -> Result<ExportReport, ExportError> {
    match format {
        ExportFormat::Csv => {
            write_csv(table, path)?;
            info!(path = %path.display(), rows = table.len(), "results exported as CSV");
            Ok(report(table, path, ExportFormat::Csv, None))
        }
        ExportFormat::Xlsx => match write_xlsx(table, path) {
            Ok(()) => {
                info!(path = %path.display(), rows = table.len(), "results exported as XLSX");
                Ok(report(table, path, ExportFormat::Xlsx, None))
            }
            Err(xlsx_err) => {
                let fallback = path.with_extension(ExportFormat::Csv.extension());
                warn!(
                    error = %xlsx_err,
                    fallback = %fallback.display(),
                    "XLSX export failed, writing CSV instead"
                );
                write_csv(table, &fallback).map_err(|csv_err| ExportError::FallbackFailed {
                    xlsx_error: xlsx_err.to_string(),
                    csv_error: csv_err.to_string(),
                })?;
                Ok(report(
                    table,
                    &fallback,
                    ExportFormat::Csv,
                    Some(xlsx_err.to_string()),
                ))
            }
        },
    }
}

fn report(
    table: &ResultTable,
    path: &Path,
    format: ExportFormat,
    fallback_reason: Option<String>,
) -> ExportReport {
    ExportReport {
        path: path.to_path_buf(),
        format,
        rows: table.len(),
        fallback_reason,
    }
}
