use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use super::{ExportError, PROMPT_HEADER, QUERIES_HEADER, SHEET_NAME};
use crate::domain::models::ResultTable;

const PROMPT_COLUMN_WIDTH: f64 = 50.0;
const QUERIES_COLUMN_WIDTH: f64 = 80.0;

/// Write results to a single-sheet workbook.
pub fn write_xlsx(table: &ResultTable, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let wrapped = Format::new().set_text_wrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.set_column_width(0, PROMPT_COLUMN_WIDTH)?;
    sheet.set_column_width(1, QUERIES_COLUMN_WIDTH)?;
    sheet.write_string_with_format(0, 0, PROMPT_HEADER, &header)?;
    sheet.write_string_with_format(0, 1, QUERIES_HEADER, &header)?;

    for (row, result) in (1_u32..).zip(table) {
        sheet.write_string(row, 0, &result.original_prompt)?;
        sheet.write_string_with_format(row, 1, result.export_text(), &wrapped)?;
    }

    workbook.save(path)?;
    Ok(())
}
