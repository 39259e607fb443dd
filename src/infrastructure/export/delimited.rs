use std::path::Path;

use super::{ExportError, PROMPT_HEADER, QUERIES_HEADER};
use crate::domain::models::ResultTable;

/// Write results as CSV with a header row.
pub fn write_csv(table: &ResultTable, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([PROMPT_HEADER, QUERIES_HEADER])?;
    for row in table {
        writer.write_record([row.original_prompt.as_str(), row.export_text().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FanOutResult, Prompt};

    #[test]
    fn test_write_csv_quotes_multiline_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let prompt = Prompt::new("billig strøm").unwrap();
        let table: ResultTable = vec![FanOutResult::with_queries(
            &prompt,
            vec!["billig strøm 2026".to_string(), "elpris i dag".to_string()],
        )]
        .into_iter()
        .collect();

        write_csv(&table, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], PROMPT_HEADER);
        assert_eq!(&headers[1], QUERIES_HEADER);

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "billig strøm");
        assert_eq!(&rows[0][1], "billig strøm 2026\nelpris i dag");
    }
}
