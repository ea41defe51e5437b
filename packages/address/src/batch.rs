//! Batch parsing of addresses from CSV files.
//!
//! Reads one address per row from a named column, parses each with an
//! [`AddressParser`], and collects the candidates per row. Rows that fail
//! to parse are counted and kept in the report with their error message;
//! they never abort the batch.

use std::io::{Read, Write};

use openblock_address_models::ParsedRecord;

use crate::parser::AddressParser;
use crate::progress::ProgressCallback;

/// Errors from batch parsing.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The address column is not in the header row.
    #[error("Column not found: {column}")]
    MissingColumn {
        /// The requested column name.
        column: String,
    },

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a record failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One entry per data row, in input order.
    pub records: Vec<ParsedRecord>,
    /// Rows with at least one candidate.
    pub parsed: u64,
    /// Rows with no candidate.
    pub failed: u64,
}

/// Parses the `column` of every row in a CSV stream with a header row.
///
/// # Errors
///
/// Returns [`BatchError::MissingColumn`] if the header lacks `column`, or
/// [`BatchError::Csv`] if the input is not valid CSV.
pub fn parse_csv<R: Read>(
    parser: &AddressParser,
    reader: R,
    column: &str,
    progress: &dyn ProgressCallback,
) -> Result<BatchReport, BatchError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let idx = rdr
        .headers()?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| BatchError::MissingColumn {
            column: column.to_string(),
        })?;

    let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
    progress.set_total(rows.len() as u64);
    progress.set_message(format!("Parsing {column}"));

    let mut report = BatchReport::default();
    for (i, row) in rows.iter().enumerate() {
        let address = row.get(idx).unwrap_or_default().to_string();
        let record = match parser.parse(&address) {
            Ok(candidates) => {
                report.parsed += 1;
                ParsedRecord {
                    row: i as u64 + 1,
                    address,
                    candidates,
                    error: None,
                }
            }
            Err(e) => {
                log::debug!("Row {}: {e}", i + 1);
                report.failed += 1;
                ParsedRecord {
                    row: i as u64 + 1,
                    address,
                    candidates: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        report.records.push(record);
        progress.inc(1);
    }

    progress.finish(format!(
        "Parsed {} of {} addresses",
        report.parsed,
        report.records.len()
    ));
    log::info!(
        "Batch complete: {} parsed, {} failed",
        report.parsed,
        report.failed
    );

    Ok(report)
}

/// Writes `records` as JSON lines, one record per line.
///
/// # Errors
///
/// Returns [`BatchError::Json`] or [`BatchError::Io`] if writing fails.
pub fn write_jsonl<W: Write>(records: &[ParsedRecord], mut writer: W) -> Result<(), BatchError> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    const CSV: &str = "\
id,address,city
1,1972 N DAWSON AVE,CHICAGO
2,n kimball ave & w diversey ave,CHICAGO
3,\"45 carlton ave, apt 12\",BROOKLYN
";

    fn parse_sample(column: &str) -> Result<BatchReport, BatchError> {
        parse_csv(
            AddressParser::builtin(),
            CSV.as_bytes(),
            column,
            &NullProgress,
        )
    }

    #[test]
    fn parses_every_row() {
        let report = parse_sample("address").unwrap();
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.parsed, 2);
        assert_eq!(report.failed, 1);

        let first = &report.records[0];
        assert_eq!(first.row, 1);
        assert!(first.is_parsed());
        assert!(first.error.is_none());

        let second = &report.records[1];
        assert!(!second.is_parsed());
        assert!(second.error.as_deref().unwrap().contains("diversey"));

        assert_eq!(report.records[2].address, "45 carlton ave, apt 12");
        assert!(report.records[2].is_parsed());
    }

    #[test]
    fn rejects_missing_column() {
        let result = parse_sample("street");
        assert!(matches!(
            result,
            Err(BatchError::MissingColumn { column }) if column == "street"
        ));
    }

    #[test]
    fn writes_one_json_line_per_record() {
        let report = parse_sample("address").unwrap();
        let mut out = Vec::new();
        write_jsonl(&report.records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["row"], 1);
        assert!(first.get("error").is_none());
        assert_eq!(first["candidates"][0].as_object().unwrap().len(), 8);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert!(second["candidates"].as_array().unwrap().is_empty());
        assert!(second["error"].is_string());
    }
}
