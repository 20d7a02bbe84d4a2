//! Exporting records to CSV or JSON.

use crate::model::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing to export because no file is open.
    #[error("No file is loaded")]
    NoFileLoaded,

    /// The background fetch worker is gone.
    #[error("Record source worker is unavailable")]
    WorkerUnavailable,

    /// Unrecognized format name.
    #[error("Unknown export format: {0} (expected csv or json)")]
    UnknownFormat(String),
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma separated values with a header row.
    Csv,
    /// Pretty-printed JSON array of objects.
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Format implied by a file name: JSON for `.json`, CSV otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use venture::source::export::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::from_path(Path::new("out.JSON")), ExportFormat::Json);
    /// assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
    /// assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Csv);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Write `records` to `path`.
///
/// CSV output has one column per entry of `columns`; JSON output keeps
/// every field of every record and ignores `columns`.
///
/// # Errors
///
/// [`ExportError`] if the file cannot be created or written.
pub fn export_records(
    records: &[Record],
    columns: &[String],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(writer, records, columns)?,
        ExportFormat::Json => write_json(writer, records)?,
    }
    info!(path = %path.display(), records = records.len(), ?format, "Exported records");
    Ok(())
}

/// Write records as CSV. Fields a record lacks are left empty.
///
/// # Errors
///
/// [`ExportError::Csv`] on write failure.
pub fn write_csv<W: Write>(writer: W, records: &[Record], columns: &[String]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns)?;
    for record in records {
        let row = columns
            .iter()
            .map(|column| record.text(column).map(|t| t.into_owned()).unwrap_or_default());
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records as a pretty-printed JSON array.
///
/// # Errors
///
/// [`ExportError::Json`] on serialization failure, [`ExportError::Io`] on write failure.
pub fn write_json<W: Write>(mut writer: W, records: &[Record]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            [("User", json!("alice")), ("Id", json!(1))].into_iter().collect(),
            [("User", json!("bob, jr")), ("Host", json!("dc1"))].into_iter().collect(),
        ]
    }

    fn columns() -> Vec<String> {
        vec!["User".to_string(), "Id".to_string(), "Host".to_string()]
    }

    #[test]
    fn csv_has_header_and_empty_missing_fields() {
        let mut out = Vec::new();
        write_csv(&mut out, &records(), &columns()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "User,Id,Host\nalice,1,\n\"bob, jr\",,dc1\n");
    }

    #[test]
    fn json_round_trips_records() {
        let mut out = Vec::new();
        write_json(&mut out, &records()).unwrap();

        let parsed: Vec<Record> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn export_records_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export_records(&records(), &columns(), ExportFormat::Csv, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("User,Id,Host\n"));
    }
}
