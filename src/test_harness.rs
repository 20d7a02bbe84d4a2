//! Test fixtures shared by unit tests.
//!
//! - [`StubSource`]: an in-memory [`RecordSource`] with failure switches
//! - [`buffer_to_string`]: flatten a ratatui buffer for render assertions

use crate::model::{last_page, FileLoadError, PageFetchError, PageResult, Record, SortOrder};
use crate::source::export::export_records;
use crate::source::{ExportError, ExportFormat, RecordSource};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Convert a ratatui buffer to a string representation.
///
/// Captures the visual output character by character, preserving layout.
/// Empty trailing lines are removed.
pub(crate) fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            let cell = &buffer[(x, y)];
            line.push_str(cell.symbol());
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}

/// Build a record from a JSON object literal.
pub(crate) fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => Record::from(map),
        other => panic!("expected object, got {other}"),
    }
}

/// In-memory record source.
///
/// Serves the same records for whatever path is loaded. Reports no column
/// list unless one is set, so the registry is derived from the first record.
#[derive(Debug, Clone)]
pub(crate) struct StubSource {
    records: Vec<Record>,
    page_size: usize,
    column_names: Option<Vec<String>>,
    loaded: Option<PathBuf>,
    fail_next_load: bool,
    fail_pages: bool,
    page_fetches: usize,
}

impl StubSource {
    /// `total` records `{"EventRecordID": i, "User": "user<i>"}`, 1-based.
    pub(crate) fn numbered(total: usize, page_size: usize) -> Self {
        let records = (1..=total)
            .map(|i| record(json!({"EventRecordID": i, "User": format!("user{i}")})))
            .collect();
        Self::with_records(records, page_size)
    }

    /// Serve exactly `records`.
    pub(crate) fn with_records(records: Vec<Record>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            column_names: None,
            loaded: None,
            fail_next_load: false,
            fail_pages: false,
            page_fetches: 0,
        }
    }

    /// Report `names` as the file's column list on load.
    pub(crate) fn reporting_columns(mut self, names: &[&str]) -> Self {
        self.column_names = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Make the next `load_file` fail as a malformed file.
    pub(crate) fn fail_next_load(&mut self) {
        self.fail_next_load = true;
    }

    /// Make every following `select_page` fail with an I/O error.
    pub(crate) fn fail_pages(&mut self) {
        self.fail_pages = true;
    }

    /// Number of `select_page` calls so far.
    pub(crate) fn page_fetches(&self) -> usize {
        self.page_fetches
    }

    /// Path of the last successful `load_file`.
    pub(crate) fn loaded_path(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    fn page(&self, page: usize, sort: Option<&SortOrder>) -> Result<PageResult, PageFetchError> {
        let mut ordered: Vec<&Record> = self.records.iter().collect();
        if let Some(order) = sort {
            ordered.sort_by(|a, b| order.compare(a, b));
        }
        let total = ordered.len();
        let last = last_page(total, self.page_size);
        if page == 0 || page > last {
            return Err(PageFetchError::OutOfRange { page, last_page: last });
        }
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(total);
        Ok(PageResult::new(
            page,
            self.page_size,
            total,
            ordered[start..end].iter().map(|r| (*r).clone()).collect(),
        ))
    }
}

impl RecordSource for StubSource {
    fn load_file(&mut self, path: &Path) -> Result<PageResult, FileLoadError> {
        if self.fail_next_load {
            self.fail_next_load = false;
            return Err(FileLoadError::Malformed {
                path: path.to_path_buf(),
                line: 1,
                reason: "stub failure".to_string(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        let first = self.page(1, None).map_err(|_| FileLoadError::WorkerUnavailable)?;
        Ok(match &self.column_names {
            Some(names) => first.with_column_names(names.clone()),
            None => first,
        })
    }

    fn select_page(&mut self, page: usize, sort: Option<&SortOrder>) -> Result<PageResult, PageFetchError> {
        self.page_fetches += 1;
        if self.fail_pages {
            return Err(PageFetchError::Io {
                reason: "stub failure".to_string(),
            });
        }
        if self.loaded.is_none() {
            return Err(PageFetchError::NoFileLoaded);
        }
        self.page(page, sort)
    }

    fn toggle_flag(&mut self, record_id: u64) -> Result<bool, PageFetchError> {
        if self.loaded.is_none() {
            return Err(PageFetchError::NoFileLoaded);
        }
        self.records
            .iter_mut()
            .find(|r| r.record_id() == Some(record_id))
            .map(Record::toggle_flag)
            .ok_or(PageFetchError::RecordNotFound { record_id })
    }

    fn export(&self, path: &Path, format: ExportFormat) -> Result<usize, ExportError> {
        if self.loaded.is_none() {
            return Err(ExportError::NoFileLoaded);
        }
        let columns: Vec<String> = match &self.column_names {
            Some(names) => names.clone(),
            None => self
                .records
                .first()
                .map(|r| r.field_names().map(str::to_string).collect())
                .unwrap_or_default(),
        };
        export_records(&self.records, &columns, format, path)?;
        Ok(self.records.len())
    }
}
