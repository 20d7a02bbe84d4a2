//! In-memory event-log source.
//!
//! Reads a whole file, keeps its records in memory and serves them page by
//! page. The format is picked from the file's first bytes: the EVTX
//! signature selects the native decoder, anything else is read as
//! newline-delimited JSON.
//!
//! Every record gets two extra fields on load: `Flagged` (false unless the
//! input already carries a boolean there) and `SourceFile`.

use crate::model::{
    last_page, FileLoadError, PageFetchError, PageResult, Record, SortOrder, DEFAULT_PAGE_SIZE,
    FLAGGED_FIELD, SOURCE_FILE_FIELD,
};
use crate::source::export::{export_records, ExportError, ExportFormat};
use crate::source::{evtx, jsonl, RecordSource};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Event-log source for EVTX and JSONL files.
#[derive(Debug)]
pub struct EventLogSource {
    page_size: usize,
    loaded: Option<LoadedFile>,
}

#[derive(Debug)]
struct LoadedFile {
    records: Vec<Record>,
    column_names: Vec<String>,
    /// Indices into `records` in serving order.
    order: Vec<usize>,
    /// Sort that produced `order`; `None` means file order.
    sort: Option<SortOrder>,
}

impl LoadedFile {
    fn new(records: Vec<Record>, column_names: Vec<String>) -> Self {
        let order = (0..records.len()).collect();
        Self {
            records,
            column_names,
            order,
            sort: None,
        }
    }

    fn sort_by(&mut self, sort: Option<&SortOrder>) {
        if self.sort.as_ref() == sort {
            return;
        }
        self.order = (0..self.records.len()).collect();
        if let Some(order) = sort {
            let records = &self.records;
            self.order.sort_by(|&a, &b| order.compare(&records[a], &records[b]));
        }
        debug!(?sort, records = self.records.len(), "Reordered records");
        self.sort = sort.cloned();
    }
}

impl EventLogSource {
    /// New source serving `page_size` records per page (at least 1).
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            loaded: None,
        }
    }

    fn page(&self, page: usize) -> Result<PageResult, PageFetchError> {
        let file = self.loaded.as_ref().ok_or(PageFetchError::NoFileLoaded)?;
        let total = file.records.len();
        let last = last_page(total, self.page_size);
        if page == 0 || page > last {
            return Err(PageFetchError::OutOfRange {
                page,
                last_page: last,
            });
        }

        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(total);
        let records = file
            .order
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .filter_map(|&i| file.records.get(i).cloned())
            .collect();
        Ok(PageResult::new(page, self.page_size, total, records))
    }
}

impl Default for EventLogSource {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl RecordSource for EventLogSource {
    fn load_file(&mut self, path: &Path) -> Result<PageResult, FileLoadError> {
        if !path.exists() {
            return Err(FileLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|source| FileLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut records = if evtx::is_evtx(&bytes) {
            evtx::read_evtx(path)?
        } else {
            jsonl::parse_records(&String::from_utf8_lossy(&bytes), path)?
        };

        let source_file = Value::String(path.display().to_string());
        for record in &mut records {
            if !matches!(record.get(FLAGGED_FIELD), Some(Value::Bool(_))) {
                record.insert(FLAGGED_FIELD, Value::Bool(false));
            }
            record.insert(SOURCE_FILE_FIELD, source_file.clone());
        }
        let column_names = collect_column_names(&records);

        info!(
            path = %path.display(),
            records = records.len(),
            columns = column_names.len(),
            "Loaded event log"
        );

        // Only replace the open file once the new one parsed.
        self.loaded = Some(LoadedFile::new(records, column_names.clone()));

        let first = self.page(1).map_err(|_| FileLoadError::Malformed {
            path: path.to_path_buf(),
            line: 0,
            reason: "first page unavailable".to_string(),
        })?;
        Ok(first.with_column_names(column_names))
    }

    fn select_page(&mut self, page: usize, sort: Option<&SortOrder>) -> Result<PageResult, PageFetchError> {
        self.loaded
            .as_mut()
            .ok_or(PageFetchError::NoFileLoaded)?
            .sort_by(sort);
        self.page(page)
    }

    fn toggle_flag(&mut self, record_id: u64) -> Result<bool, PageFetchError> {
        let file = self.loaded.as_mut().ok_or(PageFetchError::NoFileLoaded)?;
        let record = file
            .records
            .iter_mut()
            .find(|r| r.record_id() == Some(record_id))
            .ok_or(PageFetchError::RecordNotFound { record_id })?;
        let flagged = record.toggle_flag();
        // A sort on Flagged is stale now.
        if file.sort.as_ref().is_some_and(|s| s.column == FLAGGED_FIELD) {
            let sort = file.sort.take();
            file.sort_by(sort.as_ref());
        }
        debug!(record_id, flagged, "Toggled flag");
        Ok(flagged)
    }

    fn export(&self, path: &Path, format: ExportFormat) -> Result<usize, ExportError> {
        let file = self.loaded.as_ref().ok_or(ExportError::NoFileLoaded)?;
        export_records(&file.records, &file.column_names, format, path)?;
        Ok(file.records.len())
    }
}

fn collect_column_names(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in records {
        for name in record.field_names() {
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
