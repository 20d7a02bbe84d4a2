//! View coordinator.
//!
//! The single owner of pagination, column registry, sort order and published
//! snapshot. Loads, page changes and flag toggles are split into *request*
//! and *complete*: a request gets a sequence number, runs somewhere (inline
//! or on a worker), and its response is only applied if no newer request was
//! issued in the meantime. Column edits are synchronous and never wait on the
//! source. Exports are sequenced like the rest but never supersede anything.
//!
//! After every completed transition the coordinator rebuilds its
//! [`Snapshot`]. A failed transition leaves the previous snapshot in place.
//!
//! # Response order
//!
//! Responses must be completed in the order the source ran their requests,
//! which is what a [`FetchWorker`](crate::source::FetchWorker) delivers. A
//! discarded open still switched the source's file; the coordinator keeps
//! the last such page so it can follow the source if the open that
//! superseded it fails.

use crate::model::{Column, ColumnRegistry, PageResult, Record, SortOrder, UnknownColumn, ViewError};
use crate::source::{ExportFormat, RecordSource};
use crate::state::filter;
use crate::state::pagination::{PageNav, PageState, PaginationController};
use crate::state::request::{FetchKind, FetchOutcome, FetchRequest, FetchResponse, RequestSeq};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything the presentation layer needs to draw one consistent frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// 1-based page on display.
    pub current_page_index: usize,
    /// Last valid page.
    pub last_page: usize,
    /// Records per page.
    pub page_size: usize,
    /// Records in the whole file.
    pub total_records: usize,
    /// Every column, in display order.
    pub columns: Vec<Column>,
    /// Names of the selected columns, in display order.
    pub visible_columns: Vec<String>,
    /// Records of the current page that pass all filters.
    pub displayed_records: Vec<Record>,
    /// The open file, if any.
    pub file: Option<PathBuf>,
    /// Order the pages are served in; `None` is file order.
    pub sort: Option<SortOrder>,
}

impl Default for Snapshot {
    fn default() -> Self {
        let state = PageState::default();
        Self {
            current_page_index: state.current_page_index(),
            last_page: state.last_page(),
            page_size: state.page_size(),
            total_records: 0,
            columns: Vec::new(),
            visible_columns: Vec::new(),
            displayed_records: Vec::new(),
            file: None,
            sort: None,
        }
    }
}

impl Snapshot {
    /// True once a file with at least one record is open.
    pub fn has_data(&self) -> bool {
        self.total_records > 0
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }
}

/// What happened to a response handed to [`ViewCoordinator::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response was current and its state is now published.
    Applied,
    /// A newer request superseded it; nothing changed.
    Discarded,
    /// An export finished. The snapshot is unchanged.
    Exported {
        /// Records written.
        records: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingKind {
    OpenFile,
    /// A page fetch or flag toggle that will land on `target` under `sort`.
    Page {
        target: usize,
        sort: Option<SortOrder>,
    },
}

#[derive(Debug, Clone)]
struct Pending {
    seq: RequestSeq,
    kind: PendingKind,
}

/// Sequences loads, page changes and column edits into published snapshots.
#[derive(Debug, Default)]
pub struct ViewCoordinator {
    pagination: PaginationController,
    registry: ColumnRegistry,
    file: Option<PathBuf>,
    hidden_columns: Vec<String>,
    sort: Option<SortOrder>,
    last_seq: u64,
    awaiting: Option<Pending>,
    /// Latest successful open that was discarded, which the source now holds.
    orphan_load: Option<(PathBuf, PageResult)>,
    snapshot: Snapshot,
}

impl ViewCoordinator {
    /// Coordinator with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns to deselect every time a file is loaded.
    pub fn with_hidden_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_columns = names.into_iter().map(Into::into).collect();
        self
    }

    /// The last published snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Current column registry.
    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    /// The open file.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Current sort order; `None` is file order.
    pub fn sort(&self) -> Option<&SortOrder> {
        self.sort.as_ref()
    }

    /// True while a load, page fetch or flag toggle is outstanding.
    pub fn is_loading(&self) -> bool {
        self.awaiting.is_some()
    }

    fn next_seq(&mut self) -> RequestSeq {
        self.last_seq += 1;
        RequestSeq::new(self.last_seq)
    }

    fn issue(&mut self, kind: PendingKind) -> RequestSeq {
        let seq = self.next_seq();
        self.awaiting = Some(Pending { seq, kind });
        seq
    }

    fn open_pending(&self) -> bool {
        matches!(self.awaiting, Some(Pending { kind: PendingKind::OpenFile, .. }))
    }

    /// Page and sort the display will end up on once the pending fetch lands.
    fn intended(&self) -> (usize, Option<SortOrder>) {
        match &self.awaiting {
            Some(Pending {
                kind: PendingKind::Page { target, sort },
                ..
            }) => (*target, sort.clone()),
            _ => (self.pagination.current_page(), self.sort.clone()),
        }
    }

    fn issue_page(&mut self, target: usize, sort: Option<SortOrder>) -> RequestSeq {
        self.issue(PendingKind::Page { target, sort })
    }

    // ===== Requests =====

    /// Issue a request to open `path`. Supersedes anything in flight.
    pub fn request_open_file(&mut self, path: impl Into<PathBuf>) -> FetchRequest {
        let path = path.into();
        let seq = self.issue(PendingKind::OpenFile);
        info!(%seq, path = %path.display(), "Requesting file open");
        FetchRequest {
            seq,
            kind: FetchKind::OpenFile(path),
        }
    }

    /// Issue a request for page `page_index`, clamped into range.
    ///
    /// The page is served in the latest requested sort order. Returns `None`
    /// when there is nothing to fetch:
    /// - a file open is in flight (the new file's page count isn't known yet)
    /// - nothing is in flight and the clamped target is the page already on
    ///   display in the current order
    ///
    /// While a fetch is in flight a request for the displayed page is still
    /// issued, so it supersedes the pending one.
    pub fn request_page(&mut self, page_index: usize) -> Option<FetchRequest> {
        if self.open_pending() {
            debug!(page_index, "Ignoring page request while a file is opening");
            return None;
        }

        let target = self.pagination.clamp(page_index);
        let (_, sort) = self.intended();
        if self.awaiting.is_none() && target == self.pagination.current_page() && sort == self.sort {
            return None;
        }

        let seq = self.issue_page(target, sort.clone());
        debug!(%seq, page = target, ?sort, "Requesting page");
        Some(FetchRequest {
            seq,
            kind: FetchKind::Page { page: target, sort },
        })
    }

    /// Issue a request for a relative page (first/previous/next/last).
    ///
    /// Relative steps count from the page a pending fetch will land on, so
    /// repeated presses accumulate.
    pub fn request_navigation(&mut self, nav: PageNav) -> Option<FetchRequest> {
        let (base, _) = self.intended();
        let target = self.pagination.target_from(base, nav);
        self.request_page(target)
    }

    /// Step the sort cycle of `column` and request page 1 in the new order.
    ///
    /// The cycle is unsorted → ascending → descending → unsorted, starting
    /// from the latest requested order. Returns `Ok(None)` while a file is
    /// opening.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] if `column` is not a column.
    pub fn request_sort(&mut self, column: &str) -> Result<Option<FetchRequest>, ViewError> {
        if self.registry.get(column).is_none() {
            return Err(UnknownColumn {
                name: column.to_string(),
            }
            .into());
        }
        if self.open_pending() {
            debug!(column, "Ignoring sort request while a file is opening");
            return Ok(None);
        }

        let (_, current) = self.intended();
        let sort = SortOrder::cycle(current.as_ref(), column);
        let seq = self.issue_page(1, sort.clone());
        info!(%seq, ?sort, "Requesting sort");
        Ok(Some(FetchRequest {
            seq,
            kind: FetchKind::Page { page: 1, sort },
        }))
    }

    /// Issue a request to flip the flag of the record with `record_id`.
    ///
    /// The response refetches the page the display is on (or heading to),
    /// so the new flag shows once it is applied. Returns `None` with no file
    /// open or while a file is opening.
    pub fn request_toggle_flag(&mut self, record_id: u64) -> Option<FetchRequest> {
        if self.file.is_none() || self.open_pending() {
            debug!(record_id, "Ignoring flag toggle without a settled file");
            return None;
        }

        let (page, sort) = self.intended();
        let seq = self.issue_page(page, sort.clone());
        debug!(%seq, record_id, page, "Requesting flag toggle");
        Some(FetchRequest {
            seq,
            kind: FetchKind::ToggleFlag { record_id, page, sort },
        })
    }

    /// Issue a request to export the open file to `path`.
    ///
    /// Exports don't supersede anything and are never superseded. Returns
    /// `None` with no file open or while a file is opening.
    pub fn request_export(&mut self, path: impl Into<PathBuf>, format: ExportFormat) -> Option<FetchRequest> {
        if self.file.is_none() || self.open_pending() {
            debug!("Ignoring export without a settled file");
            return None;
        }

        let path = path.into();
        let seq = self.next_seq();
        info!(%seq, path = %path.display(), ?format, "Requesting export");
        Some(FetchRequest {
            seq,
            kind: FetchKind::Export { path, format },
        })
    }

    /// Apply a response if it answers the latest request.
    ///
    /// Export responses are always reported, whatever else is pending.
    ///
    /// If the latest open fails after an earlier, superseded open succeeded,
    /// the source is holding that earlier file. The coordinator switches to
    /// it before returning the error, so pages keep matching the source.
    ///
    /// # Errors
    ///
    /// The load, fetch or export error carried by the response. State and
    /// snapshot are unchanged in that case, except for the switch above.
    pub fn complete(&mut self, response: FetchResponse) -> Result<Completion, ViewError> {
        if let FetchOutcome::Exported { path, result } = response.outcome {
            let records = result.inspect_err(|e| warn!(path = %path.display(), error = %e, "Export failed"))?;
            info!(path = %path.display(), records, "Export finished");
            return Ok(Completion::Exported { records });
        }

        let pending = match self.awaiting.take() {
            Some(pending) if pending.seq == response.seq => pending,
            other => {
                self.awaiting = other;
                debug!(seq = %response.seq, "Discarding stale response");
                if let FetchOutcome::FileLoaded { path, result: Ok(page) } = response.outcome {
                    self.orphan_load = Some((path, page));
                }
                return Ok(Completion::Discarded);
            }
        };

        match response.outcome {
            FetchOutcome::FileLoaded { path, result } => match result {
                Ok(page) => {
                    self.orphan_load = None;
                    self.adopt_file(path, page);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Open failed");
                    if let Some((orphan, page)) = self.orphan_load.take() {
                        warn!(path = %orphan.display(), "Source kept a superseded file; switching to it");
                        self.adopt_file(orphan, page);
                        self.publish();
                    }
                    return Err(e.into());
                }
            },
            FetchOutcome::PageFetched { page, result } => {
                let result = result.inspect_err(|e| warn!(page, error = %e, "Page fetch failed"))?;
                self.pagination.apply_page(result);
                if let PendingKind::Page { sort, .. } = pending.kind {
                    self.sort = sort;
                }
                info!(page = self.pagination.current_page(), sort = ?self.sort, "Page changed");
            }
            // reported before sequencing
            FetchOutcome::Exported { .. } => {}
        }

        self.publish();
        Ok(Completion::Applied)
    }

    fn adopt_file(&mut self, path: PathBuf, page: PageResult) {
        let first_record = page.records.first().cloned();
        let column_names = self.pagination.apply_loaded_file(page);
        self.registry = match (column_names, first_record) {
            (Some(names), _) => ColumnRegistry::build_from_names(names),
            (None, Some(record)) => ColumnRegistry::build_from_record(&record),
            (None, None) => ColumnRegistry::new(),
        };
        self.hide_configured_columns();
        self.sort = None;
        info!(
            path = %path.display(),
            total = self.pagination.state().total_record_count(),
            columns = self.registry.len(),
            "File opened"
        );
        self.file = Some(path);
    }

    /// Open `path` through `source` right away.
    ///
    /// # Errors
    ///
    /// [`ViewError::FileLoad`] if the source rejects the file.
    pub fn open_file_with<S: RecordSource + ?Sized>(
        &mut self,
        source: &mut S,
        path: impl Into<PathBuf>,
    ) -> Result<&Snapshot, ViewError> {
        let response = self.request_open_file(path).execute(source);
        self.complete(response)?;
        Ok(&self.snapshot)
    }

    /// Go to page `page_index` (clamped) through `source` right away.
    ///
    /// # Errors
    ///
    /// [`ViewError::PageFetch`] if the source cannot produce the page.
    pub fn goto_page_with<S: RecordSource + ?Sized>(
        &mut self,
        source: &mut S,
        page_index: usize,
    ) -> Result<&Snapshot, ViewError> {
        if let Some(request) = self.request_page(page_index) {
            let response = request.execute(source);
            self.complete(response)?;
        }
        Ok(&self.snapshot)
    }

    // ===== Column edits =====

    /// Select exactly `names`; unknown names are ignored.
    pub fn set_column_selection<I, S>(&mut self, names: I) -> &Snapshot
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.set_selection(names);
        self.publish();
        &self.snapshot
    }

    /// Flip one column's visibility.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] if `name` is not a column; nothing changes.
    pub fn toggle_column(&mut self, name: &str) -> Result<&Snapshot, ViewError> {
        self.edit_column(name, |registry| registry.toggle_selection(name).map(|_| ()))
    }

    /// Append `fragment` to a column's filter.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] if `name` is not a column; nothing changes.
    pub fn append_column_filter(&mut self, name: &str, fragment: &str) -> Result<&Snapshot, ViewError> {
        self.edit_column(name, |registry| registry.append_filter(name, fragment))
    }

    /// Replace a column's filter.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] if `name` is not a column; nothing changes.
    pub fn set_column_filter(&mut self, name: &str, filter: &str) -> Result<&Snapshot, ViewError> {
        self.edit_column(name, |registry| registry.set_filter(name, filter))
    }

    /// Clear a column's filter.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownColumn`] if `name` is not a column.
    pub fn clear_column_filter(&mut self, name: &str) -> Result<&Snapshot, ViewError> {
        self.edit_column(name, |registry| registry.clear_filter(name))
    }

    fn edit_column<F>(&mut self, name: &str, edit: F) -> Result<&Snapshot, ViewError>
    where
        F: FnOnce(&mut ColumnRegistry) -> Result<(), UnknownColumn>,
    {
        if let Err(e) = edit(&mut self.registry) {
            warn!(column = name, "Ignoring edit of unknown column");
            return Err(e.into());
        }
        debug!(column = name, "Column edited");
        self.publish();
        Ok(&self.snapshot)
    }

    fn hide_configured_columns(&mut self) {
        if self.hidden_columns.is_empty() {
            return;
        }
        let keep: Vec<String> = self
            .registry
            .iter()
            .filter(|c| c.selected && !self.hidden_columns.iter().any(|h| h == c.name()))
            .map(|c| c.name().to_string())
            .collect();
        self.registry.set_selection(keep);
    }

    fn publish(&mut self) {
        let state = self.pagination.state();
        let displayed_records = filter::apply(state.loaded_records(), &self.registry)
            .into_iter()
            .cloned()
            .collect();
        self.snapshot = Snapshot {
            current_page_index: state.current_page_index(),
            last_page: state.last_page(),
            page_size: state.page_size(),
            total_records: state.total_record_count(),
            columns: self.registry.iter().cloned().collect(),
            visible_columns: self.registry.visible().map(|c| c.name().to_string()).collect(),
            displayed_records,
            file: self.file.clone(),
            sort: self.sort.clone(),
        };
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
