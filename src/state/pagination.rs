//! Pagination controller.
//!
//! Owns the page cursor, page size, total record count and the records of
//! the current page. Targets are clamped into `[1, last_page]` instead of
//! rejected, so a stale "next" from the UI lands on the last page rather
//! than failing.

use crate::model::{last_page, FileLoadError, PageFetchError, PageResult, Record, DEFAULT_PAGE_SIZE};
use crate::source::RecordSource;
use std::path::Path;
use tracing::info;

/// Pagination cursor plus the records of the current page.
///
/// # Invariants
///
/// - `current_page_index` is in `[1, last_page()]`
/// - with no records: `current_page_index == 1` and `loaded_records` is empty
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    current_page_index: usize,
    page_size: usize,
    total_record_count: usize,
    loaded_records: Vec<Record>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_record_count: 0,
            loaded_records: Vec::new(),
        }
    }
}

impl PageState {
    /// 1-based index of the displayed page.
    pub fn current_page_index(&self) -> usize {
        self.current_page_index
    }

    /// Records per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Records in the whole file.
    pub fn total_record_count(&self) -> usize {
        self.total_record_count
    }

    /// Records of the current page, in source order.
    pub fn loaded_records(&self) -> &[Record] {
        &self.loaded_records
    }

    /// `ceil(total / page_size)`, or 1 when there are no records.
    pub fn last_page(&self) -> usize {
        last_page(self.total_record_count, self.page_size)
    }

    fn replace(&mut self, result: PageResult, page_index: usize) {
        self.page_size = result.page_size.max(1);
        self.total_record_count = result.total_records;
        if self.total_record_count == 0 {
            self.current_page_index = 1;
            self.loaded_records = Vec::new();
        } else {
            self.current_page_index = page_index.clamp(1, self.last_page());
            self.loaded_records = result.records;
        }
    }
}

/// Page navigation intents, resolved against the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    /// Page 1.
    First,
    /// One page back (stays on 1).
    Previous,
    /// One page forward (stays on the last page).
    Next,
    /// The last page.
    Last,
}

/// Owns [`PageState`] and talks to the record source for page data.
#[derive(Debug, Clone, Default)]
pub struct PaginationController {
    state: PageState,
}

impl PaginationController {
    /// Controller with nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page state.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// 1-based index of the displayed page.
    pub fn current_page(&self) -> usize {
        self.state.current_page_index
    }

    /// Last valid page index.
    pub fn last_page(&self) -> usize {
        self.state.last_page()
    }

    /// Clamp any requested index into `[1, last_page]`.
    pub fn clamp(&self, page_index: usize) -> usize {
        page_index.clamp(1, self.last_page())
    }

    /// Page index (already clamped) a navigation intent resolves to from
    /// page `base`.
    ///
    /// Relative steps count from `base` rather than the displayed page, so
    /// a second "next" while the first is still loading moves one further.
    pub fn target_from(&self, base: usize, nav: PageNav) -> usize {
        let raw = match nav {
            PageNav::First => 1,
            PageNav::Previous => base.saturating_sub(1),
            PageNav::Next => base.saturating_add(1),
            PageNav::Last => self.last_page(),
        };
        self.clamp(raw)
    }

    /// The page a `goto_page(page_index)` would fetch, or `None` when the
    /// clamped target is already displayed.
    pub fn plan(&self, page_index: usize) -> Option<usize> {
        let target = self.clamp(page_index);
        (target != self.current_page()).then_some(target)
    }

    /// Reset to page 1 of a newly loaded file.
    ///
    /// Returns the file's column list if the source reported one.
    pub fn apply_loaded_file(&mut self, mut result: PageResult) -> Option<Vec<String>> {
        let column_names = result.column_names.take();
        self.state.replace(result, 1);
        column_names
    }

    /// Replace the current page with a fetched one.
    pub fn apply_page(&mut self, result: PageResult) {
        let page_index = result.page_number;
        self.state.replace(result, page_index);
    }

    /// Open `path` through `source` and reset to its first page.
    ///
    /// Returns the file's column list if the source reported one.
    ///
    /// # Errors
    ///
    /// [`FileLoadError`] from the source; the page state is left untouched.
    pub fn load_file<S: RecordSource + ?Sized>(
        &mut self,
        source: &mut S,
        path: &Path,
    ) -> Result<Option<Vec<String>>, FileLoadError> {
        let result = source.load_file(path)?;
        let columns = self.apply_loaded_file(result);
        info!(
            path = %path.display(),
            total = self.state.total_record_count,
            last_page = self.last_page(),
            "File loaded"
        );
        Ok(columns)
    }

    /// Fetch `page_index` (clamped) from `source`, in file order.
    ///
    /// Returns `false` without fetching when the clamped target is the
    /// current page.
    ///
    /// # Errors
    ///
    /// [`PageFetchError`] from the source; the page state stays on the last
    /// good page.
    pub fn goto_page<S: RecordSource + ?Sized>(
        &mut self,
        source: &mut S,
        page_index: usize,
    ) -> Result<bool, PageFetchError> {
        let Some(target) = self.plan(page_index) else {
            return Ok(false);
        };
        let result = source.select_page(target, None)?;
        self.apply_page(result);
        info!(page = self.current_page(), last_page = self.last_page(), "Page changed");
        Ok(true)
    }
}
