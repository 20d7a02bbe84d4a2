//! Page results exchanged with a record source.

use crate::model::record::Record;

/// Records per page when configuration doesn't say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of records as returned by a record source.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// 1-based index of this page.
    pub page_number: usize,
    /// Records per page.
    pub page_size: usize,
    /// Total records in the loaded file.
    pub total_records: usize,
    /// This page's records, in source order.
    pub records: Vec<Record>,
    /// Full column list of the file, when the source knows it.
    ///
    /// Only set on file load. When `None`, columns are derived from the
    /// first record.
    pub column_names: Option<Vec<String>>,
}

impl PageResult {
    /// Page with no column list.
    pub fn new(page_number: usize, page_size: usize, total_records: usize, records: Vec<Record>) -> Self {
        Self {
            page_number,
            page_size,
            total_records,
            records,
            column_names: None,
        }
    }

    /// Attach the file's full column list.
    pub fn with_column_names(mut self, names: Vec<String>) -> Self {
        self.column_names = Some(names);
        self
    }
}

/// Number of pages for `total_records` at `page_size`.
///
/// `ceil(total / size)` when there are records, else 1. A zero page size is
/// treated as 1.
pub fn last_page(total_records: usize, page_size: usize) -> usize {
    if total_records == 0 {
        1
    } else {
        total_records.div_ceil(page_size.max(1))
    }
}
