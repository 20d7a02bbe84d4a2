//! Filter evaluator.
//!
//! Pure function of the loaded page and the registry's filter strings. A
//! record is kept when, for every column with a non-empty filter, the
//! record's value for that column (rendered as text) contains the filter as
//! a case-sensitive substring. A record without the field fails that column.
//!
//! Selection plays no part here: a hidden column still filters.

use crate::model::{ColumnRegistry, Record};

/// True if `record` passes every active filter in `registry`.
pub fn matches(record: &Record, registry: &ColumnRegistry) -> bool {
    registry
        .active_filters()
        .all(|(name, filter)| passes(record, name, filter))
}

/// Records of `records` that pass every active filter, in their original order.
pub fn apply<'a>(records: &'a [Record], registry: &ColumnRegistry) -> Vec<&'a Record> {
    records.iter().filter(|record| matches(record, registry)).collect()
}

fn passes(record: &Record, name: &str, filter: &str) -> bool {
    record.text(name).is_some_and(|text| text.contains(filter))
}
