//! Record ordering by one column.

use crate::model::record::{render_value, Record};
use serde_json::Value;
use std::cmp::Ordering;

/// Sort records by one column, ascending or descending.
///
/// Records missing the column always sort after the ones that have it,
/// whichever the direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    /// Column to sort by.
    pub column: String,
    /// Smallest value first when true.
    pub ascending: bool,
}

impl SortOrder {
    /// Ascending order on `column`.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    /// Descending order on `column`.
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    /// Next step of the sort cycle for `column`.
    ///
    /// Unsorted (or sorted by another column) → ascending → descending →
    /// unsorted.
    ///
    /// # Examples
    ///
    /// ```
    /// use venture::model::SortOrder;
    ///
    /// let first = SortOrder::cycle(None, "User");
    /// assert_eq!(first, Some(SortOrder::ascending("User")));
    /// let second = SortOrder::cycle(first.as_ref(), "User");
    /// assert_eq!(second, Some(SortOrder::descending("User")));
    /// assert_eq!(SortOrder::cycle(second.as_ref(), "User"), None);
    /// ```
    pub fn cycle(current: Option<&SortOrder>, column: &str) -> Option<SortOrder> {
        match current {
            Some(order) if order.column == column && order.ascending => {
                Some(Self::descending(column))
            }
            Some(order) if order.column == column => None,
            _ => Some(Self::ascending(column)),
        }
    }

    /// Compare two records under this order.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (a.get(&self.column), b.get(&self.column)) {
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y);
                if self.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x.cmp(&y)
            } else {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // mixed types: fall back to the text the table shows
        _ => render_value(a).cmp(&render_value(b)),
    }
}
