//! Columns and the column registry.
//!
//! The registry is keyed by column name and remembers insertion order, which
//! is the order the table shows columns in. It is rebuilt in full for every
//! newly loaded file and otherwise only mutated in place: selection flags and
//! filter text change, names never do.

use crate::model::error::UnknownColumn;
use crate::model::record::Record;
use std::collections::HashSet;

/// A named field projection with its own visibility and filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    /// Whether the column is shown.
    pub selected: bool,
    /// Substring filter; empty means no constraint.
    pub filter: String,
}

impl Column {
    /// New column: selected, no filter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selected: true,
            filter: String::new(),
        }
    }

    /// The column's name. Immutable once created.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the column constrains which records are displayed.
    pub fn has_filter(&self) -> bool {
        !self.filter.is_empty()
    }
}

/// Column name → [`Column`], in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRegistry {
    columns: Vec<Column>,
}

impl ColumnRegistry {
    /// Empty registry (no file loaded, or a file without records).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh registry with one column per field of `record`.
    ///
    /// An empty record yields an empty registry.
    pub fn build_from_record(record: &Record) -> Self {
        Self::build_from_names(record.field_names())
    }

    /// Build a fresh registry from an explicit list of names.
    ///
    /// Duplicates are dropped; the first occurrence decides the position.
    pub fn build_from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let columns = names
            .into_iter()
            .filter(|name| seen.insert(name.as_ref().to_string()))
            .map(|name| Column::new(name.as_ref()))
            .collect();
        Self { columns }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Column, UnknownColumn> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| UnknownColumn {
                name: name.to_string(),
            })
    }

    /// All columns in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Selected columns in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.selected)
    }

    /// `(name, filter)` for every column with a non-empty filter.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .filter(|c| c.has_filter())
            .map(|c| (c.name.as_str(), c.filter.as_str()))
    }

    /// Column names sorted alphabetically (for pickers).
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Select exactly the named columns; every other column is deselected.
    ///
    /// Names not in the registry are ignored. No column is added or removed.
    pub fn set_selection<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect();
        for column in &mut self.columns {
            column.selected = wanted.contains(&column.name);
        }
    }

    /// Flip one column's `selected` flag.
    ///
    /// # Errors
    ///
    /// [`UnknownColumn`] if `name` is not registered.
    pub fn toggle_selection(&mut self, name: &str) -> Result<bool, UnknownColumn> {
        let column = self.get_mut(name)?;
        column.selected = !column.selected;
        Ok(column.selected)
    }

    /// Append `fragment` to a column's filter.
    ///
    /// # Errors
    ///
    /// [`UnknownColumn`] if `name` is not registered; no column changes.
    pub fn append_filter(&mut self, name: &str, fragment: &str) -> Result<(), UnknownColumn> {
        self.get_mut(name)?.filter.push_str(fragment);
        Ok(())
    }

    /// Replace a column's filter text.
    ///
    /// # Errors
    ///
    /// [`UnknownColumn`] if `name` is not registered; no column changes.
    pub fn set_filter(&mut self, name: &str, filter: impl Into<String>) -> Result<(), UnknownColumn> {
        self.get_mut(name)?.filter = filter.into();
        Ok(())
    }

    /// Clear a column's filter.
    ///
    /// # Errors
    ///
    /// [`UnknownColumn`] if `name` is not registered.
    pub fn clear_filter(&mut self, name: &str) -> Result<(), UnknownColumn> {
        self.get_mut(name)?.filter.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "column_tests.rs"]
mod tests;
