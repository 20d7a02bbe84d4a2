//! Event records as handed out by a record source.
//!
//! A record is an insertion-ordered mapping from field name to JSON value.
//! Field order is the order the record source produced, which is also the
//! order columns appear in when a registry is built from a record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Field naming the file a record was loaded from.
pub const SOURCE_FILE_FIELD: &str = "SourceFile";

/// Field holding the user's flag mark.
pub const FLAGGED_FIELD: &str = "Flagged";

/// Field holding the event's record number, used to address single records.
pub const RECORD_ID_FIELD: &str = "EventRecordID";

/// One event record: ordered field name → value mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Field names in source order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Raw value of a field, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Value of a field rendered as text, or `None` if the field is absent.
    ///
    /// Strings are returned as-is, without JSON quoting. See [`render_value`].
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.0.get(field).map(render_value)
    }

    /// Insert or replace a field, keeping its original position if it existed.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// The record's `EventRecordID`, if it has a numeric one.
    ///
    /// String ids holding a decimal number are accepted too, since some
    /// exporters quote them.
    pub fn record_id(&self) -> Option<u64> {
        match self.0.get(RECORD_ID_FIELD)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True if the record carries `Flagged: true`.
    pub fn is_flagged(&self) -> bool {
        matches!(self.0.get(FLAGGED_FIELD), Some(Value::Bool(true)))
    }

    /// Flip the `Flagged` field and return the new state.
    ///
    /// An absent or non-boolean field counts as unflagged.
    pub fn toggle_flag(&mut self) -> bool {
        let flagged = !self.is_flagged();
        self.0.insert(FLAGGED_FIELD.to_string(), Value::Bool(flagged));
        flagged
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Render a JSON value as display/filter text.
///
/// - strings: raw text
/// - numbers: decimal form
/// - booleans: `true` / `false`
/// - null: empty string
/// - arrays and objects: compact JSON
pub fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}
