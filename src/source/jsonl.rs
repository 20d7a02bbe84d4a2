//! Newline-delimited JSON event logs.
//!
//! One JSON object per line, which is what `evtx_dump -o jsonl` emits and
//! what most structured loggers write. Each object is flattened with
//! [`flatten_event`].

use crate::model::{FileLoadError, Record};
use crate::source::flatten::flatten_event;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Parse JSONL content into flattened records.
///
/// Blank lines are ignored. Lines that are not JSON objects are skipped with
/// a warning. If the content has lines but none of them is a record, the
/// file is not an event log.
///
/// # Errors
///
/// [`FileLoadError::Malformed`] naming the first bad line when no line parsed.
pub fn parse_records(content: &str, path: &Path) -> Result<Vec<Record>, FileLoadError> {
    let mut records = Vec::new();
    let mut first_error: Option<(usize, String)> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => records.push(flatten_event(map)),
            Ok(other) => {
                let reason = format!("expected a JSON object, found {}", json_kind(&other));
                warn!(line = line_number, %reason, "Skipping record");
                first_error.get_or_insert((line_number, reason));
            }
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping malformed record");
                first_error.get_or_insert((line_number, e.to_string()));
            }
        }
    }

    match first_error {
        Some((line, reason)) if records.is_empty() => Err(FileLoadError::Malformed {
            path: path.to_path_buf(),
            line,
            reason,
        }),
        _ => Ok(records),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
