//! Native Windows event logs (`.evtx`).
//!
//! Decoding is done by the `evtx` crate, which renders every record as the
//! JSON form of its XML (`{"Event": {"System": …, "EventData": …}}`). That
//! object goes through the same [`flatten_event`] as JSONL input, so both
//! formats produce the same columns for the same events.

use crate::model::{FileLoadError, Record};
use crate::source::flatten::flatten_event;
use ::evtx::EvtxParser;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Signature at the start of every EVTX file header.
pub const EVTX_MAGIC: &[u8; 8] = b"ElfFile\0";

/// True if `bytes` start with the EVTX file signature.
pub fn is_evtx(bytes: &[u8]) -> bool {
    bytes.starts_with(EVTX_MAGIC)
}

/// Decode every record of the EVTX file at `path`.
///
/// Records that fail to decode are skipped with a warning, as long as at
/// least one record decodes.
///
/// # Errors
///
/// [`FileLoadError::Corrupt`] when the header can't be read, or when the
/// file has records and none of them decodes.
pub fn read_evtx(path: &Path) -> Result<Vec<Record>, FileLoadError> {
    let mut parser = EvtxParser::from_path(path).map_err(|e| corrupt(path, e.to_string()))?;

    let mut records = Vec::new();
    let mut first_error: Option<String> = None;
    for result in parser.records_json_value() {
        match result {
            Ok(entry) => match event_record(entry.data) {
                Some(record) => records.push(record),
                None => {
                    warn!(record_id = entry.event_record_id, "Skipping EVTX record that is not an object");
                }
            },
            Err(e) => {
                warn!(error = %e, "Skipping undecodable EVTX record");
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    match first_error {
        Some(reason) if records.is_empty() => Err(corrupt(path, reason)),
        _ => {
            debug!(path = %path.display(), records = records.len(), "Decoded EVTX file");
            Ok(records)
        }
    }
}

/// Turn one decoded record's JSON into a table record.
pub fn event_record(data: Value) -> Option<Record> {
    match data {
        Value::Object(map) => Some(flatten_event(map)),
        _ => None,
    }
}

fn corrupt(path: &Path, reason: String) -> FileLoadError {
    FileLoadError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn magic_is_recognized() {
        assert!(is_evtx(b"ElfFile\0\x00\x00\x00\x00"));
        assert!(!is_evtx(b"ElfFile"));
        assert!(!is_evtx(b"{\"User\": \"alice\"}"));
    }

    #[test]
    fn decoded_event_is_flattened() {
        let data = json!({
            "Event": {
                "#attributes": {"xmlns": "http://schemas.microsoft.com/win/2004/08/events/event"},
                "System": {
                    "Provider": {"#attributes": {"Name": "Microsoft-Windows-Security-Auditing"}},
                    "EventID": 4624,
                    "EventRecordID": 7,
                    "Computer": "dc1"
                },
                "EventData": {"TargetUserName": "alice", "LogonType": 3}
            }
        });

        let record = event_record(data).unwrap();

        assert_eq!(record.record_id(), Some(7));
        assert_eq!(
            record.text("Provider.Name").as_deref(),
            Some("Microsoft-Windows-Security-Auditing")
        );
        assert_eq!(record.text("TargetUserName").as_deref(), Some("alice"));
        assert!(record.get("xmlns").is_none());
    }

    #[test]
    fn non_object_data_is_skipped() {
        assert_eq!(event_record(json!("<Event/>")), None);
    }

    #[test]
    fn truncated_header_is_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ElfFile\0\x01\x02\x03\x04").unwrap();

        let err = read_evtx(file.path()).unwrap_err();

        assert!(matches!(err, FileLoadError::Corrupt { .. }));
    }
}
