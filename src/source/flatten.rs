//! Flattening of structured event objects into table records.
//!
//! Windows event records nest their fields: an `Event` object holds a
//! `System` section and an `EventData` section, and some fields carry their
//! payload in an `#attributes` object. The table wants one flat row, so the
//! two sections are lifted to the top level and every `#attributes` object
//! becomes one `field.attribute` column each.

use crate::model::Record;
use serde_json::{Map, Value};

/// Flatten one raw event object into a record.
///
/// If the object has an `Event` object, its `System` and `EventData` fields
/// become the record's fields (an `Event` with neither is used as-is). Then
/// every field whose value is an object with `#attributes` is replaced by
/// `field.attribute` fields.
pub fn flatten_event(mut map: Map<String, Value>) -> Record {
    if matches!(map.get("Event"), Some(Value::Object(_))) {
        if let Some(Value::Object(event)) = map.shift_remove("Event") {
            map = lift_event_sections(event);
        }
    }
    expand_attributes(map)
}

fn lift_event_sections(mut event: Map<String, Value>) -> Map<String, Value> {
    let system = event.shift_remove("System");
    let data = event.shift_remove("EventData");
    if system.is_none() && data.is_none() {
        return event;
    }

    let mut flat = Map::new();
    for section in [system, data].into_iter().flatten() {
        if let Value::Object(fields) = section {
            flat.extend(fields);
        }
    }
    flat
}

fn expand_attributes(map: Map<String, Value>) -> Record {
    let mut record = Record::new();
    for (field, value) in map {
        match value {
            Value::Object(mut nested) if nested.contains_key("#attributes") => {
                if let Some(Value::Object(attributes)) = nested.shift_remove("#attributes") {
                    for (attribute, v) in attributes {
                        record.insert(format!("{field}.{attribute}"), v);
                    }
                }
            }
            other => {
                record.insert(field, other);
            }
        }
    }
    record
}
