//! Export/import boundary for the emotion history.

use std::collections::HashSet;

use serde_json::Value;

use crate::{error::ValidationError, models::Observation};

/// Pretty-printed JSON array, two-space indent, one object per observation.
pub fn export(history: &[Observation]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(history)
}

/// Compact form written to the storage slot.
pub(crate) fn encode(history: &[Observation]) -> Result<String, serde_json::Error> {
    serde_json::to_string(history)
}

/// Decode a stored slot. Every element has to be a well-formed observation;
/// one bad element rejects the whole collection.
pub(crate) fn decode(text: &str) -> Result<Vec<Observation>, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(ValidationError::Malformed)?;
    let Value::Array(items) = value else {
        return Err(ValidationError::NotASequence {
            found: kind_of(&value),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Observation>(item).map_err(|err| {
                ValidationError::InvalidRecord {
                    index,
                    reason: err.to_string(),
                }
            })
        })
        .collect()
}

/// Validate user-supplied snapshot text before it may replace the history.
pub fn parse(text: &str) -> Result<Vec<Observation>, ValidationError> {
    let records = decode(text)?;
    let mut seen_ids = HashSet::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        if !(0.0..=1.0).contains(&record.confidence) {
            return Err(ValidationError::InvalidRecord {
                index,
                reason: format!("confidence {} outside [0, 1]", record.confidence),
            });
        }
        if !seen_ids.insert(record.id) {
            return Err(ValidationError::InvalidRecord {
                index,
                reason: format!("id {} appears more than once", record.id),
            });
        }
    }
    Ok(records)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
