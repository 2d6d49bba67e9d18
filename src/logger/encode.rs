//! JSON line encoding for log entries.
//!
//! Every entry becomes one JSON object followed by `\n`:
//!
//! ```text
//! {"count":1,"level":"INFO","message":"y","time":"2024-05-01T10:00:00Z"}
//! ```
//!
//! Attributes are inserted after the fixed fields into a key-unique map, so a
//! repeated key (or an attribute named `time`, `level` or `message`) replaces
//! whatever was there before it.

use chrono::SecondsFormat;
use serde_json::{Map, Number, Value as Json};
use thiserror::Error;

use crate::logger::entry::{LogEntry, Value};

/// Reasons an entry cannot be encoded. Never surfaced to emitters.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("attribute {key:?} holds a non-finite float")]
    NonFiniteFloat { key: String },

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build the JSON object for an entry.
pub fn to_object(entry: &LogEntry) -> Result<Map<String, Json>, EncodeError> {
    let mut object = Map::new();
    object.insert(
        "time".to_string(),
        Json::String(entry.time.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    object.insert("level".to_string(), Json::String(entry.level.as_str().to_string()));
    object.insert("message".to_string(), Json::String(entry.message.clone()));

    for attr in &entry.attrs {
        let value = match &attr.value {
            Value::String(s) => Json::String(s.clone()),
            Value::Int(i) => Json::from(*i),
            Value::Uint(u) => Json::from(*u),
            Value::Float(f) => Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| EncodeError::NonFiniteFloat { key: attr.key.clone() })?,
            Value::Bool(b) => Json::Bool(*b),
            Value::Null => Json::Null,
        };
        object.insert(attr.key.clone(), value);
    }

    Ok(object)
}

/// Encode an entry as a newline-terminated JSON line.
pub fn encode_line(entry: &LogEntry) -> Result<Vec<u8>, EncodeError> {
    let object = to_object(entry)?;
    let mut line = serde_json::to_vec(&object)?;
    line.push(b'\n');
    Ok(line)
}
