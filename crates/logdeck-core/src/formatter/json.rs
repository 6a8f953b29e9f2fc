//! JSON formatter.
//!
//! Each record becomes a single-line JSON object, suitable for JSONL sinks:
//!
//! ```text
//! {"subject":"api","level":"info","time":1517484153000,"log":{"user":"admin"}}
//! ```

use serde::Serialize;

use super::{Entry, Formatter};
use crate::error::LogError;

/// Serialized shape of one record.
#[derive(Debug, Serialize)]
pub struct JsonRecord<'a, T: ?Sized + Serialize> {
    pub subject: &'a str,
    pub level: &'a str,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub log: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<&'a [String]>,
}

impl<'a, T: ?Sized + Serialize> JsonRecord<'a, T> {
    pub fn from_entry(entry: &Entry<'a, T>) -> Self {
        Self {
            subject: entry.subject,
            level: entry.level,
            time: entry.time.timestamp_millis(),
            log: entry.log,
            traces: entry.traces,
        }
    }
}

/// Formats records as one-line JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl<T: Serialize + ?Sized> Formatter<T> for JsonFormatter {
    fn format(&self, entry: &Entry<'_, T>) -> Result<String, LogError> {
        Ok(serde_json::to_string(&JsonRecord::from_entry(entry))?)
    }
}
