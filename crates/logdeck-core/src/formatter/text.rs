//! Plain text formatter.

use std::fmt::{Display, Write as FmtWrite};

use chrono::SecondsFormat;

use super::{Entry, Formatter};
use crate::error::LogError;

/// Renders `[<time>][<level>] <subject>: <log>`.
///
/// Trace frames, when present, follow on their own lines as `  at <frame>`.
/// An empty frame list renders the same as no traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl<T: Display + ?Sized> Formatter<T> for TextFormatter {
    fn format(&self, entry: &Entry<'_, T>) -> Result<String, LogError> {
        let mut out = format!(
            "[{}][{}] {}: {}",
            entry.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.level,
            entry.subject,
            entry.log
        );

        if let Some(traces) = entry.traces {
            for frame in traces {
                let _ = write!(out, "\n  at {}", frame);
            }
        }

        Ok(out)
    }
}
