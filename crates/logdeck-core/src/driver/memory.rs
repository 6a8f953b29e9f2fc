//! In-memory driver.

use parking_lot::Mutex;

use super::{Completion, Driver};
use crate::error::LogError;
use crate::Timestamp;

/// One record received by a [`MemoryDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenRecord {
    pub text: String,
    pub subject: String,
    pub level: String,
    pub time: Timestamp,
}

/// Keeps every written record, plus flush/close counters.
///
/// Useful as a spy in tests and for inspecting what a logger produced.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    records: Mutex<Vec<WrittenRecord>>,
    flushes: Mutex<usize>,
    closed: Mutex<bool>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<WrittenRecord> {
        self.records.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

impl Driver for MemoryDriver {
    fn write(&self, text: &str, subject: &str, level: &str, time: Timestamp) -> Result<(), LogError> {
        if self.is_closed() {
            return Err(LogError::DriverClosed);
        }
        self.records.lock().push(WrittenRecord {
            text: text.to_string(),
            subject: subject.to_string(),
            level: level.to_string(),
            time,
        });
        Ok(())
    }

    fn flush(&self) -> Completion {
        *self.flushes.lock() += 1;
        Completion::done()
    }

    fn close(&self) -> Completion {
        let flushed = self.flush();
        *self.closed.lock() = true;
        flushed
    }
}
