//! Plain console driver.

use std::io::Write;

use super::{Completion, Driver};
use crate::error::LogError;
use crate::Timestamp;

/// Writes each record to stdout as one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDriver;

impl ConsoleDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for ConsoleDriver {
    fn write(&self, text: &str, _subject: &str, _level: &str, _time: Timestamp) -> Result<(), LogError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", text)?;
        Ok(())
    }

    fn flush(&self) -> Completion {
        std::io::stdout().flush().map_err(LogError::from).into()
    }

    fn close(&self) -> Completion {
        // stdout is not ours to release
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_driver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConsoleDriver>();
    }

    #[test]
    fn test_console_flush_is_ready() {
        let driver = ConsoleDriver::new();
        driver
            .write("console driver test line", "test", "info", chrono::Utc::now())
            .unwrap();
        let completion = driver.flush();
        assert!(!completion.is_pending());
        assert!(driver.close().ready().unwrap().is_ok());
    }
}
