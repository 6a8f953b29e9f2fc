//! File driver.
//!
//! Appends one line per record to a file. Writes go through a buffer; call
//! `flush` (or drop the driver) to push them to disk.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{Completion, Driver};
use crate::error::LogError;
use crate::Timestamp;

/// Driver that appends formatted records to a file.
pub struct FileDriver {
    /// Buffered file writer; `None` once closed
    writer: Mutex<Option<BufWriter<File>>>,

    /// Path to the log file
    path: PathBuf,
}

impl FileDriver {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            writer: Mutex::new(Some(BufWriter::new(file))),
            path,
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }

    fn flush_inner(&self) -> Result<(), LogError> {
        match self.writer.lock().as_mut() {
            Some(writer) => Ok(writer.flush()?),
            None => Err(LogError::DriverClosed),
        }
    }
}

impl Driver for FileDriver {
    fn write(&self, text: &str, _subject: &str, _level: &str, _time: Timestamp) -> Result<(), LogError> {
        let mut guard = self.writer.lock();
        let writer = guard.as_mut().ok_or(LogError::DriverClosed)?;
        writeln!(writer, "{}", text)?;
        Ok(())
    }

    fn flush(&self) -> Completion {
        self.flush_inner().into()
    }

    fn close(&self) -> Completion {
        let Some(mut writer) = self.writer.lock().take() else {
            return Completion::done();
        };
        tracing::debug!(path = ?self.path, "closing file driver");
        writer.flush().map_err(LogError::from).into()
    }
}

impl Drop for FileDriver {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.get_mut().as_mut() {
            let _ = writer.flush();
        }
    }
}

impl std::fmt::Debug for FileDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDriver")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}
