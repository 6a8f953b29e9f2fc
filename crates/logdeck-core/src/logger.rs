//! Loggers bound to a subject.
//!
//! A [`Logger`] owns its own level table (a value copy of whatever seeded it)
//! and one compiled dispatch function per level. Every configuration change
//! rebuilds the affected dispatch functions before returning, so a level
//! method always behaves as [`Logger::get_level`] describes.
//!
//! ```
//! use std::sync::Arc;
//! use logdeck_core::driver::MemoryDriver;
//! use logdeck_core::formatter::TextFormatter;
//! use logdeck_core::{Factory, LevelSet, LevelUpdate};
//!
//! let driver = Arc::new(MemoryDriver::new());
//! let factory = Factory::<str>::with_defaults(
//!     LevelSet::default(),
//!     Arc::new(TextFormatter),
//!     driver.clone(),
//! );
//!
//! let mut logger = factory.create_logger("Test");
//! logger.info("Hello")?.debug("World")?;
//! logger.set_level_options(LevelUpdate::new().level("debug").enabled(false));
//! logger.debug("not written")?;
//!
//! assert_eq!(driver.len(), 2);
//! # Ok::<(), logdeck_core::LogError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::dispatch::{self, Emit};
use crate::driver::Completion;
use crate::error::LogError;
use crate::level::LevelSet;
use crate::options::{LevelOptions, LevelTable, LevelUpdate};
use crate::Timestamp;

/// Generates the per-level convenience methods for the default level names.
macro_rules! level_methods {
    ($($level:ident, $level_at:ident;)*) => {
        $(
            #[doc = concat!("Write `log` at the `", stringify!($level), "` level, timestamped now.")]
            pub fn $level(&self, log: &T) -> Result<&Self, LogError> {
                self.emit(stringify!($level), log, None)
            }

            #[doc = concat!("Write `log` at the `", stringify!($level), "` level with an explicit time.")]
            pub fn $level_at(&self, log: &T, time: Timestamp) -> Result<&Self, LogError> {
                self.emit(stringify!($level), log, Some(time))
            }
        )*
    };
}

/// A subject-bound logger.
///
/// `T` is the type of value handed to the level methods; the default `str`
/// accepts string slices.
pub struct Logger<T: ?Sized + 'static = str> {
    subject: Arc<str>,
    table: LevelTable<T>,
    dispatch: Vec<Emit<T>>,
}

impl<T: ?Sized + 'static> Logger<T> {
    pub(crate) fn from_table(subject: Arc<str>, table: LevelTable<T>) -> Self {
        let dispatch = compile_all(&subject, &table);
        Self {
            subject,
            table,
            dispatch,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The level names this logger answers to.
    pub fn levels(&self) -> &LevelSet {
        self.table.levels()
    }

    /// Rename the logger. Every dispatch function is rebuilt.
    pub fn set_subject(&mut self, subject: impl AsRef<str>) -> &mut Self {
        self.subject = Arc::from(subject.as_ref());
        self.dispatch = compile_all(&self.subject, &self.table);
        tracing::trace!(subject = %self.subject, "logger renamed");
        self
    }

    /// Merge `update` into the targeted levels and rebuild their dispatch.
    ///
    /// Unknown level names are ignored.
    pub fn set_level_options(&mut self, update: LevelUpdate<T>) -> &mut Self {
        for index in self.table.apply(&update) {
            let level = self.table.levels().shared_name(index);
            self.dispatch[index] = dispatch::compile(&self.subject, &level, self.table.at(index));
            tracing::trace!(
                subject = %self.subject,
                level = %level,
                enabled = self.table.at(index).enabled,
                trace_depth = self.table.at(index).trace_depth,
                "dispatch rebuilt"
            );
        }
        self
    }

    /// Snapshot of the options of `level`.
    pub fn get_level(&self, level: &str) -> Option<LevelOptions<T>> {
        self.table.get(level).cloned()
    }

    /// True if `level` is disabled. Unknown levels count as muted.
    pub fn is_muted(&self, level: &str) -> bool {
        self.table.get(level).map_or(true, |options| !options.enabled)
    }

    /// Disable the given levels; an empty list disables all of them.
    pub fn mute<I, S>(&mut self, levels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_level_options(LevelUpdate::new().levels(levels).enabled(false))
    }

    /// Enable the given levels; an empty list enables all of them.
    pub fn unmute<I, S>(&mut self, levels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_level_options(LevelUpdate::new().levels(levels).enabled(true))
    }

    /// Write `log` at `level`, timestamped now.
    pub fn log(&self, level: &str, log: &T) -> Result<&Self, LogError> {
        self.emit(level, log, None)
    }

    /// Write `log` at `level` with an explicit time.
    pub fn log_at(&self, level: &str, log: &T, time: Timestamp) -> Result<&Self, LogError> {
        self.emit(level, log, Some(time))
    }

    level_methods! {
        error, error_at;
        notice, notice_at;
        warning, warning_at;
        debug, debug_at;
        info, info_at;
    }

    /// Forward to the flush of the driver behind `level`.
    ///
    /// The returned completion is not awaited here.
    pub fn flush(&self, level: &str) -> Completion {
        match self.table.get(level) {
            Some(options) => options.driver.flush(),
            None => Completion::Ready(Err(LogError::UnknownLevel(level.to_string()))),
        }
    }

    fn emit(&self, level: &str, log: &T, time: Option<Timestamp>) -> Result<&Self, LogError> {
        let index = self
            .table
            .levels()
            .index_of(level)
            .ok_or_else(|| LogError::UnknownLevel(level.to_string()))?;
        (self.dispatch[index])(log, time)?;
        Ok(self)
    }
}

fn compile_all<T: ?Sized + 'static>(subject: &Arc<str>, table: &LevelTable<T>) -> Vec<Emit<T>> {
    (0..table.levels().len())
        .map(|index| dispatch::compile(subject, &table.levels().shared_name(index), table.at(index)))
        .collect()
}

/// An independent logger: same subject, a value copy of the level table.
impl<T: ?Sized + 'static> Clone for Logger<T> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
            table: self.table.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Logger<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let muted: Vec<&str> = self
            .table
            .iter()
            .filter(|(_, options)| !options.enabled)
            .map(|(name, _)| name)
            .collect();
        f.debug_struct("Logger")
            .field("subject", &self.subject)
            .field("levels", self.table.levels())
            .field("muted", &muted)
            .finish()
    }
}
