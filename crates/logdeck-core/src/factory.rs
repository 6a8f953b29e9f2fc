//! Logger factories and the process-wide default factory.
//!
//! A [`Factory`] holds the default level table new loggers are seeded from.
//! Seeding copies the table, so later changes to the factory never reach
//! loggers it already created. Factories share nothing with each other.

use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde::Serialize;

use crate::driver::{ConsoleDriver, SharedDriver};
use crate::formatter::{JsonFormatter, SharedFormatter, TextFormatter};
use crate::level::LevelSet;
use crate::logger::Logger;
use crate::options::{LevelOptions, LevelTable, LevelUpdate};

/// Source of loggers sharing one set of default level options.
pub struct Factory<T: ?Sized + 'static = str> {
    table: LevelTable<T>,
}

impl<T: ?Sized + 'static> Factory<T> {
    /// Every level starts enabled, untraced, with `formatter` and `driver`.
    pub fn with_defaults(levels: LevelSet, formatter: SharedFormatter<T>, driver: SharedDriver) -> Self {
        Self {
            table: LevelTable::new(levels, LevelOptions::new(formatter, driver)),
        }
    }

    pub fn levels(&self) -> &LevelSet {
        self.table.levels()
    }

    /// Change the defaults for loggers created after this call.
    pub fn set_level_options(&mut self, update: LevelUpdate<T>) -> &mut Self {
        let touched = self.table.apply(&update);
        tracing::trace!(
            levels = ?touched.iter().map(|&i| self.table.levels().name(i)).collect::<Vec<_>>(),
            "factory defaults updated"
        );
        self
    }

    /// Disable the given levels for future loggers; an empty list means all.
    pub fn mute<I, S>(&mut self, levels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_level_options(LevelUpdate::new().levels(levels).enabled(false))
    }

    /// Enable the given levels for future loggers; an empty list means all.
    pub fn unmute<I, S>(&mut self, levels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_level_options(LevelUpdate::new().levels(levels).enabled(true))
    }

    /// Snapshot of the default options of `level`.
    pub fn get_level_options(&self, level: &str) -> Option<LevelOptions<T>> {
        self.table.get(level).cloned()
    }

    /// Create a new, independent logger seeded with a copy of the defaults.
    ///
    /// Repeated subjects yield distinct loggers.
    pub fn create_logger(&self, subject: impl AsRef<str>) -> Logger<T> {
        let subject: Arc<str> = Arc::from(subject.as_ref());
        tracing::trace!(subject = %subject, "logger created");
        Logger::from_table(subject, self.table.clone())
    }
}

impl<T: Display + ?Sized + 'static> Factory<T> {
    /// Factory writing text lines to a console driver of its own.
    pub fn new(levels: LevelSet) -> Self {
        Self::with_defaults(levels, Arc::new(TextFormatter), Arc::new(ConsoleDriver::new()))
    }
}

impl<T: Serialize + ?Sized + 'static> Factory<T> {
    /// Factory writing JSON lines to a console driver of its own.
    pub fn json(levels: LevelSet) -> Self {
        Self::with_defaults(levels, Arc::new(JsonFormatter), Arc::new(ConsoleDriver::new()))
    }
}

impl Default for Factory<str> {
    fn default() -> Self {
        Self::new(LevelSet::default())
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("levels", self.table.levels())
            .finish_non_exhaustive()
    }
}

static DEFAULT_FACTORY: OnceLock<Mutex<Factory<str>>> = OnceLock::new();

/// The process-wide default factory, created on first use.
///
/// It uses the default levels, the text formatter and a console driver, and
/// lives until the process exits.
pub fn default_factory() -> &'static Mutex<Factory<str>> {
    DEFAULT_FACTORY.get_or_init(|| Mutex::new(Factory::default()))
}

/// Create a logger from the default factory.
pub fn create_logger(subject: impl AsRef<str>) -> Logger<str> {
    default_factory().lock().create_logger(subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MemoryDriver;

    fn factory(driver: Arc<MemoryDriver>) -> Factory<str> {
        Factory::with_defaults(LevelSet::default(), Arc::new(TextFormatter), driver)
    }

    #[test]
    fn test_logger_inherits_defaults() {
        let driver = Arc::new(MemoryDriver::new());
        let mut factory = factory(driver.clone());
        factory.set_level_options(LevelUpdate::new().level("debug").enabled(false).trace_depth(2));

        let logger = factory.create_logger("X");
        assert!(logger.is_muted("debug"));
        assert_eq!(logger.get_level("debug").unwrap().trace_depth, 2);
        assert!(!logger.is_muted("info"));
    }

    #[test]
    fn test_factory_changes_do_not_reach_existing_loggers() {
        let driver = Arc::new(MemoryDriver::new());
        let mut factory = factory(driver.clone());
        let logger = factory.create_logger("X");

        let other: SharedDriver = Arc::new(MemoryDriver::new());
        factory.set_level_options(LevelUpdate::new().enabled(false).driver(other.clone()));

        assert!(!logger.is_muted("info"));
        logger.info("still here").unwrap();
        assert_eq!(driver.len(), 1);

        let later = factory.create_logger("Y");
        assert!(later.is_muted("info"));
        assert!(Arc::ptr_eq(&later.get_level("info").unwrap().driver, &other));
    }

    #[test]
    fn test_factory_mute_and_unmute() {
        let mut factory = factory(Arc::new(MemoryDriver::new()));

        factory.mute(["debug", "info"]);
        let logger = factory.create_logger("X");
        assert!(logger.is_muted("debug"));
        assert!(logger.is_muted("info"));
        assert!(!logger.is_muted("error"));

        factory.mute(Vec::<String>::new());
        assert!(factory.levels().iter().all(|l| !factory.get_level_options(l).unwrap().enabled));

        factory.unmute(["info"]);
        assert!(factory.get_level_options("info").unwrap().enabled);
        assert!(!factory.get_level_options("debug").unwrap().enabled);
        assert!(logger.is_muted("info"));
    }

    #[test]
    fn test_get_level_options() {
        let factory = factory(Arc::new(MemoryDriver::new()));
        let options = factory.get_level_options("error").unwrap();
        assert!(options.enabled);
        assert_eq!(options.trace_depth, 0);
        assert!(factory.get_level_options("nope").is_none());
    }

    #[test]
    fn test_factories_are_isolated() {
        let a = Factory::<str>::new(LevelSet::default());
        let mut b = Factory::<str>::new(LevelSet::default());
        b.set_level_options(LevelUpdate::new().enabled(false));

        let da = a.get_level_options("info").unwrap().driver;
        let db = b.get_level_options("info").unwrap().driver;
        assert!(!Arc::ptr_eq(&da, &db));
        assert!(a.get_level_options("info").unwrap().enabled);
    }

    #[test]
    fn test_custom_level_set() {
        let levels = LevelSet::new(["trace", "fatal"]).unwrap();
        let driver = Arc::new(MemoryDriver::new());
        let factory = Factory::<str>::with_defaults(levels, Arc::new(TextFormatter), driver.clone());

        let logger = factory.create_logger("custom");
        logger.log("fatal", "boom").unwrap();
        assert!(logger.info("no such level").is_err());
        assert_eq!(driver.records()[0].level, "fatal");
    }

    #[test]
    fn test_default_factory_is_shared() {
        let first = default_factory() as *const _;
        let second = default_factory() as *const _;
        assert_eq!(first, second);

        let logger = create_logger("global");
        assert_eq!(logger.subject(), "global");
        assert_eq!(logger.levels(), &LevelSet::default());
    }
}
