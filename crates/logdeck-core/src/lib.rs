//! logdeck core library
//!
//! Subject-bound loggers with per-level configuration. Every level of every
//! logger has its own options (enabled, trace depth, formatter, driver) and a
//! dispatch function rebuilt whenever those options change, so a muted level
//! costs one indirect call and nothing else.
//!
//! ## Architecture
//! ```text
//! Factory (default level table)
//!     │ create_logger(subject): copies the table
//!     ▼
//! Logger (own level table + one compiled dispatch per level)
//!     │ info(value)
//!     ▼
//! Formatter ──text──► Driver (console, file, channel, ...)
//! ```
//!
//! ## Quick start
//! ```
//! use logdeck_core::{Factory, LevelSet, LevelUpdate};
//!
//! let mut factory = Factory::<str>::new(LevelSet::default());
//! factory.set_level_options(LevelUpdate::new().level("debug").enabled(false));
//!
//! let logger = factory.create_logger("Test");
//! logger.info("Hello")?.debug("hidden")?;
//! # Ok::<(), logdeck_core::LogError>(())
//! ```

pub mod bridge;
pub mod config;
mod dispatch;
pub mod driver;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod options;
pub mod registry;
mod trace;

pub use config::{LevelRule, LoggingConfig};
pub use driver::{Completion, Driver, SharedDriver};
pub use error::{ConfigError, LevelSetError, LogError, LogResult, RegistryError};
pub use factory::{create_logger, default_factory, Factory};
pub use formatter::{Entry, Formatter, SharedFormatter};
pub use level::{LevelSet, DEFAULT_LEVELS};
pub use logger::Logger;
pub use options::{LevelOptions, LevelUpdate};
pub use registry::Registry;

/// Time attached to every log record.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
