//! Error types for logdeck

use thiserror::Error;

/// Errors raised while emitting a log record.
///
/// Configuration calls never produce these; they surface only from the
/// level methods of a [`Logger`](crate::Logger) and from driver I/O.
#[derive(Error, Debug)]
pub enum LogError {
    /// The logger has no level with this name
    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    /// A formatter rejected its input
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization of a log value failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Driver I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The driver was closed before the call
    #[error("Driver is closed")]
    DriverClosed,

    /// Driver-specific failure
    #[error("Driver error: {0}")]
    Driver(String),
}

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;

/// Errors building a [`LevelSet`](crate::LevelSet).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelSetError {
    /// No level names were given
    #[error("Level set must not be empty")]
    Empty,

    /// The same level name appears twice
    #[error("Duplicate level name: {0}")]
    Duplicate(String),
}

/// Errors from the name-based [`Registry`](crate::Registry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("The driver of name \"{0}\" already exists")]
    DriverExists(String),

    #[error("The driver of name \"{0}\" doesn't exist")]
    DriverNotFound(String),

    #[error("The formatter of name \"{0}\" already exists")]
    FormatterExists(String),

    #[error("The formatter of name \"{0}\" doesn't exist")]
    FormatterNotFound(String),
}

/// Errors loading or applying a [`LoggingConfig`](crate::LoggingConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid levels: {0}")]
    LevelSet(#[from] LevelSetError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}
