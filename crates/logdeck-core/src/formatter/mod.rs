//! Formatters turn a raw log value plus metadata into display text.
//!
//! A formatter is a pure function of its [`Entry`]. Loggers call it only on
//! enabled levels and hand the resulting text to the level's driver.
//!
//! ```
//! use logdeck_core::formatter::{formatter_fn, Entry};
//!
//! let upper = formatter_fn(|e: &Entry<'_, str>| {
//!     Ok(format!("{} {}", e.level.to_uppercase(), e.log))
//! });
//! # let _ = upper;
//! ```

mod json;
mod text;

pub use json::{JsonFormatter, JsonRecord};
pub use text::TextFormatter;

use std::sync::Arc;

use crate::error::LogError;
use crate::Timestamp;

/// Everything a formatter sees for one log call.
#[derive(Debug)]
pub struct Entry<'a, T: ?Sized> {
    /// The value passed to the level method.
    pub log: &'a T,
    pub subject: &'a str,
    pub level: &'a str,
    pub time: Timestamp,
    /// Call-site frames, innermost first.
    ///
    /// `None` when the level's trace depth is 0. Never `Some` of an empty
    /// slice produced by a depth of 0.
    pub traces: Option<&'a [String]>,
}

/// Turns a raw log value and its metadata into text.
pub trait Formatter<T: ?Sized>: Send + Sync {
    fn format(&self, entry: &Entry<'_, T>) -> Result<String, LogError>;
}

/// Formatter shared between levels and loggers.
pub type SharedFormatter<T> = Arc<dyn Formatter<T>>;

/// Adapter implementing [`Formatter`] for a closure.
pub struct FnFormatter<F>(F);

impl<T, F> Formatter<T> for FnFormatter<F>
where
    T: ?Sized,
    F: Fn(&Entry<'_, T>) -> Result<String, LogError> + Send + Sync,
{
    fn format(&self, entry: &Entry<'_, T>) -> Result<String, LogError> {
        (self.0)(entry)
    }
}

/// Wrap a closure as a shared formatter.
pub fn formatter_fn<T, F>(f: F) -> SharedFormatter<T>
where
    T: ?Sized + 'static,
    F: Fn(&Entry<'_, T>) -> Result<String, LogError> + Send + Sync + 'static,
{
    Arc::new(FnFormatter(f))
}
