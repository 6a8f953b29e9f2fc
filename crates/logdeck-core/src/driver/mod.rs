//! Drivers own the actual output of formatted log text.
//!
//! ## Architecture
//! ```text
//! logger.info(value)
//!     → compiled dispatch (per level)
//!     → Formatter::format(&Entry)   → text
//!     → Driver::write(text, subject, level, time)
//! ```
//!
//! Drivers are shared by reference: one instance may serve many levels of many
//! loggers. Methods take `&self`; a driver that needs mutable state guards it
//! itself. The core only calls `write`, `flush` and `close` and never awaits
//! the returned [`Completion`].
//!
//! ## Built-in drivers
//! - [`ConsoleDriver`] - one line per record on stdout
//! - [`ColorfulConsoleDriver`] - stdout with per-level ANSI colors
//! - [`FileDriver`] - buffered append to a file
//! - [`ChannelDriver`] - background tokio writer task
//! - [`MemoryDriver`] - keeps records in memory (tests, inspection)
//! - [`TracingDriver`] - re-emits records as `tracing` events

mod channel;
mod colorful;
mod console;
mod file;
mod memory;
mod tracing_adapter;

pub use channel::ChannelDriver;
pub use colorful::{Color, ColorfulConsoleDriver};
pub use console::ConsoleDriver;
pub use file::FileDriver;
pub use memory::{MemoryDriver, WrittenRecord};
pub use tracing_adapter::TracingDriver;

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::LogError;
use crate::Timestamp;

/// Output destination for formatted log text.
pub trait Driver: Send + Sync {
    /// Send one formatted record to the output device.
    fn write(&self, text: &str, subject: &str, level: &str, time: Timestamp)
        -> Result<(), LogError>;

    /// Flush all records buffered by the driver.
    fn flush(&self) -> Completion;

    /// Shut the driver down. Implementations flush before releasing resources.
    fn close(&self) -> Completion;
}

/// Driver shared between levels and loggers.
pub type SharedDriver = Arc<dyn Driver>;

/// Future half of a [`Completion`].
pub type PendingCompletion = Pin<Box<dyn Future<Output = Result<(), LogError>> + Send + 'static>>;

/// Outcome of a `flush` or `close` call.
///
/// Synchronous drivers finish before returning and hand back `Ready`.
/// Asynchronous drivers hand back `Pending`, which resolves once the work
/// is done. Both forms can be `.await`ed.
pub enum Completion {
    Ready(Result<(), LogError>),
    Pending(PendingCompletion),
}

impl Completion {
    /// A successful, already finished completion.
    pub fn done() -> Self {
        Completion::Ready(Ok(()))
    }

    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = Result<(), LogError>> + Send + 'static,
    {
        Completion::Pending(Box::pin(fut))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Completion::Pending(_))
    }

    /// The result, if the work already finished.
    pub fn ready(self) -> Option<Result<(), LogError>> {
        match self {
            Completion::Ready(result) => Some(result),
            Completion::Pending(_) => None,
        }
    }
}

impl From<Result<(), LogError>> for Completion {
    fn from(result: Result<(), LogError>) -> Self {
        Completion::Ready(result)
    }
}

impl IntoFuture for Completion {
    type Output = Result<(), LogError>;
    type IntoFuture = PendingCompletion;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Completion::Ready(result) => Box::pin(std::future::ready(result)),
            Completion::Pending(fut) => fut,
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Completion::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
