//! Dispatch compiler.
//!
//! Each (logger, level) pair owns one [`Emit`] callable built from the
//! level's resolved options. The shape is chosen here, once per rebuild:
//!
//! ```text
//! enabled = false            → muted: returns Ok(()) and touches nothing
//! enabled, trace_depth == 0  → now? → format(entry)          → driver.write
//! enabled, trace_depth  > 0  → now? → capture → format(entry) → driver.write
//! ```
//!
//! Nothing is re-read from shared state at call time.

use std::sync::Arc;

use chrono::Utc;

use crate::error::LogError;
use crate::formatter::Entry;
use crate::options::LevelOptions;
use crate::trace;
use crate::Timestamp;

/// Compiled emission function of one level. `None` time means "now".
pub(crate) type Emit<T> =
    Arc<dyn Fn(&T, Option<Timestamp>) -> Result<(), LogError> + Send + Sync>;

/// Build the emission function for `level` of a logger named `subject`.
pub(crate) fn compile<T: ?Sized + 'static>(
    subject: &Arc<str>,
    level: &Arc<str>,
    options: &LevelOptions<T>,
) -> Emit<T> {
    if !options.enabled {
        return muted();
    }

    let subject = Arc::clone(subject);
    let level = Arc::clone(level);
    let formatter = Arc::clone(&options.formatter);
    let driver = Arc::clone(&options.driver);

    match options.trace_depth {
        0 => Arc::new(move |log: &T, time: Option<Timestamp>| {
            let time = time.unwrap_or_else(Utc::now);
            let text = formatter.format(&Entry {
                log,
                subject: &subject,
                level: &level,
                time,
                traces: None,
            })?;
            driver.write(&text, &subject, &level, time)
        }),
        depth => Arc::new(move |log: &T, time: Option<Timestamp>| {
            let time = time.unwrap_or_else(Utc::now);
            let traces = trace::capture(depth);
            let text = formatter.format(&Entry {
                log,
                subject: &subject,
                level: &level,
                time,
                traces: Some(&traces),
            })?;
            driver.write(&text, &subject, &level, time)
        }),
    }
}

fn muted<T: ?Sized + 'static>() -> Emit<T> {
    Arc::new(|_: &T, _: Option<Timestamp>| Ok(()))
}
