//! Bridge from `tracing` events into a logdeck [`Logger`].
//!
//! Install [`LoggerLayer`] on a `tracing_subscriber` registry to have
//! `tracing` events written through a logger's per-level configuration.
//!
//! ```
//! use std::sync::Arc;
//! use logdeck_core::bridge::LoggerLayer;
//! use logdeck_core::driver::MemoryDriver;
//! use logdeck_core::formatter::TextFormatter;
//! use logdeck_core::{Factory, LevelSet};
//! use tracing_subscriber::prelude::*;
//!
//! let driver = Arc::new(MemoryDriver::new());
//! let factory = Factory::<str>::with_defaults(LevelSet::default(), Arc::new(TextFormatter), driver.clone());
//! let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(factory.create_logger("app")));
//!
//! tracing::subscriber::with_default(subscriber, || {
//!     tracing::info!(user = "ana", "signed in");
//! });
//! assert!(driver.texts()[0].ends_with("app: signed in user=ana"));
//! ```

use std::fmt::Write as FmtWrite;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::logger::Logger;

/// A tracing Layer that writes events through a [`Logger<str>`].
///
/// Errors from the logger's formatter or driver are dropped; a layer has no
/// caller to report them to.
pub struct LoggerLayer {
    logger: Logger<str>,
}

impl LoggerLayer {
    pub fn new(logger: Logger<str>) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger<str> {
        &self.logger
    }
}

/// Logdeck level name for a tracing level.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "error",
        Level::WARN => "warning",
        Level::INFO => "info",
        _ => "debug",
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let level = level_name(event.metadata().level());
        if self.logger.is_muted(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                let _ = write!(&mut line, "[{}] ", spans.join(" > "));
            }
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        for (name, value) in &visitor.fields {
            let _ = write!(&mut line, " {}={}", name, value);
        }

        let _ = self.logger.log(level, &line);
    }
}

/// Collects the message and the remaining fields of an event.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MemoryDriver;
    use crate::factory::Factory;
    use crate::formatter::TextFormatter;
    use crate::level::LevelSet;
    use std::sync::Arc;
    use tracing_subscriber::prelude::*;

    fn layer(driver: Arc<MemoryDriver>) -> LoggerLayer {
        let factory = Factory::<str>::with_defaults(LevelSet::default(), Arc::new(TextFormatter), driver);
        let mut logger = factory.create_logger("bridge");
        logger.mute(["debug"]);
        LoggerLayer::new(logger)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_name(&Level::ERROR), "error");
        assert_eq!(level_name(&Level::WARN), "warning");
        assert_eq!(level_name(&Level::INFO), "info");
        assert_eq!(level_name(&Level::DEBUG), "debug");
        assert_eq!(level_name(&Level::TRACE), "debug");
    }

    #[test]
    fn test_events_forwarded() {
        let driver = Arc::new(MemoryDriver::new());
        let subscriber = tracing_subscriber::registry().with(layer(driver.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(count = 3, "disk almost full");
            tracing::debug!("muted");
            let span = tracing::info_span!("sync");
            let _guard = span.enter();
            tracing::error!("peer lost");
        });

        let records = driver.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, "warning");
        assert!(records[0].text.ends_with("bridge: disk almost full count=3"));
        assert_eq!(records[1].level, "error");
        assert!(records[1].text.ends_with("bridge: [sync] peer lost"));
    }
}
