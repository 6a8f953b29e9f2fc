//! Tracing library adapter driver.

use super::{Completion, Driver};
use crate::error::LogError;
use crate::Timestamp;

/// Driver that re-emits every record as a `tracing` event.
///
/// This lets logdeck loggers feed an application that already collects its
/// output through a `tracing` subscriber. Level names map as follows:
/// `error` → ERROR, `warning`/`warn` → WARN, `notice`/`info` → INFO,
/// `debug` → DEBUG, anything else → TRACE.
///
/// Do not combine with [`LoggerLayer`](crate::bridge::LoggerLayer) on the
/// same logger: the two would feed each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDriver;

impl TracingDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Driver for TracingDriver {
    fn write(&self, text: &str, subject: &str, level: &str, _time: Timestamp) -> Result<(), LogError> {
        match level {
            "error" => tracing::error!(subject, level, "{}", text),
            "warning" | "warn" => tracing::warn!(subject, level, "{}", text),
            "notice" | "info" => tracing::info!(subject, level, "{}", text),
            "debug" => tracing::debug!(subject, level, "{}", text),
            _ => tracing::trace!(subject, level, "{}", text),
        }
        Ok(())
    }

    fn flush(&self) -> Completion {
        Completion::done()
    }

    fn close(&self) -> Completion {
        Completion::done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::prelude::*;

    /// Collects `(level, message)` pairs.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<(tracing::Level, String)>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
            struct Message(String);
            impl tracing::field::Visit for Message {
                fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                    if field.name() == "message" {
                        self.0 = format!("{:?}", value);
                    }
                }
            }
            let mut msg = Message(String::new());
            event.record(&mut msg);
            self.0.lock().unwrap().push((*event.metadata().level(), msg.0));
        }
    }

    #[test]
    fn test_tracing_driver_maps_levels() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let driver = TracingDriver::new();
            let now = chrono::Utc::now();
            driver.write("boom", "svc", "error", now).unwrap();
            driver.write("careful", "svc", "warning", now).unwrap();
            driver.write("hello", "svc", "notice", now).unwrap();
            driver.write("detail", "svc", "debug", now).unwrap();
            driver.write("custom", "svc", "verbose", now).unwrap();
        });

        let events = capture.0.lock().unwrap().clone();
        let levels: Vec<_> = events.iter().map(|(l, _)| *l).collect();
        assert_eq!(
            levels,
            vec![
                tracing::Level::ERROR,
                tracing::Level::WARN,
                tracing::Level::INFO,
                tracing::Level::DEBUG,
                tracing::Level::TRACE,
            ]
        );
        assert_eq!(events[0].1, "boom");
    }

    #[test]
    fn test_tracing_driver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingDriver>();
    }
}
