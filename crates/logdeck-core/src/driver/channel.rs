//! Driver backed by a background tokio writer task.
//!
//! `write` only enqueues the line, so it never blocks the logging thread.
//! `flush` and `close` return [`Completion::Pending`] handles that resolve
//! once the writer task has processed every line queued before them.
//! Once `close` is called, later writes and flushes fail with
//! [`LogError::DriverClosed`], even while the close is still pending.
//!
//! ```text
//! write(text) ──► [unbounded queue] ──► writer task ──► AsyncWrite
//! flush()     ──► Flush(ack)        ──►   flush()   ──► ack.send(result)
//! close()     ──► Close(ack)        ──►   flush + shutdown, task exits
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::{Completion, Driver};
use crate::error::LogError;
use crate::Timestamp;

enum Command {
    Line(String),
    Flush(oneshot::Sender<Result<(), LogError>>),
    Close(oneshot::Sender<Result<(), LogError>>),
}

/// Queues records for a writer task running on the tokio runtime.
#[derive(Debug, Clone)]
pub struct ChannelDriver {
    tx: mpsc::UnboundedSender<Command>,
    closed: Arc<AtomicBool>,
}

impl ChannelDriver {
    /// Spawn the writer task on the current tokio runtime.
    ///
    /// The task ends after `close`, or once every clone of the driver is
    /// dropped, and hands the writer back through the join handle.
    ///
    /// # Panics
    /// If called outside a tokio runtime.
    pub fn spawn<W>(writer: W) -> (Self, JoinHandle<W>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(writer, rx));
        let closed = Arc::new(AtomicBool::new(false));
        (Self { tx, closed }, handle)
    }

    /// True once `close` was called or the writer task has stopped.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.tx.is_closed()
    }

    fn request(&self, make: fn(oneshot::Sender<Result<(), LogError>>) -> Command) -> Completion {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(make(ack_tx)).is_err() {
            return Completion::Ready(Err(LogError::DriverClosed));
        }
        Completion::pending(async move { ack_rx.await.unwrap_or(Err(LogError::DriverClosed)) })
    }
}

impl Driver for ChannelDriver {
    fn write(&self, text: &str, _subject: &str, _level: &str, _time: Timestamp) -> Result<(), LogError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LogError::DriverClosed);
        }
        self.tx
            .send(Command::Line(text.to_string()))
            .map_err(|_| LogError::DriverClosed)
    }

    fn flush(&self) -> Completion {
        if self.closed.load(Ordering::Acquire) {
            return Completion::Ready(Err(LogError::DriverClosed));
        }
        self.request(Command::Flush)
    }

    fn close(&self) -> Completion {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Completion::done();
        }
        self.request(Command::Close)
    }
}

async fn run_writer<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<Command>) -> W
where
    W: AsyncWrite + Unpin,
{
    // First write failure since the last flush; reported by the next flush.
    let mut failure: Option<std::io::Error> = None;

    while let Some(command) = rx.recv().await {
        match command {
            Command::Line(mut line) => {
                if failure.is_some() {
                    continue;
                }
                line.push('\n');
                if let Err(e) = writer.write_all(line.as_bytes()).await {
                    tracing::warn!(error = %e, "channel driver write failed");
                    failure = Some(e);
                }
            }
            Command::Flush(ack) => {
                let result = finish(&mut writer, failure.take(), false).await;
                let _ = ack.send(result);
            }
            Command::Close(ack) => {
                rx.close();
                let result = finish(&mut writer, failure.take(), true).await;
                let _ = ack.send(result);
                break;
            }
        }
    }

    tracing::trace!("channel driver writer task stopped");
    writer
}

async fn finish<W>(writer: &mut W, failure: Option<std::io::Error>, shutdown: bool) -> Result<(), LogError>
where
    W: AsyncWrite + Unpin,
{
    if let Some(e) = failure {
        return Err(e.into());
    }
    writer.flush().await?;
    if shutdown {
        writer.shutdown().await?;
    }
    Ok(())
}
