//! Bounded-queue logger with a single drain worker.
//!
//! Producers build a [`LogEntry`] and push it into a fixed-capacity
//! `tokio::sync::mpsc` channel. One worker owns the receiver and the sink,
//! so the sink is never written concurrently. Sink writes are blocking, so
//! the worker lives on the blocking pool and a slow sink only stalls the
//! log pipeline, never the async workers.
//!
//! Worker states:
//!
//! ```text
//! Running  --(shutdown token cancelled)-->  Draining  --(queue empty)-->  Terminated
//! ```
//!
//! Draining closes the receiver first, which makes every later `send` fail
//! immediately, then hands out whatever is still buffered.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, LoggingConfig};
use crate::logger::encode::encode_line;
use crate::logger::entry::{Attr, LogEntry};
use crate::logger::sink::Sink;
use crate::logger::Level;
use crate::observability::metrics;

/// Asynchronous JSON logger.
///
/// Construct once, [`start`](AsyncLogger::start) once, share behind an `Arc`,
/// and [`close`](AsyncLogger::close) at shutdown. Emission never fails and
/// never blocks past the caller's cancellation token.
pub struct AsyncLogger {
    level: Level,
    capacity: NonZeroUsize,
    /// Producer side. Sends fail once the worker has closed the receiver
    /// or the never-started receiver was dropped.
    tx: mpsc::Sender<LogEntry>,
    /// Receiver and sink waiting for `start`.
    pending: Mutex<Option<(mpsc::Receiver<LogEntry>, Sink)>>,
    worker: Mutex<Option<WorkerHandle>>,
}

struct WorkerHandle {
    handle: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl AsyncLogger {
    /// Create a logger writing to `sink`. The worker is not running until
    /// [`start`](AsyncLogger::start) is called.
    pub fn new(sink: Sink, level: Level, capacity: NonZeroUsize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.get());
        Self {
            level,
            capacity,
            tx,
            pending: Mutex::new(Some((rx, sink))),
            worker: Mutex::new(None),
        }
    }

    /// Create a logger from resolved configuration.
    pub fn from_config(config: &LoggingConfig, sink: Sink) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(config.buffer_size)
            .ok_or_else(|| ConfigError::InvalidBufferSize(config.buffer_size.to_string()))?;
        Ok(Self::new(sink, config.level, capacity))
    }

    /// Spawn the drain worker. Must be called from within a Tokio runtime.
    ///
    /// Cancelling `lifetime` moves the worker into its draining state, same as
    /// [`close`](AsyncLogger::close). Calls after the first are ignored.
    pub fn start(&self, lifetime: &CancellationToken) {
        let Some((rx, sink)) = lock(&self.pending).take() else {
            tracing::warn!("Async logger already started or closed, ignoring start");
            return;
        };

        let shutdown = lifetime.child_token();
        let worker = DrainWorker {
            rx,
            sink,
            level: self.level,
        };
        let runtime = Handle::current();
        let worker_shutdown = shutdown.clone();
        let handle =
            tokio::task::spawn_blocking(move || runtime.block_on(worker.run(worker_shutdown)));

        tracing::debug!(
            level = %self.level,
            capacity = self.capacity.get(),
            "Async logger started"
        );

        *lock(&self.worker) = Some(WorkerHandle { handle, shutdown });
    }

    pub async fn debug(&self, ctx: &CancellationToken, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(ctx, Level::Debug, message, attrs).await;
    }

    pub async fn info(&self, ctx: &CancellationToken, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(ctx, Level::Info, message, attrs).await;
    }

    pub async fn warn(&self, ctx: &CancellationToken, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(ctx, Level::Warn, message, attrs).await;
    }

    pub async fn error(&self, ctx: &CancellationToken, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(ctx, Level::Error, message, attrs).await;
    }

    /// Filter, stamp and enqueue one entry.
    ///
    /// Waits for queue space when the queue is full, unless `ctx` is
    /// cancelled first. An already cancelled `ctx` never enqueues.
    pub async fn log(
        &self,
        ctx: &CancellationToken,
        level: Level,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) {
        if level < self.level {
            return;
        }
        if ctx.is_cancelled() {
            metrics::record_log_dropped("cancelled");
            return;
        }

        let entry = LogEntry::new(level, message, attrs);

        tokio::select! {
            biased;
            _ = ctx.cancelled() => metrics::record_log_dropped("cancelled"),
            sent = self.tx.send(entry) => {
                if sent.is_err() {
                    metrics::record_log_dropped("closed");
                }
            }
        }
    }

    /// Stop accepting entries, wait for the worker to write everything that
    /// was already queued, then return.
    ///
    /// A second call returns immediately. Entries still queued on a logger
    /// that was never started are discarded.
    pub async fn close(&self) {
        let never_started = lock(&self.pending).take();
        drop(never_started);

        let worker = lock(&self.worker).take();
        let Some(worker) = worker else {
            return;
        };

        worker.shutdown.cancel();
        if let Err(e) = worker.handle.await {
            tracing::error!(error = %e, "Log drain worker terminated abnormally");
        }
    }
}

struct DrainWorker {
    rx: mpsc::Receiver<LogEntry>,
    sink: Sink,
    level: Level,
}

impl DrainWorker {
    async fn run(mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(entry) => self.write(&entry),
                    None => break,
                },
                _ = shutdown.cancelled() => {
                    self.drain().await;
                    break;
                }
            }
        }

        let _ = self.sink.flush();
        tracing::debug!("Log drain worker stopped");
    }

    /// Close the queue and write what remains.
    ///
    /// After `close`, `recv` yields the buffered entries and then `None` as
    /// soon as no send is mid-flight, so this never waits on producers.
    async fn drain(&mut self) {
        self.rx.close();
        while let Some(entry) = self.rx.recv().await {
            self.write(&entry);
        }
    }

    fn write(&mut self, entry: &LogEntry) {
        if entry.level < self.level {
            return;
        }

        let line = match encode_line(entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping log entry that failed to encode");
                metrics::record_log_dropped("encode");
                return;
            }
        };

        if self.sink.write_all(&line).is_err() {
            metrics::record_log_dropped("write");
            return;
        }
        metrics::record_log_written();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
