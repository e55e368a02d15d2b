// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logger engine: filtering, formatting, drain thread lifecycle

use super::drain::{Drain, DrainCounters};
use super::format::{format_line, Style};
use super::ringbuffer::RingBuffer;
use super::sink::{FileSink, LogSink, StderrSink, StdoutSink};
use super::{LoggingError, Severity};
use crate::config::{LoggingConfig, Output};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Snapshot of the logger's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggerStats {
    /// Messages accepted into the ring
    pub logged: u64,
    /// Lines successfully handed to the sink
    pub written: u64,
    /// Sink write/flush failures
    pub write_errors: u64,
    /// Times a producer had to wait for a free slot
    pub backpressure_waits: u64,
    /// Messages discarded because the logger was already shut down
    pub rejected: u64,
}

/// Asynchronous ring-buffer logger
///
/// Callers format and enqueue; a dedicated drain thread writes to the sink.
/// Construction starts the drain thread, `shutdown` (or drop) stops it and
/// writes out everything that was enqueued before the shutdown began.
///
/// Share it by reference or `Arc`; all methods take `&self`.
pub struct Logger {
    ring: Arc<RingBuffer>,
    start: Instant,
    min_level: AtomicU8,
    /// `Style` packed into one word so a line never mixes two policies
    style: AtomicU8,
    logged: AtomicU64,
    rejected: AtomicU64,
    counters: Arc<DrainCounters>,
    drain_running: Arc<AtomicBool>,
    drain_handle: Mutex<Option<JoinHandle<Drain>>>,
}

impl Logger {
    /// Create a logger writing to the output named in `config`
    pub fn new(config: &LoggingConfig) -> Result<Self, LoggingError> {
        config.validate()?;
        let sink: Box<dyn LogSink> = match &config.output {
            Output::Stdout => Box::new(StdoutSink::new()),
            Output::Stderr => Box::new(StderrSink::new()),
            Output::File(path) => {
                Box::new(FileSink::open(path).map_err(|source| LoggingError::Sink {
                    path: path.clone(),
                    source,
                })?)
            }
        };
        Self::with_sink(config, sink)
    }

    /// Create a logger writing to a caller-provided sink
    ///
    /// `config.output` is ignored.
    pub fn with_sink(
        config: &LoggingConfig,
        sink: Box<dyn LogSink>,
    ) -> Result<Self, LoggingError> {
        config.validate()?;

        let (ring, cursor) = RingBuffer::new(config.capacity);
        let ring = Arc::new(ring);

        let drain = Drain::new(Arc::clone(&ring), cursor, sink);
        let drain_running = drain.running_handle();
        let counters = drain.counters();
        let drain_handle = thread::Builder::new()
            .name("frag-log-drain".to_string())
            .spawn(move || drain.run())
            .map_err(LoggingError::Spawn)?;

        let style = Style {
            color: config.color,
            color_whole_message: config.color_whole_message,
        };

        Ok(Self {
            ring,
            start: Instant::now(),
            min_level: AtomicU8::new(config.min_level.as_u8()),
            style: AtomicU8::new(style.to_bits()),
            logged: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            counters,
            drain_running,
            drain_handle: Mutex::new(Some(drain_handle)),
        })
    }

    /// Check if a message at `level` would pass the minimum-level filter
    #[inline]
    pub fn is_enabled(&self, level: Severity) -> bool {
        level.as_u8() >= self.min_level.load(Ordering::Relaxed)
    }

    /// Format and enqueue a message
    ///
    /// Returns immediately if `level` is filtered. Blocks only when the ring
    /// is full and the drain thread has not freed the next slot yet.
    pub fn log(&self, level: Severity, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }

        let line = format_line(level, self.start.elapsed(), args, self.style());

        if self.ring.push(level, line) {
            self.logged.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Log with trace severity
    #[inline]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Trace, args);
    }

    /// Log with debug severity
    #[inline]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, args);
    }

    /// Log with info severity
    #[inline]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    /// Log with warning severity
    #[inline]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warn, args);
    }

    /// Log with error severity
    #[inline]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }

    /// Log with fatal severity
    #[inline]
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Fatal, args);
    }

    /// Set the minimum severity that reaches the sink
    pub fn set_min_level(&self, level: Severity) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Get the minimum severity that reaches the sink
    pub fn min_level(&self) -> Severity {
        Severity::from_u8(self.min_level.load(Ordering::Relaxed)).unwrap_or(Severity::Info)
    }

    /// Turn ANSI colors on or off
    pub fn set_color_enabled(&self, enabled: bool) {
        self.update_style(|style| style.color = enabled);
    }

    /// Color the whole line (true) or only the level tag (false)
    pub fn set_color_whole_message(&self, enabled: bool) {
        self.update_style(|style| style.color_whole_message = enabled);
    }

    pub fn color_enabled(&self) -> bool {
        self.style().color
    }

    pub fn color_whole_message(&self) -> bool {
        self.style().color_whole_message
    }

    /// Current color policy
    pub fn style(&self) -> Style {
        Style::from_bits(self.style.load(Ordering::Acquire))
    }

    fn update_style(&self, change: impl Fn(&mut Style)) {
        let _ = self
            .style
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                let mut style = Style::from_bits(bits);
                change(&mut style);
                Some(style.to_bits())
            });
    }

    /// Number of ring slots
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Messages accepted so far
    pub fn total_logged(&self) -> u64 {
        self.logged.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters
    pub fn stats(&self) -> LoggerStats {
        LoggerStats {
            logged: self.logged.load(Ordering::Relaxed),
            written: self.counters.written.load(Ordering::Relaxed),
            write_errors: self.counters.write_errors.load(Ordering::Relaxed),
            backpressure_waits: self.ring.backpressure_waits(),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    /// Whether the drain thread is still running
    pub fn is_running(&self) -> bool {
        self.drain_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Stop the drain thread and write out everything still buffered
    ///
    /// Idempotent. Concurrent callers wait until the first one finished
    /// flushing. Messages logged after this returns are discarded.
    pub fn shutdown(&self) {
        let mut handle = self
            .drain_handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(drain) = handle.take() else {
            return;
        };

        // Closing under the write lock fences off in-flight producers: each
        // one either published before this point or will see the ring closed.
        self.ring.close();
        self.drain_running.store(false, Ordering::Release);

        match drain.join() {
            Ok(mut drain) => {
                drain.drain_available();
            }
            Err(_) => {
                eprintln!(
                    "frag logger: drain thread panicked, {} buffered messages lost",
                    self.ring.len()
                );
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}
