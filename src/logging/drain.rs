// SPDX-License-Identifier: Apache-2.0 OR MIT
// Drain task - empties the ring buffer into the output sink

use super::backoff::Backoff;
use super::ringbuffer::{ReadCursor, RingBuffer};
use super::sink::LogSink;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Counters updated by the drain thread, readable from anywhere
#[derive(Debug, Default)]
pub(crate) struct DrainCounters {
    pub(crate) written: AtomicU64,
    pub(crate) write_errors: AtomicU64,
}

/// Sink plus the failure policy around it
///
/// A sink that errors or panics costs that one line; the slot is freed
/// either way and the drain carries on.
struct SinkWriter {
    sink: Box<dyn LogSink>,
    counters: Arc<DrainCounters>,
    reported_failure: bool,
}

impl SinkWriter {
    fn write(&mut self, line: &str) {
        let sink = &mut self.sink;
        match panic::catch_unwind(AssertUnwindSafe(|| sink.write_line(line))) {
            Ok(Ok(())) => {
                self.counters.written.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Err(e)) => self.failed("write", &e),
            Err(_) => self.failed("write", &"sink panicked"),
        }
    }

    fn flush(&mut self) {
        let sink = &mut self.sink;
        match panic::catch_unwind(AssertUnwindSafe(|| sink.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.failed("flush", &e),
            Err(_) => self.failed("flush", &"sink panicked"),
        }
    }

    /// Count every failure, report only the first one on stderr
    fn failed(&mut self, op: &str, e: &dyn fmt::Display) {
        self.counters.write_errors.fetch_add(1, Ordering::Relaxed);
        if !self.reported_failure {
            self.reported_failure = true;
            eprintln!(
                "frag logger: sink {} failed: {} (further sink errors are counted, not reported)",
                op, e
            );
        }
    }
}

/// Single consumer of a `RingBuffer`
///
/// Owns the ring's read cursor, so there can only ever be one.
pub(crate) struct Drain {
    ring: Arc<RingBuffer>,
    cursor: ReadCursor,
    output: SinkWriter,
    running: Arc<AtomicBool>,
}

impl Drain {
    /// Create a drain for `ring`, writing to `sink`
    pub(crate) fn new(ring: Arc<RingBuffer>, cursor: ReadCursor, sink: Box<dyn LogSink>) -> Self {
        Self {
            ring,
            cursor,
            output: SinkWriter {
                sink,
                counters: Arc::new(DrainCounters::default()),
                reported_failure: false,
            },
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared `running` flag; storing false stops the drain loop
    pub(crate) fn running_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub(crate) fn counters(&self) -> Arc<DrainCounters> {
        Arc::clone(&self.output.counters)
    }

    /// Poll the ring until stopped, then hand the drain back for the final pass
    pub(crate) fn run(mut self) -> Self {
        let mut backoff = Backoff::for_drain();

        while self.running.load(Ordering::Acquire) {
            if self.drain_available() > 0 {
                backoff.reset();
            } else {
                backoff.snooze();
            }
        }

        self
    }

    /// Write out every message currently published, in slot order
    ///
    /// Returns how many messages were consumed. Flushes the sink if any were.
    pub(crate) fn drain_available(&mut self) -> usize {
        let mut count = 0;
        while self
            .ring
            .consume_next_with(&mut self.cursor, |_, line| self.output.write(line))
            .is_some()
        {
            count += 1;
        }

        if count > 0 {
            self.output.flush();
        }
        count
    }
}
