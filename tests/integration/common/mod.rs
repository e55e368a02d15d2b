//! Shared sinks and helpers for the integration tests.

use frag::logging::{LogSink, Logger, Severity};
use frag::LoggingConfig;
use std::io;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Sink that records every line it receives
#[derive(Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for CaptureSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct GateState {
    open: bool,
    entered: usize,
}

/// Sink whose writes block until the test opens the gate
///
/// Lets a test hold the drain thread in the middle of a write, which keeps
/// that message's slot occupied.
#[derive(Clone, Default)]
pub struct GateSink {
    capture: CaptureSink,
    gate: Arc<(Mutex<GateState>, Condvar)>,
}

impl GateSink {
    pub fn lines(&self) -> Vec<String> {
        self.capture.lines()
    }

    /// Let all pending and future writes through
    pub fn open(&self) {
        let (state, cvar) = &*self.gate;
        state.lock().unwrap().open = true;
        cvar.notify_all();
    }

    /// Wait until the drain thread is blocked in `write_line`
    pub fn wait_for_writer(&self, timeout: Duration) {
        let (state, cvar) = &*self.gate;
        let guard = state.lock().unwrap();
        let (guard, result) = cvar
            .wait_timeout_while(guard, timeout, |s| s.entered == 0)
            .unwrap();
        assert!(!result.timed_out(), "drain thread never reached the sink");
        drop(guard);
    }
}

impl LogSink for GateSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        {
            let (state, cvar) = &*self.gate;
            let mut guard = state.lock().unwrap();
            guard.entered += 1;
            cvar.notify_all();
            let _guard = cvar.wait_while(guard, |s| !s.open).unwrap();
        }
        self.capture.write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Config without colors that lets every severity through
pub fn plain_config(capacity: usize) -> LoggingConfig {
    LoggingConfig {
        capacity,
        min_level: Severity::Trace,
        color: false,
        ..LoggingConfig::default()
    }
}

pub fn capture_logger(capacity: usize) -> (Logger, CaptureSink) {
    let sink = CaptureSink::default();
    let logger = Logger::with_sink(&plain_config(capacity), Box::new(sink.clone())).unwrap();
    (logger, sink)
}

pub fn gated_logger(capacity: usize) -> (Logger, GateSink) {
    let sink = GateSink::default();
    let logger = Logger::with_sink(&plain_config(capacity), Box::new(sink.clone())).unwrap();
    (logger, sink)
}

/// Message text of a rendered line: drops the timestamp and level tag
pub fn body(line: &str) -> &str {
    let rest = line.split_once(" : ").map(|(_, rest)| rest).unwrap_or(line);
    let rest = rest.split_once("] ").map(|(_, msg)| msg).unwrap_or(rest);
    rest.trim_end_matches('\n')
}

pub fn bodies(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| body(line).to_string()).collect()
}

/// Poll `cond` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    cond()
}
