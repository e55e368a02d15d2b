// SPDX-License-Identifier: Apache-2.0 OR MIT
// Asynchronous ring-buffer logging for the engine
//
// Producers format on their own thread and publish into a fixed-size ring;
// one drain thread writes the ring out in slot order.

mod backoff;
mod drain;
mod error;
mod facade;
mod format;
pub mod global;
mod logger;
#[macro_use]
mod macros;
mod ringbuffer;
mod severity;
mod sink;

// Public exports
pub use error::LoggingError;
pub use format::{format_line, Style, RESET};
pub use logger::{Logger, LoggerStats};
pub use ringbuffer::{Producer, ReadCursor, RingBuffer, SlotHandle};
pub use severity::{ParseSeverityError, Severity};
pub use sink::{FileSink, LogSink, StderrSink, StdoutSink, WriterSink};
