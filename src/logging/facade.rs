// SPDX-License-Identifier: Apache-2.0 OR MIT
// Bridge from the `log` crate facade into the engine logger

use super::{Logger, Severity};

/// Lets libraries that use `log::info!` and friends write through the
/// engine logger. Records render exactly like native calls.
impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.is_enabled(Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        Logger::log(self, Severity::from(record.level()), *record.args());
    }

    // The drain thread owns the sink and flushes after every batch
    fn flush(&self) {}
}
