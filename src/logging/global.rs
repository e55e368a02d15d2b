// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Process-wide logger.
//!
//! Most code should own a `Logger` at the application root and pass it
//! down. This module is for call sites that cannot be handed one: it holds
//! a single logger for the whole process and registers it with the `log`
//! facade.
//!
//! Statics are never dropped, so call [`shutdown`] before the process exits
//! to flush buffered messages.

use super::{Logger, LoggingError, Severity};
use crate::config::LoggingConfig;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger
///
/// Fails with `AlreadyInitialized` if one is installed already, including
/// one created implicitly by [`logger`].
pub fn init(config: &LoggingConfig) -> Result<&'static Logger, LoggingError> {
    if GLOBAL.get().is_some() {
        return Err(LoggingError::AlreadyInitialized);
    }

    let logger = Logger::new(config)?;
    if GLOBAL.set(logger).is_err() {
        // Lost a race with another init; the loser is dropped and shut down
        return Err(LoggingError::AlreadyInitialized);
    }

    let logger = GLOBAL.get().ok_or(LoggingError::AlreadyInitialized)?;
    install_facade(logger);
    Ok(logger)
}

/// The process-wide logger, created with default settings on first use
pub fn logger() -> &'static Logger {
    let mut created = false;
    let logger = GLOBAL.get_or_init(|| {
        created = true;
        // std::thread::spawn would panic on this failure as well
        Logger::new(&LoggingConfig::default())
            .unwrap_or_else(|e| panic!("frag logger: cannot start default logger: {}", e))
    });
    if created {
        install_facade(logger);
    }
    logger
}

/// Whether a process-wide logger exists
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Change the process-wide logger's minimum level
///
/// Also moves the `log` facade's max level, so `log::debug!` and friends
/// are skipped before their arguments are formatted. Calling
/// `logger().set_min_level` directly leaves the facade filter behind.
pub fn set_min_level(level: Severity) {
    let logger = logger();
    logger.set_min_level(level);
    if facade_installed(logger) {
        log::set_max_level(level.to_level_filter());
    }
}

/// Flush and stop the process-wide logger, if there is one
pub fn shutdown() {
    if let Some(logger) = GLOBAL.get() {
        logger.shutdown();
    }
}

fn install_facade(logger: &'static Logger) {
    // Another `log` backend may already be registered; keep it
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.min_level().to_level_filter());
    }
}

fn facade_installed(logger: &'static Logger) -> bool {
    std::ptr::eq(
        log::logger() as *const dyn log::Log as *const (),
        logger as *const Logger as *const (),
    )
}
