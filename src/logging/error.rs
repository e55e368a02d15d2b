// SPDX-License-Identifier: Apache-2.0 OR MIT
// Errors raised while setting up a logger

use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Logger construction and installation errors
///
/// Logging calls themselves never fail; these only come out of
/// `Logger::new`, `Logger::with_sink` and `global::init`.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a process-wide logger is already installed")]
    AlreadyInitialized,

    #[error("invalid logging configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open log file '{}': {source}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn the log drain thread: {0}")]
    Spawn(#[source] io::Error),
}
