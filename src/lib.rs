// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Fragmental engine core.
//!
//! The engine's logging subsystem: severity-tagged messages are formatted on
//! the calling thread, queued in a fixed-size ring and written out by one
//! background drain thread, so a slow terminal never stalls the game loop.
//!
//! ```ignore
//! use frag::{log_info, LoggingConfig};
//! use frag::logging::Logger;
//!
//! let logger = Logger::new(&LoggingConfig::default())?;
//! log_info!(logger, "window opened at {}x{}", 800, 600);
//! logger.shutdown();
//! ```

pub mod config;
pub mod logging;

pub use config::{ConfigError, LoggingConfig, Output};
pub use logging::{Logger, LoggingError, Severity};
