// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logging macros for convenient logging

/// Log a message with trace severity
///
/// # Examples
/// ```ignore
/// log_trace!(logger, "entering frame {}", frame);
/// ```
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(format_args!($($arg)+))
    };
}

/// Log a message with debug severity
///
/// # Examples
/// ```ignore
/// log_debug!(logger, "package '{}' has {} assets", name, count);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format_args!($($arg)+))
    };
}

/// Log a message with info severity
///
/// # Examples
/// ```ignore
/// log_info!(logger, "window opened at {}x{}", width, height);
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format_args!($($arg)+))
    };
}

/// Log a message with warning severity
///
/// # Examples
/// ```ignore
/// log_warn!(logger, "frame took {} ms", ms);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format_args!($($arg)+))
    };
}

/// Log a message with error severity
///
/// # Examples
/// ```ignore
/// log_error!(logger, "failed to load '{}': {}", path, err);
/// ```
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format_args!($($arg)+))
    };
}

/// Log a message with fatal severity
///
/// # Examples
/// ```ignore
/// log_fatal!(logger, "no render backend available");
/// ```
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format_args!($($arg)+))
    };
}

/// Trace through the process-wide logger
#[macro_export]
macro_rules! frag_trace {
    ($($arg:tt)+) => {
        $crate::logging::global::logger().trace(format_args!($($arg)+))
    };
}

/// Debug through the process-wide logger
#[macro_export]
macro_rules! frag_debug {
    ($($arg:tt)+) => {
        $crate::logging::global::logger().debug(format_args!($($arg)+))
    };
}

/// Info through the process-wide logger
#[macro_export]
macro_rules! frag_info {
    ($($arg:tt)+) => {
        $crate::logging::global::logger().info(format_args!($($arg)+))
    };
}

/// Warning through the process-wide logger
#[macro_export]
macro_rules! frag_warn {
    ($($arg:tt)+) => {
        $crate::logging::global::logger().warn(format_args!($($arg)+))
    };
}

/// Error through the process-wide logger
#[macro_export]
macro_rules! frag_error {
    ($($arg:tt)+) => {
        $crate::logging::global::logger().error(format_args!($($arg)+))
    };
}

/// Fatal through the process-wide logger
#[macro_export]
macro_rules! frag_fatal {
    ($($arg:tt)+) => {
        $crate::logging::global::logger().fatal(format_args!($($arg)+))
    };
}
