// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Logger configuration file types and parsing.
//!
//! JSON5 configuration format supporting:
//! - Ring capacity and minimum severity
//! - Color policy
//! - Output selection (stdout, stderr or an append-mode file)
//! - Comments and trailing commas

use crate::logging::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of ring slots
pub const DEFAULT_CAPACITY: usize = 100;

/// Upper bound on ring slots, keeps a typo from allocating gigabytes
pub const MAX_CAPACITY: usize = 1 << 20;

/// Logger configuration (JSON5 file format)
///
/// Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Number of ring slots, fixed for the logger's lifetime
    pub capacity: usize,

    /// Messages below this severity are dropped before formatting
    pub min_level: Severity,

    /// Emit ANSI color codes
    pub color: bool,

    /// Color the whole line instead of only the level tag
    pub color_whole_message: bool,

    /// Where the drain thread writes
    pub output: Output,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_level: Severity::Info,
            color: true,
            color_whole_message: false,
            output: Output::Stdout,
        }
    }
}

/// Output destination
///
/// In JSON5: `"stdout"`, `"stderr"` or `{ file: "path/to/engine.log" }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LoggingConfig {
    /// Load configuration from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to JSON5 string (with pretty formatting)
    pub fn to_json5(&self) -> String {
        // json5 has no pretty printer; JSON output is valid JSON5
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5();
        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }

        if let Output::File(path) = &self.output {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyOutputPath);
            }
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    IoError(PathBuf, String),
    ParseError(String),
    InvalidCapacity { capacity: usize, max: usize },
    EmptyOutputPath,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(
                    f,
                    "failed to read config file '{}': {}",
                    path.display(),
                    msg
                )
            }
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::InvalidCapacity { capacity, max } => {
                write!(f, "invalid capacity {} (must be 1..={})", capacity, max)
            }
            ConfigError::EmptyOutputPath => write!(f, "output file path is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
