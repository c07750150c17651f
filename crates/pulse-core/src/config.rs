//! Configuration loading and typed config structures for the pulse daemon.
//!
//! The optional configuration file is `pulse-config.yaml` in the working
//! directory. This module defines the strongly-typed [`RunConfig`] that
//! mirrors the YAML structure, and applies the two environment overrides
//! (`LOG_MESSAGE`, `ITERATIONS`) on top of whatever the file provides.
//!
//! Resolution order, lowest precedence first: built-in defaults, config
//! file values, environment variables. A malformed `ITERATIONS` value is
//! silently discarded in favor of the underlying value.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Resolved run configuration.
///
/// Mirrors the structure of `pulse-config.yaml`. All fields have defaults
/// matching the daemon's documented behavior, so an absent file resolves
/// to a valid configuration. Immutable once resolution completes; the run
/// loop receives it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Message appended to every log line.
    #[serde(default = "default_message")]
    pub message: String,

    /// Number of loop iterations to run. Non-positive values mean the
    /// loop body executes zero times.
    #[serde(default = "default_iterations")]
    pub iterations: i64,

    /// Path of the append-mode log file.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// Real-time milliseconds to pause after each iteration.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            message: default_message(),
            iterations: default_iterations(),
            log_path: default_log_path(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file at the given path, then apply
    /// the environment overrides described in
    /// [`apply_env_overrides`](Self::apply_env_overrides).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Override the message and iteration bound from environment
    /// variables when set.
    ///
    /// `LOG_MESSAGE` replaces the message verbatim. `ITERATIONS` replaces
    /// the iteration bound only when it parses as an integer; a malformed
    /// value leaves the current bound in place, surfacing no error.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("LOG_MESSAGE").ok().as_deref(),
            std::env::var("ITERATIONS").ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, message: Option<&str>, iterations: Option<&str>) {
        if let Some(val) = message {
            self.message = val.to_owned();
        }
        if let Some(val) = iterations {
            if let Ok(parsed) = val.parse::<i64>() {
                self.iterations = parsed;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_message() -> String {
    "Default log message".to_owned()
}

const fn default_iterations() -> i64 {
    10
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/app/app.log")
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}
