//! Configuration for the `logsynth` binary.
//!
//! Settings come from environment variables; the chosen format's options are passed
//! through as a JSON object and validated by the format itself at construction.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::generator::GeneratorConfig;

/// Format used when `LOGSYNTH_FORMAT` is unset
const DEFAULT_FORMAT: &str = "fortinet:firewall";

/// Default delay between generated lines in milliseconds
const DEFAULT_INTERVAL_MS: u64 = 50;

/// Minimum delay between lines
const MIN_INTERVAL_MS: u64 = 1;

/// Maximum delay between lines
const MAX_INTERVAL_MS: u64 = 60_000;

const FORMAT_VAR: &str = "LOGSYNTH_FORMAT";
const OPTIONS_VAR: &str = "LOGSYNTH_OPTIONS";
const INTERVAL_VAR: &str = "LOGSYNTH_INTERVAL_MS";
const COUNT_VAR: &str = "LOGSYNTH_COUNT";

/// Configuration for the generator binary.
///
/// - `LOGSYNTH_FORMAT`: registry identifier (default: fortinet:firewall)
/// - `LOGSYNTH_OPTIONS`: JSON object of format options (default: none)
/// - `LOGSYNTH_INTERVAL_MS`: milliseconds between lines (default: 50)
/// - `LOGSYNTH_COUNT`: stop after this many lines (default: run until interrupted)
#[derive(Debug, Clone)]
pub struct Config {
    /// Format to build and its options
    pub generator: GeneratorConfig,

    /// Delay between consecutive lines
    pub interval: Duration,

    /// Number of lines to write before exiting
    pub count: Option<u64>,
}

/// A configuration value that could not be used.
#[derive(Debug, Error)]
#[error("Configuration error for {env_var}: {message}")]
pub struct ConfigError {
    pub message: String,
    pub env_var: &'static str,
}

impl ConfigError {
    fn new(env_var: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            env_var,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `LOGSYNTH_FORMAT` is set but blank
    /// - `LOGSYNTH_OPTIONS` is not a JSON object
    /// - `LOGSYNTH_INTERVAL_MS` is not a number or is out of bounds
    /// - `LOGSYNTH_COUNT` is not a positive number
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup(FORMAT_VAR) {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::new(FORMAT_VAR, "format must not be empty"));
            }
            Some(value) => value.trim().to_string(),
            None => DEFAULT_FORMAT.to_string(),
        };

        let options = match lookup(OPTIONS_VAR) {
            Some(value) => Self::parse_options(&value)?,
            None => serde_json::Value::Null,
        };

        let interval = Duration::from_millis(Self::parse_interval(lookup(INTERVAL_VAR))?);
        let count = Self::parse_count(lookup(COUNT_VAR))?;

        Ok(Self {
            generator: GeneratorConfig::new(format).with_options(options),
            interval,
            count,
        })
    }

    fn parse_options(value: &str) -> Result<serde_json::Value, ConfigError> {
        let options: serde_json::Value = serde_json::from_str(value)
            .map_err(|e| ConfigError::new(OPTIONS_VAR, format!("invalid JSON: {e}")))?;

        if !options.is_object() {
            return Err(ConfigError::new(OPTIONS_VAR, "options must be a JSON object"));
        }
        Ok(options)
    }

    fn parse_interval(value: Option<String>) -> Result<u64, ConfigError> {
        let Some(value) = value else {
            return Ok(DEFAULT_INTERVAL_MS);
        };

        let interval: u64 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::new(INTERVAL_VAR, format!("'{}' is not a valid number", value)))?;

        if interval < MIN_INTERVAL_MS {
            return Err(ConfigError::new(
                INTERVAL_VAR,
                format!("interval {} is below minimum ({}ms)", interval, MIN_INTERVAL_MS),
            ));
        }

        if interval > MAX_INTERVAL_MS {
            return Err(ConfigError::new(
                INTERVAL_VAR,
                format!("interval {} exceeds maximum ({}ms)", interval, MAX_INTERVAL_MS),
            ));
        }

        Ok(interval)
    }

    fn parse_count(value: Option<String>) -> Result<Option<u64>, ConfigError> {
        let Some(value) = value else {
            return Ok(None);
        };

        let count: u64 = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::new(COUNT_VAR, format!("'{}' is not a valid number", value)))?;

        if count == 0 {
            return Err(ConfigError::new(COUNT_VAR, "count must be greater than 0"));
        }
        Ok(Some(count))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::new(DEFAULT_FORMAT),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            count: None,
        }
    }
}
