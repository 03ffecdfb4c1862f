//! Generator contract and the format registry.
//!
//! A log format is a type implementing [`Generator`] plus a [`Constructor`] that builds
//! it from a JSON options tree. Formats are wired into a [`GeneratorRegistry`] once at
//! start-up (see [`crate::formats::default_registry`]); after that the registry is only
//! read, so it can be shared freely between threads.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GeneratorError;

/// A source of synthetic log lines for one vendor format.
///
/// Each call renders the current record and then redraws it, so consecutive calls
/// produce independent lines. Instances are driven by one caller at a time.
pub trait Generator: Send {
    /// Identifier the format is registered under, e.g. `fortinet:firewall`.
    fn format(&self) -> &'static str;

    /// Produce one complete log line without a trailing newline.
    fn next(&mut self) -> Result<Vec<u8>, GeneratorError>;
}

/// Builds a generator from format-specific options.
pub type Constructor = fn(&serde_json::Value) -> Result<Box<dyn Generator>, GeneratorError>;

/// Which format to build and the options to build it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Registry identifier
    pub format: String,

    /// Format-specific options, `null` for defaults
    #[serde(default)]
    pub options: serde_json::Value,
}

impl GeneratorConfig {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            options: serde_json::Value::Null,
        }
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = options;
        self
    }
}

/// Maps format identifiers to constructors.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    constructors: HashMap<String, Constructor>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing (and returning) any previous one for `id`.
    pub fn register(&mut self, id: impl Into<String>, constructor: Constructor) -> Option<Constructor> {
        let id = id.into();
        let previous = self.constructors.insert(id.clone(), constructor);
        if previous.is_some() {
            debug!(format = %id, "Replaced generator constructor");
        } else {
            debug!(format = %id, "Registered generator constructor");
        }
        previous
    }

    /// Constructor registered under `id`, if any.
    pub fn lookup(&self, id: &str) -> Option<Constructor> {
        self.constructors.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    /// Registered identifiers in sorted order.
    pub fn formats(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

/// Deserialize and validate a format's options struct.
///
/// `null` yields the defaults. Anything else must be an object the options type accepts;
/// option structs use `deny_unknown_fields`, so unrecognized keys are rejected here.
pub fn parse_options<T>(format: &'static str, options: &serde_json::Value) -> Result<T, GeneratorError>
where
    T: DeserializeOwned + Default + ValidateOptions,
{
    let parsed: T = match options {
        serde_json::Value::Null => T::default(),
        serde_json::Value::Object(_) => serde_json::from_value(options.clone())
            .map_err(|e| GeneratorError::config(format, e.to_string()))?,
        other => {
            return Err(GeneratorError::config(
                format,
                format!("options must be an object, got {other}"),
            ))
        }
    };

    parsed
        .validate()
        .map_err(|message| GeneratorError::config(format, message))?;
    Ok(parsed)
}

/// Semantic checks a format runs on its options after deserialization.
pub trait ValidateOptions {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}
