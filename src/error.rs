//! Error types shared by every log format generator.

use thiserror::Error;

/// Errors raised while building or driving a generator.
///
/// Construction failures (`Config`, `Template`) leave no usable generator behind.
/// A `Render` failure only affects the call that produced it.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Format options were malformed, unrecognized or out of range
    #[error("invalid configuration for {format}: {message}")]
    Config {
        format: &'static str,
        message: String,
    },

    /// A template source failed to compile
    #[error("template '{name}' failed to compile: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// A compiled template could not be rendered against the current record
    #[error("template '{name}' failed to render: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// No constructor is registered under the requested identifier
    #[error("unknown log format '{0}'")]
    UnknownFormat(String),
}

impl GeneratorError {
    pub fn config(format: &'static str, message: impl Into<String>) -> Self {
        GeneratorError::Config {
            format,
            message: message.into(),
        }
    }

    /// True for errors that prevent a generator from being built at all.
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            GeneratorError::Config { .. }
                | GeneratorError::Template { .. }
                | GeneratorError::UnknownFormat(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GeneratorError::config("citrix:cef", "unknown field `colour`");
        assert_eq!(
            err.to_string(),
            "invalid configuration for citrix:cef: unknown field `colour`"
        );
        assert!(err.is_construction());
    }

    #[test]
    fn test_unknown_format_display() {
        let err = GeneratorError::UnknownFormat("acme:router".to_string());
        assert_eq!(err.to_string(), "unknown log format 'acme:router'");
    }

    #[test]
    fn test_render_error_is_not_construction() {
        let err = GeneratorError::Render {
            name: "event_user".to_string(),
            source: minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "missing"),
        };
        assert!(!err.is_construction());
        assert!(err.to_string().starts_with("template 'event_user' failed to render"));
    }
}
