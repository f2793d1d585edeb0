//! Error types for the snake conversion pipeline.
//!
//! - [`ParseError`] - line-numbered problems found while reading a source file
//! - [`ConfigError`] - configuration file or environment problems
//! - [`ConvertError`] - top-level errors returned by [`crate::convert`] and [`crate::write`]
//!
//! Lower-level errors convert into [`ConvertError`] through `From`, so `?`
//! works across module boundaries.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::parser::ParseError;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading or checking [`crate::ConvertOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON for the options schema.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A single option has an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// A conversion that fails with any of these writes nothing: an existing
/// destination file is left untouched.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source violates the expected schema (missing column, non-numeric field, ...).
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] ParseError),

    /// Source has a header but no data rows.
    #[error("Source contains no data rows")]
    EmptyInput,

    /// Source file could not be read.
    #[error("Cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination could not be written.
    #[error("Cannot write '{}': {source}", .path.display())]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl ConvertError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoWrite {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let parse_err = ParseError::new(3, "bad coordinate").with_column("node_x");
        let convert_err: ConvertError = parse_err.into();
        let msg = convert_err.to_string();
        assert!(msg.starts_with("Malformed input"));
        assert!(msg.contains("node_x"));

        let config_err = ConfigError::invalid("delimiter", "must not be a tab");
        let convert_err: ConvertError = config_err.into();
        assert!(convert_err.to_string().contains("delimiter"));
    }

    #[test]
    fn test_write_error_names_path() {
        let err = ConvertError::write(
            "/nowhere/out.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nowhere/out.csv"));
        assert!(msg.contains("denied"));
    }
}
