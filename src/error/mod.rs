//! Error types and handling for `gtest_report`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Per-file parse failures are typed (`Parse`, `Structure`) so callers can
//!   isolate a failing report category and keep going
//! - Attribute-level anomalies are never errors; see [`crate::util::lenient`]
//! - Provides recovery hints and exit codes through [`StructuredError`]

mod context;
mod structured;

pub use context::ResultExt;
pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `gtest_report` operations.
#[derive(Error, Debug)]
pub enum ReportError {
    // === Input Errors ===
    /// Input is not well-formed XML.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Well-formed XML without a `<testsuites>` or `<testsuite>` element.
    #[error("No <testsuites> or <testsuite> in {path}")]
    Structure { path: PathBuf },

    /// An input path given on the command line does not exist.
    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// No XML files were found for the given inputs.
    #[error("No XML files found for inputs: {inputs}")]
    NoInputs { inputs: String },

    // === Configuration Errors ===
    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === Wrapped errors ===
    /// Error with additional context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// Create a parse error for `path` from any displayable diagnostic.
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Is this a per-file input error (bad XML or unrecognized shape)?
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Structure { .. })
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Parse { .. } => Some("Check that the file is a complete XML document"),
            Self::Structure { .. } => {
                Some("Expected a Google Test result file with <testsuites> or <testsuite>")
            }
            Self::InputNotFound { .. } => Some("Check the path or glob expansion"),
            Self::NoInputs { .. } => Some("Pass .xml files or directories containing them"),
            Self::Config(_) | Self::Yaml(_) => Some("Check the configuration file syntax"),
            _ => None,
        }
    }
}

/// Result type using `ReportError`.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::Structure {
            path: PathBuf::from("in/UT/empty.xml"),
        };
        assert_eq!(
            err.to_string(),
            "No <testsuites> or <testsuite> in in/UT/empty.xml"
        );

        let err = ReportError::parse("a.xml", "unexpected end of input");
        assert_eq!(
            err.to_string(),
            "Failed to parse a.xml: unexpected end of input"
        );
    }

    #[test]
    fn test_input_error_classification() {
        assert!(ReportError::parse("a.xml", "x").is_input_error());
        assert!(ReportError::Structure { path: "b.xml".into() }.is_input_error());
        assert!(!ReportError::Config("bad".into()).is_input_error());
    }

    #[test]
    fn test_suggestion() {
        let err = ReportError::NoInputs {
            inputs: "out/*.xml".to_string(),
        };
        assert_eq!(
            err.suggestion(),
            Some("Pass .xml files or directories containing them")
        );
        let err = ReportError::Io(std::io::Error::other("boom"));
        assert_eq!(err.suggestion(), None);
    }
}
