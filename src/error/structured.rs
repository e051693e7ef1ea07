//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging (offending path, parser diagnostic)

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used by CI wrappers.
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Input Errors (exit code 2) ===
    /// Result file is not well-formed XML
    XmlParseError,
    /// Result file has no recognizable root element
    UnrecognizedStructure,
    /// Input path does not exist
    InputNotFound,
    /// No XML inputs were found
    NoInputs,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,
    /// Config parse error
    ConfigParseError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::XmlParseError => "XML_PARSE_ERROR",
            Self::UnrecognizedStructure => "UNRECOGNIZED_STRUCTURE",
            Self::InputNotFound => "INPUT_NOT_FOUND",
            Self::NoInputs => "NO_INPUTS",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ConfigParseError => "CONFIG_PARSE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Missing inputs are retryable: CI jobs often run the reporter before
    /// all artifacts have been copied.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::InputNotFound | Self::NoInputs | Self::IoError)
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Input errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::XmlParseError | Self::UnrecognizedStructure | Self::InputNotFound | Self::NoInputs => 2,
            Self::ConfigError | Self::ConfigParseError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `ReportError`.
    #[must_use]
    pub fn from_error(err: &ReportError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);

        Self {
            code,
            message: err.to_string(),
            hint: err.suggestion().map(str::to_string),
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Format as JSON for machine consumption.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &ReportError) -> (ErrorCode, Option<Value>) {
        match err {
            ReportError::Parse { path, message } => (
                ErrorCode::XmlParseError,
                Some(json!({"path": path.display().to_string(), "diagnostic": message})),
            ),
            ReportError::Structure { path } => (
                ErrorCode::UnrecognizedStructure,
                Some(json!({"path": path.display().to_string()})),
            ),
            ReportError::InputNotFound { path } => (
                ErrorCode::InputNotFound,
                Some(json!({"path": path.display().to_string()})),
            ),
            ReportError::NoInputs { inputs } => {
                (ErrorCode::NoInputs, Some(json!({"inputs": inputs})))
            }
            ReportError::Config(_) => (ErrorCode::ConfigError, None),
            ReportError::Yaml(_) => (ErrorCode::ConfigParseError, None),
            ReportError::Io(_) => (ErrorCode::IoError, None),
            ReportError::Json(_) => (ErrorCode::JsonError, None),
            ReportError::WithContext { context, source } => {
                let code = source
                    .downcast_ref::<ReportError>()
                    .map_or(ErrorCode::IoError, |inner| {
                        Self::extract_code_and_context(inner).0
                    });
                (code, Some(json!({"context": context})))
            }
            ReportError::Other(_) => (ErrorCode::InternalError, None),
        }
    }
}
