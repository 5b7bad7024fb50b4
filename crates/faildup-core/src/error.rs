//! Structured error types for the library façade.
//!
//! Every failure carries a stable snake_case code so callers can branch on
//! the category without parsing messages, and errors convert to JSON for
//! machine consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for faildup operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input path does not exist or is not accessible.
    PathNotFound,
    /// Input path exists but is not a directory.
    InvalidPath,
    /// Invalid settings/arguments.
    InvalidSettings,
    /// A test report could not be used.
    ReportError,
    /// I/O error during operation.
    IoError,
    /// Internal error (unexpected state).
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::PathNotFound => write!(f, "path_not_found"),
            ErrorCode::InvalidPath => write!(f, "invalid_path"),
            ErrorCode::InvalidSettings => write!(f, "invalid_settings"),
            ErrorCode::ReportError => write!(f, "report_error"),
            ErrorCode::IoError => write!(f, "io_error"),
            ErrorCode::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error with a code, a message, and optional details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaildupError {
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FaildupError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an error with additional details.
    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn path_not_found(path: &str) -> Self {
        Self::new(ErrorCode::PathNotFound, format!("Path not found: {}", path))
    }

    pub fn not_a_directory(path: &str) -> Self {
        Self::new(ErrorCode::InvalidPath, format!("Not a directory: {}", path))
    }

    pub fn invalid_settings(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidSettings,
            format!("Invalid settings: {}", err),
        )
    }

    pub fn report_error(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ReportError, format!("Report error: {}", err))
    }

    pub fn io_error(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::IoError, format!("I/O error: {}", err))
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {}", err))
    }

    /// True for failures caused by the filesystem rather than the input data.
    pub fn is_io(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::PathNotFound | ErrorCode::InvalidPath | ErrorCode::IoError
        )
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","message":"{}"}}"#,
                self.code, self.message
            )
        })
    }
}

impl fmt::Display for FaildupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "[{}] {}: {}", self.code, self.message, details)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for FaildupError {}

impl From<anyhow::Error> for FaildupError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{err:#}"))
    }
}

impl From<std::io::Error> for FaildupError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err)
    }
}
