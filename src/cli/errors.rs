//! CLI-specific error types
//!
//! Config and I/O errors abort the command. Invalid query lines are
//! reported in-band and processing continues.

use std::fmt;
use std::io;

use crate::shape::ValueError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// A query line is not valid JSON or not a valid query value
    InvalidQuery,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SHAPE_CLI_CONFIG_ERROR",
            Self::IoError => "SHAPE_CLI_IO_ERROR",
            Self::InvalidQuery => "SHAPE_CLI_INVALID_QUERY",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Invalid query input
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidQuery, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ValueError> for CliError {
    fn from(e: ValueError) -> Self {
        Self::invalid_query(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("bad");
        assert_eq!(err.to_string(), "SHAPE_CLI_CONFIG_ERROR: bad");
    }

    #[test]
    fn test_value_error_is_invalid_query() {
        let err: CliError = ValueError::malformed("$symbol", "expected a string").into();
        assert_eq!(err.code(), &CliErrorCode::InvalidQuery);
        assert_eq!(err.code_str(), "SHAPE_CLI_INVALID_QUERY");
    }
}
