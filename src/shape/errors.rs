//! Value-model error types
//!
//! Classification itself is total. These errors only arise while building a
//! `QueryValue` from external input (extended JSON wrappers such as `$date`).

use thiserror::Error;

/// Result type for value-model construction
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors raised at the value-model construction boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Malformed {wrapper} wrapper: {reason}")]
    MalformedExtended {
        wrapper: &'static str,
        reason: String,
    },
}

impl ValueError {
    /// Create a malformed extended-JSON wrapper error
    pub fn malformed(wrapper: &'static str, reason: impl Into<String>) -> Self {
        ValueError::MalformedExtended {
            wrapper,
            reason: reason.into(),
        }
    }
}
