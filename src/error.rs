//! Error types for the Quarry library.
//!
//! The core compilers never construct errors of their own: malformed query
//! text and unevaluatable criteria are absorbed by the tokenizer and the
//! fail-open/fail-closed rules. [`QuarryError`] exists for the pieces that
//! *can* fail — provider implementations and provider-author helpers such as
//! [`PrefixSet`](crate::query::PrefixSet) — and is propagated through the
//! compilers unchanged.

use anyhow;
use thiserror::Error;

/// The main error type for Quarry operations.
#[derive(Error, Debug)]
pub enum QuarryError {
    /// Query-related errors (invalid provider configuration, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Errors raised by a provider while filtering or ranking.
    #[error("Provider error: {0}")]
    Provider(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with QuarryError.
pub type Result<T> = std::result::Result<T, QuarryError>;

impl QuarryError {
    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        QuarryError::Query(msg.into())
    }

    /// Create a new provider error.
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        QuarryError::Provider(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        QuarryError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = QuarryError::query("Test query error");
        assert_eq!(error.to_string(), "Query error: Test query error");

        let error = QuarryError::provider("Test provider error");
        assert_eq!(error.to_string(), "Provider error: Test provider error");

        let error = QuarryError::other("Test other error");
        assert_eq!(error.to_string(), "Error: Test other error");
    }

    #[test]
    fn test_anyhow_error_conversion() {
        let source = anyhow::anyhow!("backend unavailable");
        let error = QuarryError::from(source);

        match error {
            QuarryError::Anyhow(_) => {}
            _ => panic!("Expected anyhow error variant"),
        }
    }
}
