// Typed errors for the data access, view and admin layers

use thiserror::Error;

/// Error taxonomy shared by the client, the view and the admin runner.
///
/// CLI glue wraps these in `anyhow::Error`; `main` downcasts to pick the
/// exit code (validation problems are user errors, the rest are internal).
#[derive(Debug, Error)]
pub enum AppError {
    /// The database could not be reached or did not answer a ping
    #[error("Connection error: {0}")]
    Connection(String),

    /// A statement failed to execute
    #[error("Query error: {0}")]
    Query(String),

    /// Network failure, non-success HTTP status, or an undecodable body
    #[error("Request error: {0}")]
    Request(String),

    /// Invalid identifier or input rejected before any I/O happens
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Whether the query layer may retry the failed operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Request(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            AppError::Request(format!("server returned {}", status))
        } else if err.is_timeout() {
            AppError::Request("request timed out".to_string())
        } else if err.is_decode() {
            AppError::Request(format!("invalid response body: {}", err))
        } else {
            AppError::Request(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_request_errors_retry() {
        assert!(AppError::Request("down".into()).is_retryable());
        assert!(!AppError::Validation("bad id".into()).is_retryable());
        assert!(!AppError::Connection("refused".into()).is_retryable());
        assert!(!AppError::Query("syntax".into()).is_retryable());
    }

    #[test]
    fn test_display_prefixes_kind() {
        let err = AppError::Validation("Invalid project ID: 'abc'".into());
        assert_eq!(err.to_string(), "Validation error: Invalid project ID: 'abc'");
        assert!(err.is_validation());
    }
}
