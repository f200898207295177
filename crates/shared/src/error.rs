//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every accounting module error converts into one of these variants before it
/// reaches a caller outside the core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced account, community, or budget does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed amount, unknown transaction type, negative amount.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Direct-debit batch requested with zero eligible residents.
    #[error("{0}")]
    NoPayers(String),

    /// Underlying storage failed or timed out. Safe to retry.
    #[error("Transient storage failure: {0}")]
    TransientStorage(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) | Self::NoPayers(_) => 400,
            Self::TransientStorage(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NoPayers(_) => "NO_PAYERS",
            Self::TransientStorage(_) => "TRANSIENT_STORAGE_FAILURE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry the whole operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStorage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::InvalidInput(String::new()).status_code(), 400);
        assert_eq!(AppError::NoPayers(String::new()).status_code(), 400);
        assert_eq!(AppError::TransientStorage(String::new()).status_code(), 503);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::InvalidInput(String::new()).error_code(),
            "INVALID_INPUT"
        );
        assert_eq!(AppError::NoPayers(String::new()).error_code(), "NO_PAYERS");
        assert_eq!(
            AppError::TransientStorage(String::new()).error_code(),
            "TRANSIENT_STORAGE_FAILURE"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_only_storage_failures_are_retryable() {
        assert!(AppError::TransientStorage("timeout".into()).is_retryable());
        assert!(!AppError::NotFound("x".into()).is_retryable());
        assert!(!AppError::InvalidInput("x".into()).is_retryable());
        assert!(!AppError::NoPayers("x".into()).is_retryable());
        assert!(!AppError::Internal("x".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::InvalidInput("msg".into()).to_string(),
            "Invalid input: msg"
        );
        assert_eq!(AppError::NoPayers("msg".into()).to_string(), "msg");
        assert_eq!(
            AppError::TransientStorage("msg".into()).to_string(),
            "Transient storage failure: msg"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }
}
