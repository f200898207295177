//! Settlement error types.

use fincahub_shared::AppError;
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::ledger::LedgerError;

/// Errors raised while computing a settlement.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The year cannot be represented as a calendar window.
    #[error("Invalid settlement year: {0}")]
    InvalidYear(i32),

    /// Aggregating expenses failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Reading properties failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Computation exceeded the operation timeout.
    #[error("Settlement computation timed out")]
    Timeout,
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidYear(_) => "INVALID_YEAR",
            Self::Ledger(err) => err.error_code(),
            Self::Directory(err) => err.error_code(),
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidYear(_) => 400,
            Self::Ledger(err) => err.http_status_code(),
            Self::Directory(err) => err.http_status_code(),
            Self::Timeout => 503,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidYear(_) => false,
            Self::Ledger(err) => err.is_retryable(),
            Self::Directory(err) => err.is_retryable(),
            Self::Timeout => true,
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match err {
            SettlementError::InvalidYear(_) => Self::InvalidInput(err.to_string()),
            SettlementError::Ledger(inner) => inner.into(),
            SettlementError::Directory(inner) => inner.into(),
            SettlementError::Timeout => Self::TransientStorage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_errors_keep_their_codes() {
        let err = SettlementError::from(LedgerError::Storage("broken pipe".into()));
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.is_retryable());

        let err = SettlementError::InvalidYear(i32::MAX);
        assert_eq!(err.http_status_code(), 400);
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "INVALID_INPUT");
    }
}
