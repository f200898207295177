//! Arrears error types.

use fincahub_shared::AppError;
use thiserror::Error;

use crate::directory::DirectoryError;
use crate::ledger::LedgerError;

/// Errors raised while estimating arrears.
#[derive(Debug, Error)]
pub enum ArrearsError {
    /// Reading residents failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Reading dues payments failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Estimation exceeded the operation timeout.
    #[error("Arrears estimation timed out")]
    Timeout,
}

impl ArrearsError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Directory(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Directory(err) => err.http_status_code(),
            Self::Ledger(err) => err.http_status_code(),
            Self::Timeout => 503,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Directory(err) => err.is_retryable(),
            Self::Ledger(err) => err.is_retryable(),
            Self::Timeout => true,
        }
    }
}

impl From<ArrearsError> for AppError {
    fn from(err: ArrearsError) -> Self {
        match err {
            ArrearsError::Directory(inner) => inner.into(),
            ArrearsError::Ledger(inner) => inner.into(),
            ArrearsError::Timeout => Self::TransientStorage(err.to_string()),
        }
    }
}
