//! Directory error types.

use fincahub_shared::AppError;
use fincahub_shared::types::{PropertyId, ResidentId};
use thiserror::Error;

/// Errors raised by the resident and property directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Malformed directory record.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resident not found in the community.
    #[error("Resident not found: {0}")]
    ResidentNotFound(ResidentId),

    /// Property not found in the community.
    #[error("Property not found: {0}")]
    PropertyNotFound(PropertyId),

    /// Storage I/O failed.
    #[error("Directory storage error: {0}")]
    Storage(String),

    /// Directory read exceeded the operation timeout.
    #[error("Directory operation timed out")]
    Timeout,
}

impl DirectoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ResidentNotFound(_) => "RESIDENT_NOT_FOUND",
            Self::PropertyNotFound(_) => "PROPERTY_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::ResidentNotFound(_) | Self::PropertyNotFound(_) => 404,
            Self::Storage(_) | Self::Timeout => 503,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Timeout)
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::InvalidInput(_) => Self::InvalidInput(err.to_string()),
            DirectoryError::ResidentNotFound(_) | DirectoryError::PropertyNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            DirectoryError::Storage(_) | DirectoryError::Timeout => {
                Self::TransientStorage(err.to_string())
            }
        }
    }
}
