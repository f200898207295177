//! Direct-debit collection error types.

use fincahub_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::directory::DirectoryError;

/// Errors raised while generating a direct-debit batch.
#[derive(Debug, Error)]
pub enum CollectionError {
    // ========== Validation Errors ==========
    /// No resident of the community has a registered IBAN.
    #[error("no residents with registered IBAN to generate a collection batch")]
    NoPayers,

    /// Per-payer amount must be positive.
    #[error("Amount per payer must be positive: {0}")]
    InvalidAmount(Decimal),

    /// Remittance concept is blank.
    #[error("Remittance concept is required")]
    EmptyConcept,

    /// Collection settings are unusable.
    #[error("Invalid collection settings: {0}")]
    Settings(String),

    // ========== Output Errors ==========
    /// Writing the document failed.
    #[error("XML error: {0}")]
    Xml(String),

    // ========== Storage Errors ==========
    /// Reading payers failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Generation exceeded the operation timeout.
    #[error("Direct-debit generation timed out")]
    Timeout,
}

impl CollectionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoPayers => "NO_PAYERS",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::EmptyConcept => "EMPTY_CONCEPT",
            Self::Settings(_) => "INVALID_SETTINGS",
            Self::Xml(_) => "XML_ERROR",
            Self::Directory(err) => err.error_code(),
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NoPayers | Self::InvalidAmount(_) | Self::EmptyConcept => 400,
            Self::Settings(_) | Self::Xml(_) => 500,
            Self::Directory(err) => err.http_status_code(),
            Self::Timeout => 503,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Directory(err) => err.is_retryable(),
            Self::Timeout => true,
            _ => false,
        }
    }
}

impl From<CollectionError> for AppError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::NoPayers => Self::NoPayers(err.to_string()),
            CollectionError::InvalidAmount(_) | CollectionError::EmptyConcept => {
                Self::InvalidInput(err.to_string())
            }
            CollectionError::Settings(_) | CollectionError::Xml(_) => {
                Self::Internal(err.to_string())
            }
            CollectionError::Directory(inner) => inner.into(),
            CollectionError::Timeout => Self::TransientStorage(err.to_string()),
        }
    }
}
