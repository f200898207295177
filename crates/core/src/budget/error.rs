//! Budget error types.

use fincahub_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// No budget exists for the year.
    #[error("No budget found for year {0}")]
    NotFound(i32),

    /// Amount cannot be negative.
    #[error("Budget amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Year outside the supported range.
    #[error("Invalid budget year: {0}")]
    InvalidYear(i32),

    /// Reading actual expenses failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Storage I/O failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Storage call exceeded the operation timeout.
    #[error("Budget operation timed out")]
    Timeout,
}

impl BudgetError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "BUDGET_NOT_FOUND",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidYear(_) => "INVALID_YEAR",
            Self::Ledger(err) => err.error_code(),
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeAmount(_) | Self::InvalidYear(_) => 400,
            Self::NotFound(_) => 404,
            Self::Ledger(err) => err.http_status_code(),
            Self::Storage(_) | Self::Timeout => 503,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(err) => err.is_retryable(),
            Self::Storage(_) | Self::Timeout => true,
            _ => false,
        }
    }
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::Ledger(inner) => inner.into(),
            BudgetError::NotFound(_) => Self::NotFound(err.to_string()),
            BudgetError::NegativeAmount(_) | BudgetError::InvalidYear(_) => {
                Self::InvalidInput(err.to_string())
            }
            BudgetError::Storage(_) | BudgetError::Timeout => {
                Self::TransientStorage(err.to_string())
            }
        }
    }
}
