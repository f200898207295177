//! Ledger error types for validation and storage errors.

use fincahub_shared::AppError;
use fincahub_shared::types::{AccountId, CommunityId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction amount cannot be negative.
    #[error("Transaction amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Transaction type is neither INCOME nor EXPENSE.
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionKind(String),

    /// Account category is neither CASH, BANK nor OTHER.
    #[error("Unknown account category: {0}")]
    UnknownAccountCategory(String),

    /// Any other malformed input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========== Lookup Errors ==========
    /// Account not found in the community.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Community not found.
    #[error("Community not found: {0}")]
    CommunityNotFound(CommunityId),

    // ========== Storage Errors ==========
    /// Storage I/O failed; nothing was applied.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Storage call exceeded the operation timeout.
    #[error("Ledger operation timed out")]
    Timeout,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::UnknownTransactionKind(_) => "UNKNOWN_TRANSACTION_TYPE",
            Self::UnknownAccountCategory(_) => "UNKNOWN_ACCOUNT_CATEGORY",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CommunityNotFound(_) => "COMMUNITY_NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NegativeAmount(_)
            | Self::UnknownTransactionKind(_)
            | Self::UnknownAccountCategory(_)
            | Self::InvalidInput(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::CommunityNotFound(_) => 404,

            // 503 Service Unavailable - transient
            Self::Storage(_) | Self::Timeout => 503,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Timeout)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NegativeAmount(_)
            | LedgerError::UnknownTransactionKind(_)
            | LedgerError::UnknownAccountCategory(_)
            | LedgerError::InvalidInput(_) => Self::InvalidInput(err.to_string()),
            LedgerError::AccountNotFound(_) | LedgerError::CommunityNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::Storage(_) | LedgerError::Timeout => {
                Self::TransientStorage(err.to_string())
            }
        }
    }
}
