//! Postgres enum types mapped to Rust.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use fincahub_core::directory as directory_domain;
use fincahub_core::ledger as ledger_domain;

/// `account_category` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_category")]
pub enum AccountCategory {
    /// Petty cash.
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// Bank account.
    #[sea_orm(string_value = "BANK")]
    Bank,
    /// Anything else.
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// `transaction_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Money received.
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Money spent.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

/// `resident_role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "resident_role")]
pub enum ResidentRole {
    /// Property administrator.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Community president.
    #[sea_orm(string_value = "PRESIDENT")]
    President,
    /// Regular neighbor.
    #[sea_orm(string_value = "NEIGHBOR")]
    Neighbor,
}

impl From<ledger_domain::AccountCategory> for AccountCategory {
    fn from(value: ledger_domain::AccountCategory) -> Self {
        match value {
            ledger_domain::AccountCategory::Cash => Self::Cash,
            ledger_domain::AccountCategory::Bank => Self::Bank,
            ledger_domain::AccountCategory::Other => Self::Other,
        }
    }
}

impl From<AccountCategory> for ledger_domain::AccountCategory {
    fn from(value: AccountCategory) -> Self {
        match value {
            AccountCategory::Cash => Self::Cash,
            AccountCategory::Bank => Self::Bank,
            AccountCategory::Other => Self::Other,
        }
    }
}

impl From<ledger_domain::TransactionKind> for TransactionKind {
    fn from(value: ledger_domain::TransactionKind) -> Self {
        match value {
            ledger_domain::TransactionKind::Income => Self::Income,
            ledger_domain::TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<TransactionKind> for ledger_domain::TransactionKind {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<directory_domain::ResidentRole> for ResidentRole {
    fn from(value: directory_domain::ResidentRole) -> Self {
        match value {
            directory_domain::ResidentRole::Admin => Self::Admin,
            directory_domain::ResidentRole::President => Self::President,
            directory_domain::ResidentRole::Neighbor => Self::Neighbor,
        }
    }
}

impl From<ResidentRole> for directory_domain::ResidentRole {
    fn from(value: ResidentRole) -> Self {
        match value {
            ResidentRole::Admin => Self::Admin,
            ResidentRole::President => Self::President,
            ResidentRole::Neighbor => Self::Neighbor,
        }
    }
}
