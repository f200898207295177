//! Community ledger: accounts, transactions and balance posting.
//!
//! - Domain types for accounts, transactions and queries
//! - The `LedgerStore` port and an in-memory implementation
//! - The `TransactionPoster`, the only writer of balances
//! - Balance replay checks

pub mod balance;
pub mod error;
pub mod memory;
pub mod poster;
pub mod store;
pub mod types;

#[cfg(test)]
mod poster_props;

pub use balance::{BalanceCheck, replay_balance};
pub use error::LedgerError;
pub use memory::InMemoryLedgerStore;
pub use poster::{PostedTransaction, TransactionPoster};
pub use store::{LedgerStore, MAX_TRANSACTION_LIST};
pub use types::{
    Account, AccountCategory, BalanceSummary, DateWindow, LedgerQuery, NewAccount,
    NewTransaction, OPENING_BALANCE_CATEGORY, Posting, Transaction, TransactionFilter,
    TransactionKind, mentions_unit,
};
