//! Balance replay and consistency checks.
//!
//! An account's recorded balance must equal the signed sum of its
//! transactions: incomes add, expenses subtract.

use fincahub_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Account, Transaction};

/// Signed sum of a sequence of transactions.
#[must_use]
pub fn replay_balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions.into_iter().map(Transaction::signed_amount).sum()
}

/// Recorded versus replayed balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    /// The account checked.
    pub account_id: AccountId,
    /// Balance stored on the account.
    pub recorded: Decimal,
    /// Balance obtained by replaying its transactions.
    pub replayed: Decimal,
    /// Number of transactions replayed.
    pub transaction_count: usize,
}

impl BalanceCheck {
    /// Replays the transactions that belong to `account`; others are ignored.
    #[must_use]
    pub fn of<'a>(account: &Account, transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let own: Vec<&Transaction> = transactions
            .into_iter()
            .filter(|t| t.account_id == account.id)
            .collect();
        Self {
            account_id: account.id,
            recorded: account.balance,
            replayed: replay_balance(own.iter().copied()),
            transaction_count: own.len(),
        }
    }

    /// Returns true if the recorded balance matches the replay.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.recorded == self.replayed
    }

    /// Recorded minus replayed.
    #[must_use]
    pub fn drift(&self) -> Decimal {
        self.recorded - self.replayed
    }
}
