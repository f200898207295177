//! Storage port for accounts and transactions.

use async_trait::async_trait;
use fincahub_shared::types::{AccountId, CommunityId};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{
    Account, BalanceSummary, LedgerQuery, NewAccount, Posting, Transaction, TransactionFilter,
};

/// Hard cap on the number of transactions a listing returns.
pub const MAX_TRANSACTION_LIST: u64 = 50;

/// Durable mapping of accounts to balances plus the append-only transaction list.
///
/// Implementations must make `apply_posting` atomic: a concurrent reader sees
/// either both the appended transaction and the incremented balance, or
/// neither. No other method may change a balance.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Lists the community's accounts.
    async fn list_accounts(&self, community_id: CommunityId) -> Result<Vec<Account>, LedgerError>;

    /// Finds one account scoped to the community.
    async fn find_account(
        &self,
        community_id: CommunityId,
        account_id: AccountId,
    ) -> Result<Option<Account>, LedgerError>;

    /// Creates an account. A non-zero initial balance is recorded as an
    /// opening transaction in the same atomic unit.
    async fn create_account(&self, input: NewAccount) -> Result<Account, LedgerError>;

    /// Lists transactions on the community's accounts, most recent occurrence
    /// first, capped at `filter.effective_limit(MAX_TRANSACTION_LIST)` rows.
    async fn list_transactions(
        &self,
        community_id: CommunityId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Appends the transaction and increments its account's balance by
    /// `posting.delta()` as one unit. Returns the account after the update.
    ///
    /// Fails with `NegativeAmount` if the transaction amount is below zero,
    /// or `AccountNotFound` if the account does not belong to the community.
    /// Either way nothing is applied.
    async fn apply_posting(
        &self,
        community_id: CommunityId,
        posting: Posting,
    ) -> Result<Account, LedgerError>;

    /// Sums the `amount` of every transaction on the community's accounts
    /// selected by `query`. Zero when nothing matches.
    async fn sum_amounts(
        &self,
        community_id: CommunityId,
        query: &LedgerQuery,
    ) -> Result<Decimal, LedgerError>;

    /// Sum of all account balances of the community.
    async fn total_balance(&self, community_id: CommunityId) -> Result<BalanceSummary, LedgerError> {
        let accounts = self.list_accounts(community_id).await?;
        Ok(BalanceSummary::from_accounts(&accounts))
    }
}
