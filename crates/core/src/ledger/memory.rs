//! In-memory ledger and budget store.
//!
//! All state lives behind a single `RwLock`; a posting takes the write lock
//! once, so readers never observe a transaction without its balance change.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fincahub_shared::types::{AccountId, BudgetId, CommunityId, TransactionId};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::balance::BalanceCheck;
use super::error::LedgerError;
use super::store::{LedgerStore, MAX_TRANSACTION_LIST};
use super::types::{
    Account, LedgerQuery, NewAccount, OPENING_BALANCE_CATEGORY, Posting, Transaction,
    TransactionFilter, TransactionKind,
};
use crate::budget::{Budget, BudgetError, BudgetStore, NewBudget};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl LedgerState {
    fn community_accounts(&self, community_id: CommunityId) -> HashSet<AccountId> {
        self.accounts
            .iter()
            .filter(|a| a.community_id == community_id)
            .map(|a| a.id)
            .collect()
    }

    fn apply(&mut self, community_id: CommunityId, posting: Posting) -> Result<Account, LedgerError> {
        posting.validate()?;
        let account_id = posting.transaction().account_id;
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id && a.community_id == community_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        account.balance += posting.delta();
        let updated = account.clone();
        self.transactions.push(posting.into_transaction());
        Ok(updated)
    }
}

/// Ledger and budget store kept in process memory.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays every transaction of the account against its recorded balance.
    pub async fn audit(&self, account_id: AccountId) -> Option<BalanceCheck> {
        let state = self.state.read().await;
        let account = state.accounts.iter().find(|a| a.id == account_id)?;
        let transactions: Vec<&Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .collect();
        Some(BalanceCheck::of(account, transactions))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn list_accounts(&self, community_id: CommunityId) -> Result<Vec<Account>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .iter()
            .filter(|a| a.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn find_account(
        &self,
        community_id: CommunityId,
        account_id: AccountId,
    ) -> Result<Option<Account>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .iter()
            .find(|a| a.id == account_id && a.community_id == community_id)
            .cloned())
    }

    async fn create_account(&self, input: NewAccount) -> Result<Account, LedgerError> {
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            community_id: input.community_id,
            name: input.name,
            category: input.category,
            balance: Decimal::ZERO,
            created_at: now,
        };

        let mut state = self.state.write().await;
        state.accounts.push(account.clone());

        if input.initial_balance.is_zero() {
            return Ok(account);
        }

        let kind = if input.initial_balance.is_sign_negative() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        };
        let opening = Transaction {
            id: TransactionId::new(),
            account_id: account.id,
            kind,
            amount: input.initial_balance.abs(),
            category: OPENING_BALANCE_CATEGORY.to_string(),
            description: format!("Opening balance of {}", account.name),
            date: now,
            created_at: now,
        };
        state.apply(input.community_id, Posting::from_transaction(opening))
    }

    async fn list_transactions(
        &self,
        community_id: CommunityId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.state.read().await;
        let accounts = state.community_accounts(community_id);
        let limit = usize::try_from(filter.effective_limit(MAX_TRANSACTION_LIST)).unwrap_or(usize::MAX);

        // Newest insertion first so the stable sort breaks date ties by recency.
        let mut selected: Vec<Transaction> = state
            .transactions
            .iter()
            .rev()
            .filter(|t| accounts.contains(&t.account_id) && filter.matches(t))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.date.cmp(&a.date));
        selected.truncate(limit);
        Ok(selected)
    }

    async fn apply_posting(
        &self,
        community_id: CommunityId,
        posting: Posting,
    ) -> Result<Account, LedgerError> {
        let mut state = self.state.write().await;
        state.apply(community_id, posting)
    }

    async fn sum_amounts(
        &self,
        community_id: CommunityId,
        query: &LedgerQuery,
    ) -> Result<Decimal, LedgerError> {
        let state = self.state.read().await;
        let accounts = state.community_accounts(community_id);
        Ok(state
            .transactions
            .iter()
            .filter(|t| accounts.contains(&t.account_id) && query.matches(t))
            .map(|t| t.amount)
            .sum())
    }
}

#[async_trait]
impl BudgetStore for InMemoryLedgerStore {
    async fn list_budgets(&self, community_id: CommunityId) -> Result<Vec<Budget>, BudgetError> {
        let state = self.state.read().await;
        let mut budgets: Vec<Budget> = state
            .budgets
            .iter()
            .rev()
            .filter(|b| b.community_id == community_id)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(budgets)
    }

    async fn create_budget(&self, input: NewBudget) -> Result<Budget, BudgetError> {
        let budget = Budget {
            id: BudgetId::new(),
            community_id: input.community_id,
            year: input.year,
            total_amount: input.total_amount,
            created_at: Utc::now(),
        };
        self.state.write().await.budgets.push(budget.clone());
        Ok(budget)
    }

    async fn find_budget_for_year(
        &self,
        community_id: CommunityId,
        year: i32,
    ) -> Result<Option<Budget>, BudgetError> {
        let state = self.state.read().await;
        Ok(state
            .budgets
            .iter()
            .rev()
            .find(|b| b.community_id == community_id && b.year == year)
            .cloned())
    }
}
