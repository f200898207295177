//! Accounting service facade.
//!
//! The one entry point callers use. It scopes every operation to a
//! community, bounds every storage call with the configured timeout, logs
//! outcomes, and converts module errors into [`AppError`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fincahub_shared::config::{AppConfig, ArrearsPolicyKind};
use fincahub_shared::types::{AccountId, CommunityId};
use fincahub_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::arrears::{
    ArrearsError, ArrearsEstimator, ArrearsPolicy, LedgerDerivedPolicy, PlaceholderHashPolicy,
    ResidentDebt,
};
use crate::budget::{Budget, BudgetError, BudgetService, BudgetStatus, BudgetStore, NewBudget};
use crate::collection::{
    CollectionError, CollectionSettings, DirectDebitBatchGenerator, DirectDebitDocument,
};
use crate::directory::Directory;
use crate::ledger::{
    Account, AccountCategory, BalanceSummary, DateWindow, LedgerError, LedgerQuery, LedgerStore,
    MAX_TRANSACTION_LIST, NewAccount, NewTransaction, Transaction, TransactionFilter,
    TransactionKind, TransactionPoster,
};
use crate::settlement::{SettlementAllocator, SettlementError, SettlementReport};

/// Tunables of the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Upper bound for every storage or directory call.
    pub operation_timeout: Duration,
    /// Transaction listing cap, between one and [`MAX_TRANSACTION_LIST`].
    pub transaction_list_limit: u64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(5),
            transaction_list_limit: MAX_TRANSACTION_LIST,
        }
    }
}

/// Ledger, budgets, settlement, arrears and direct debit for communities.
pub struct AccountingService<S, D> {
    store: Arc<S>,
    poster: TransactionPoster<S>,
    settlement: SettlementAllocator<S, D>,
    arrears: ArrearsEstimator<D, dyn ArrearsPolicy>,
    collection: DirectDebitBatchGenerator<D>,
    options: ServiceOptions,
}

impl<S, D> AccountingService<S, D>
where
    S: LedgerStore + BudgetStore + 'static,
    D: Directory + 'static,
{
    /// Wires the service from its parts.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        directory: Arc<D>,
        policy: Arc<dyn ArrearsPolicy>,
        settings: CollectionSettings,
        options: ServiceOptions,
    ) -> Self {
        Self {
            poster: TransactionPoster::new(Arc::clone(&store)),
            settlement: SettlementAllocator::new(Arc::clone(&store), Arc::clone(&directory)),
            arrears: ArrearsEstimator::new(Arc::clone(&directory), policy),
            collection: DirectDebitBatchGenerator::new(directory, settings),
            store,
            options,
        }
    }

    /// Wires the service from application configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the collection settings are unusable.
    pub fn from_config(store: Arc<S>, directory: Arc<D>, config: &AppConfig) -> AppResult<Self> {
        let settings = CollectionSettings::from_config(&config.collection)?;
        let policy: Arc<dyn ArrearsPolicy> = match config.arrears.policy {
            ArrearsPolicyKind::PlaceholderHash => Arc::new(PlaceholderHashPolicy),
            ArrearsPolicyKind::LedgerDerived => Arc::new(LedgerDerivedPolicy::new(
                Arc::clone(&store),
                config.arrears.monthly_fee,
                config.arrears.dues_category.clone(),
            )),
        };
        let options = ServiceOptions {
            operation_timeout: Duration::from_millis(config.ledger.operation_timeout_ms),
            transaction_list_limit: config.ledger.transaction_list_limit.clamp(1, MAX_TRANSACTION_LIST),
        };
        info!(
            arrears_policy = policy.name(),
            timeout_ms = config.ledger.operation_timeout_ms,
            "Accounting service configured"
        );
        Ok(Self::new(store, directory, policy, settings, options))
    }

    /// Runs `fut`, replacing an elapsed timeout with `on_timeout`.
    async fn bounded<T, E>(
        &self,
        fut: impl Future<Output = Result<T, E>>,
        on_timeout: E,
    ) -> Result<T, E> {
        tokio::time::timeout(self.options.operation_timeout, fut)
            .await
            .unwrap_or(Err(on_timeout))
    }

    // ========== Ledger ==========

    /// Accounts of the community.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store fails or times out.
    pub async fn accounts(&self, community_id: CommunityId) -> AppResult<Vec<Account>> {
        self.bounded(self.store.list_accounts(community_id), LedgerError::Timeout)
            .await
            .map_err(|e| failed(e, "Failed to list accounts"))
    }

    /// Creates an account; `category` is CASH, BANK or OTHER.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank name or unknown category.
    pub async fn create_account(
        &self,
        community_id: CommunityId,
        name: &str,
        category: &str,
        initial_balance: Decimal,
    ) -> AppResult<Account> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("account name is required".to_string()));
        }
        let category: AccountCategory = category.parse()?;

        let input = NewAccount {
            community_id,
            name: name.trim().to_string(),
            category,
            initial_balance,
        };
        let account = self
            .bounded(self.store.create_account(input), LedgerError::Timeout)
            .await
            .map_err(|e| failed(e, "Failed to create account"))?;

        info!(
            %community_id,
            account_id = %account.id,
            category = %account.category,
            balance = %account.balance,
            "Account created"
        );
        Ok(account)
    }

    /// Most recent transactions first, capped at the listing limit.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store fails or times out.
    pub async fn transactions(
        &self,
        community_id: CommunityId,
        filter: TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        let filter = TransactionFilter {
            limit: Some(filter.effective_limit(self.options.transaction_list_limit)),
            ..filter
        };
        self.bounded(
            self.store.list_transactions(community_id, &filter),
            LedgerError::Timeout,
        )
        .await
        .map_err(|e| failed(e, "Failed to list transactions"))
    }

    /// Total balance over the community's accounts.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store fails or times out.
    pub async fn balance(&self, community_id: CommunityId) -> AppResult<BalanceSummary> {
        self.bounded(self.store.total_balance(community_id), LedgerError::Timeout)
            .await
            .map_err(|e| failed(e, "Failed to compute balance"))
    }

    /// Posts a transaction from loosely typed input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative amount or unknown type,
    /// `NotFound` if the account is not in the community.
    pub async fn post_transaction(
        &self,
        community_id: CommunityId,
        account_id: AccountId,
        amount: Decimal,
        kind: &str,
        category: &str,
        description: &str,
    ) -> AppResult<Transaction> {
        let kind: TransactionKind = kind.parse()?;
        self.post(
            community_id,
            NewTransaction::new(account_id, kind, amount, category, description),
        )
        .await
    }

    /// Posts a transaction.
    ///
    /// # Errors
    ///
    /// See [`Self::post_transaction`].
    pub async fn post(
        &self,
        community_id: CommunityId,
        input: NewTransaction,
    ) -> AppResult<Transaction> {
        let account_id = input.account_id;
        let posted = self
            .bounded(self.poster.post(community_id, input), LedgerError::Timeout)
            .await
            .map_err(|e| failed(e, "Failed to post transaction"))?;

        info!(
            %community_id,
            %account_id,
            transaction_id = %posted.transaction.id,
            kind = %posted.transaction.kind,
            amount = %posted.transaction.amount,
            "Transaction posted"
        );
        debug!(%account_id, balance = %posted.account.balance, "Balance updated");
        Ok(posted.transaction)
    }

    // ========== Budgets ==========

    /// Budgets of the community, most recent year first.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the store fails or times out.
    pub async fn budgets(&self, community_id: CommunityId) -> AppResult<Vec<Budget>> {
        self.bounded(self.store.list_budgets(community_id), BudgetError::Timeout)
            .await
            .map_err(|e| failed(e, "Failed to list budgets"))
    }

    /// Creates a yearly budget.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a negative amount or out-of-range year.
    pub async fn create_budget(
        &self,
        community_id: CommunityId,
        year: i32,
        total_amount: Decimal,
    ) -> AppResult<Budget> {
        let input = NewBudget {
            community_id,
            year,
            total_amount,
        };
        BudgetService::validate_new_budget(&input)?;

        let budget = self
            .bounded(self.store.create_budget(input), BudgetError::Timeout)
            .await
            .map_err(|e| failed(e, "Failed to create budget"))?;

        info!(%community_id, budget_id = %budget.id, year, "Budget created");
        Ok(budget)
    }

    /// Budget versus actual expenses for the year.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no budget exists for the year.
    pub async fn budget_status(&self, community_id: CommunityId, year: i32) -> AppResult<BudgetStatus> {
        let window = DateWindow::calendar_year(year).ok_or(BudgetError::InvalidYear(year))?;
        let budget = self
            .bounded(
                self.store.find_budget_for_year(community_id, year),
                BudgetError::Timeout,
            )
            .await
            .map_err(|e| failed(e, "Failed to load budget"))?
            .ok_or(BudgetError::NotFound(year))?;

        let actual = self
            .bounded(
                self.store.sum_amounts(community_id, &LedgerQuery::expenses_in(window)),
                LedgerError::Timeout,
            )
            .await
            .map_err(|e| failed(BudgetError::from(e), "Failed to aggregate expenses"))?;

        Ok(BudgetService::status(&budget, actual))
    }

    // ========== Settlement, arrears and collection ==========

    /// Yearly settlement by ownership coefficient.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unrepresentable year, or a transient error.
    pub async fn settlement(&self, community_id: CommunityId, year: i32) -> AppResult<SettlementReport> {
        let report = self
            .bounded(
                self.settlement.compute_settlement(community_id, year),
                SettlementError::Timeout,
            )
            .await
            .map_err(|e| failed(e, "Failed to compute settlement"))?;

        info!(
            %community_id,
            year,
            total_expenses = %report.total_expenses,
            lines = report.lines.len(),
            "Settlement computed"
        );
        Ok(report)
    }

    /// Neighbors with outstanding debt.
    ///
    /// # Errors
    ///
    /// Returns a transient error if the directory or ledger fails.
    pub async fn arrears(&self, community_id: CommunityId) -> AppResult<Vec<ResidentDebt>> {
        let debtors = self
            .bounded(
                self.arrears.estimate(community_id, Utc::now()),
                ArrearsError::Timeout,
            )
            .await
            .map_err(|e| failed(e, "Failed to estimate arrears"))?;

        info!(
            %community_id,
            policy = self.arrears.policy_name(),
            debtors = debtors.len(),
            "Arrears estimated"
        );
        Ok(debtors)
    }

    /// Direct-debit document charging `amount_per_payer` to every resident with an IBAN.
    ///
    /// # Errors
    ///
    /// Returns `NoPayers` if nobody has an IBAN, `InvalidInput` for a blank
    /// concept or non-positive amount.
    pub async fn direct_debit(
        &self,
        community_id: CommunityId,
        concept: &str,
        amount_per_payer: Decimal,
    ) -> AppResult<DirectDebitDocument> {
        let document = self
            .bounded(
                self.collection.generate_batch(community_id, concept, amount_per_payer),
                CollectionError::Timeout,
            )
            .await
            .map_err(|e| failed(e, "Failed to generate direct-debit batch"))?;

        info!(
            %community_id,
            message_id = %document.batch.message_id,
            payers = document.batch.number_of_transactions(),
            control_sum = %document.batch.control_sum(),
            filename = %document.filename,
            "Direct-debit batch generated"
        );
        Ok(document)
    }
}

/// Logs a failed operation and converts it for the caller.
fn failed<E>(err: E, message: &'static str) -> AppError
where
    E: std::fmt::Display + Into<AppError>,
{
    let app: AppError = err.into();
    if app.is_retryable() || app.status_code() >= 500 {
        error!(error = %app, "{message}");
    } else {
        warn!(error = %app, "{message}");
    }
    app
}
