//! Ledger repository backing accounts, transactions and budgets with Postgres.
//!
//! Balance updates run as `balance = balance + delta` inside the same
//! database transaction as the insert, so concurrent postings on one account
//! serialize on the row lock and never lose an update.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::error;

use fincahub_core::budget::{Budget, BudgetError, BudgetStore, NewBudget};
use fincahub_core::ledger::{
    Account, LedgerError, LedgerQuery, LedgerStore, MAX_TRANSACTION_LIST, NewAccount,
    OPENING_BALANCE_CATEGORY, Posting, Transaction, TransactionFilter, TransactionKind,
    mentions_unit,
};
use fincahub_shared::types::{AccountId, BudgetId, CommunityId, TransactionId};

use crate::entities::sea_orm_active_enums::TransactionKind as DbTransactionKind;
use crate::entities::{accounts, budgets, transactions};

/// Postgres implementation of the ledger and budget stores.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Increments the balance and inserts the transaction inside `txn`.
    ///
    /// Returns `None` when no account with that ID exists in the community,
    /// in which case nothing was written.
    async fn apply_in(
        txn: &DatabaseTransaction,
        community_id: CommunityId,
        posting: &Posting,
    ) -> Result<Option<accounts::Model>, DbErr> {
        let tx = posting.transaction();

        let mut updated = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(posting.delta()),
            )
            .filter(accounts::Column::Id.eq(tx.account_id.into_inner()))
            .filter(accounts::Column::CommunityId.eq(community_id.into_inner()))
            .exec_with_returning(txn)
            .await?;

        let Some(account) = updated.pop() else {
            return Ok(None);
        };

        transactions::ActiveModel {
            id: Set(tx.id.into_inner()),
            account_id: Set(tx.account_id.into_inner()),
            kind: Set(tx.kind.into()),
            amount: Set(tx.amount),
            category: Set(tx.category.clone()),
            description: Set(tx.description.clone()),
            date: Set(tx.date.into()),
            created_at: Set(tx.created_at.into()),
        }
        .insert(txn)
        .await?;

        Ok(Some(account))
    }
}

fn ledger_storage(err: DbErr) -> LedgerError {
    error!(error = %err, "Ledger query failed");
    LedgerError::Storage(err.to_string())
}

fn budget_storage(err: DbErr) -> BudgetError {
    error!(error = %err, "Budget query failed");
    BudgetError::Storage(err.to_string())
}

fn to_account(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        community_id: CommunityId::from_uuid(model.community_id),
        name: model.name,
        category: model.category.into(),
        balance: model.balance,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn to_transaction(model: transactions::Model) -> Transaction {
    Transaction {
        id: TransactionId::from_uuid(model.id),
        account_id: AccountId::from_uuid(model.account_id),
        kind: model.kind.into(),
        amount: model.amount,
        category: model.category,
        description: model.description,
        date: model.date.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn to_budget(model: budgets::Model) -> Budget {
    Budget {
        id: BudgetId::from_uuid(model.id),
        community_id: CommunityId::from_uuid(model.community_id),
        year: model.year,
        total_amount: model.total_amount,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn list_accounts(&self, community_id: CommunityId) -> Result<Vec<Account>, LedgerError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::CommunityId.eq(community_id.into_inner()))
            .order_by_asc(accounts::Column::CreatedAt)
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(ledger_storage)?;

        Ok(models.into_iter().map(to_account).collect())
    }

    async fn find_account(
        &self,
        community_id: CommunityId,
        account_id: AccountId,
    ) -> Result<Option<Account>, LedgerError> {
        let model = accounts::Entity::find_by_id(account_id.into_inner())
            .filter(accounts::Column::CommunityId.eq(community_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(ledger_storage)?;

        Ok(model.map(to_account))
    }

    async fn create_account(&self, input: NewAccount) -> Result<Account, LedgerError> {
        let now = Utc::now();
        let account_id = AccountId::new();

        let txn = self.db.begin().await.map_err(ledger_storage)?;

        let created = accounts::ActiveModel {
            id: Set(account_id.into_inner()),
            community_id: Set(input.community_id.into_inner()),
            name: Set(input.name.clone()),
            category: Set(input.category.into()),
            balance: Set(Decimal::ZERO),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(ledger_storage)?;

        if input.initial_balance.is_zero() {
            txn.commit().await.map_err(ledger_storage)?;
            return Ok(to_account(created));
        }

        let kind = if input.initial_balance.is_sign_negative() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        };
        let opening = Posting::from_transaction(Transaction {
            id: TransactionId::new(),
            account_id,
            kind,
            amount: input.initial_balance.abs(),
            category: OPENING_BALANCE_CATEGORY.to_string(),
            description: format!("Opening balance of {}", input.name),
            date: now,
            created_at: now,
        });

        let Some(account) = Self::apply_in(&txn, input.community_id, &opening)
            .await
            .map_err(ledger_storage)?
        else {
            txn.rollback().await.map_err(ledger_storage)?;
            return Err(LedgerError::AccountNotFound(account_id));
        };

        txn.commit().await.map_err(ledger_storage)?;
        Ok(to_account(account))
    }

    async fn list_transactions(
        &self,
        community_id: CommunityId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut query = transactions::Entity::find()
            .inner_join(accounts::Entity)
            .filter(accounts::Column::CommunityId.eq(community_id.into_inner()));

        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.into_inner()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(DbTransactionKind::from(kind)));
        }
        if let Some(category) = &filter.category {
            query = query.filter(transactions::Column::Category.eq(category.as_str()));
        }

        let models = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(filter.effective_limit(MAX_TRANSACTION_LIST))
            .all(&self.db)
            .await
            .map_err(ledger_storage)?;

        Ok(models.into_iter().map(to_transaction).collect())
    }

    async fn apply_posting(
        &self,
        community_id: CommunityId,
        posting: Posting,
    ) -> Result<Account, LedgerError> {
        posting.validate()?;
        let txn = self.db.begin().await.map_err(ledger_storage)?;

        match Self::apply_in(&txn, community_id, &posting)
            .await
            .map_err(ledger_storage)?
        {
            Some(account) => {
                txn.commit().await.map_err(ledger_storage)?;
                Ok(to_account(account))
            }
            None => {
                txn.rollback().await.map_err(ledger_storage)?;
                Err(LedgerError::AccountNotFound(posting.transaction().account_id))
            }
        }
    }

    async fn sum_amounts(
        &self,
        community_id: CommunityId,
        query: &LedgerQuery,
    ) -> Result<Decimal, LedgerError> {
        let mut select = transactions::Entity::find()
            .inner_join(accounts::Entity)
            .filter(accounts::Column::CommunityId.eq(community_id.into_inner()));

        if let Some(kind) = query.kind {
            select = select.filter(transactions::Column::Kind.eq(DbTransactionKind::from(kind)));
        }
        if let Some(category) = &query.category {
            select = select.filter(transactions::Column::Category.eq(category.as_str()));
        }
        if let Some(window) = query.window {
            select = select.filter(transactions::Column::Date.between(window.start, window.end));
        }

        // LIKE narrows the rows; the token check runs on what comes back.
        if let Some(unit) = &query.unit_reference {
            let rows: Vec<(Decimal, String)> = select
                .filter(transactions::Column::Description.contains(unit.as_str()))
                .select_only()
                .column(transactions::Column::Amount)
                .column(transactions::Column::Description)
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(ledger_storage)?;

            return Ok(rows
                .into_iter()
                .filter(|(_, description)| mentions_unit(description, unit))
                .map(|(amount, _)| amount)
                .sum());
        }

        let total: Option<Option<Decimal>> = select
            .select_only()
            .column_as(
                Expr::col((transactions::Entity, transactions::Column::Amount)).sum(),
                "total",
            )
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(ledger_storage)?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }
}

#[async_trait]
impl BudgetStore for LedgerRepository {
    async fn list_budgets(&self, community_id: CommunityId) -> Result<Vec<Budget>, BudgetError> {
        let models = budgets::Entity::find()
            .filter(budgets::Column::CommunityId.eq(community_id.into_inner()))
            .order_by_desc(budgets::Column::Year)
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(budget_storage)?;

        Ok(models.into_iter().map(to_budget).collect())
    }

    async fn create_budget(&self, input: NewBudget) -> Result<Budget, BudgetError> {
        let model = budgets::ActiveModel {
            id: Set(BudgetId::new().into_inner()),
            community_id: Set(input.community_id.into_inner()),
            year: Set(input.year),
            total_amount: Set(input.total_amount),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(budget_storage)?;

        Ok(to_budget(model))
    }

    async fn find_budget_for_year(
        &self,
        community_id: CommunityId,
        year: i32,
    ) -> Result<Option<Budget>, BudgetError> {
        let model = budgets::Entity::find()
            .filter(budgets::Column::CommunityId.eq(community_id.into_inner()))
            .filter(budgets::Column::Year.eq(year))
            .order_by_desc(budgets::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(budget_storage)?;

        Ok(model.map(to_budget))
    }
}
