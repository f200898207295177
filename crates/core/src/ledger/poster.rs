//! Transaction posting.
//!
//! The poster is the only path that changes an account balance. It validates
//! the input, builds the immutable transaction record and hands the store a
//! [`Posting`] that carries both the record and its signed balance delta.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fincahub_shared::types::{AccountId, CommunityId, TransactionId};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::store::LedgerStore;
use super::types::{Account, NewTransaction, Posting, Transaction, TransactionKind};

/// Outcome of a successful posting.
#[derive(Debug, Clone)]
pub struct PostedTransaction {
    /// The appended transaction.
    pub transaction: Transaction,
    /// The account after its balance was updated.
    pub account: Account,
}

/// Applies transactions to a ledger store.
pub struct TransactionPoster<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for TransactionPoster<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LedgerStore + ?Sized> TransactionPoster<S> {
    /// Creates a poster over the given store.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validates the input and builds the posting without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NegativeAmount` if `amount < 0`.
    pub fn prepare(input: NewTransaction, now: DateTime<Utc>) -> Result<Posting, LedgerError> {
        if input.amount.is_sign_negative() && !input.amount.is_zero() {
            return Err(LedgerError::NegativeAmount(input.amount));
        }

        Ok(Posting::from_transaction(Transaction {
            id: TransactionId::new(),
            account_id: input.account_id,
            kind: input.kind,
            amount: input.amount,
            category: input.category,
            description: input.description,
            date: input.date.unwrap_or(now),
            created_at: now,
        }))
    }

    /// Posts a transaction to an account of the community.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` before any mutation, `AccountNotFound` if the
    /// account is not in the community, or a storage error. On error the
    /// balance is unchanged.
    pub async fn post(
        &self,
        community_id: CommunityId,
        input: NewTransaction,
    ) -> Result<PostedTransaction, LedgerError> {
        let posting = Self::prepare(input, Utc::now())?;
        let transaction = posting.transaction().clone();
        let account = self.store.apply_posting(community_id, posting).await?;
        Ok(PostedTransaction {
            transaction,
            account,
        })
    }

    /// Posts from loosely typed input, parsing the kind label first.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTransactionKind` for labels other than INCOME/EXPENSE,
    /// plus everything [`Self::post`] returns.
    pub async fn post_raw(
        &self,
        community_id: CommunityId,
        account_id: AccountId,
        amount: Decimal,
        kind: &str,
        category: &str,
        description: &str,
    ) -> Result<PostedTransaction, LedgerError> {
        let kind: TransactionKind = kind.parse()?;
        self.post(
            community_id,
            NewTransaction::new(account_id, kind, amount, category, description),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::InMemoryLedgerStore;
    use crate::ledger::types::{AccountCategory, NewAccount, TransactionFilter};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    async fn setup() -> (Arc<InMemoryLedgerStore>, CommunityId, Account) {
        let store = Arc::new(InMemoryLedgerStore::new());
        let community = CommunityId::new();
        let account = store
            .create_account(NewAccount {
                community_id: community,
                name: "Banco Principal".to_string(),
                category: AccountCategory::Bank,
                initial_balance: Decimal::ZERO,
            })
            .await
            .unwrap();
        (store, community, account)
    }

    #[tokio::test]
    async fn test_income_then_expense_scenario() {
        let (store, community, account) = setup().await;
        let poster = TransactionPoster::new(Arc::clone(&store));

        let first = poster
            .post(
                community,
                NewTransaction::new(account.id, TransactionKind::Income, dec!(1500), "Cuotas Ordinarias", "Enero"),
            )
            .await
            .unwrap();
        assert_eq!(first.account.balance, dec!(1500));

        let second = poster
            .post(
                community,
                NewTransaction::new(account.id, TransactionKind::Expense, dec!(850), "Mantenimiento", "Ascensor"),
            )
            .await
            .unwrap();
        assert_eq!(second.account.balance, dec!(650));

        let txs = store
            .list_transactions(community, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].id, second.transaction.id);
        assert_eq!(txs[1].id, first.transaction.id);
    }

    #[tokio::test]
    async fn test_negative_amount_leaves_balance_unchanged() {
        let (store, community, account) = setup().await;
        let poster = TransactionPoster::new(Arc::clone(&store));

        let err = poster
            .post(
                community,
                NewTransaction::new(account.id, TransactionKind::Income, dec!(-1), "X", "Y"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NegativeAmount(_)));

        let after = store.find_account(community, account.id).await.unwrap().unwrap();
        assert_eq!(after.balance, dec!(0));
    }

    #[tokio::test]
    async fn test_unknown_kind_is_rejected() {
        let (store, community, account) = setup().await;
        let poster = TransactionPoster::new(Arc::clone(&store));

        let err = poster
            .post_raw(community, account.id, dec!(10), "TRANSFER", "X", "Y")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownTransactionKind(_)));

        let txs = store
            .list_transactions(community, &TransactionFilter::default())
            .await
            .unwrap();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn test_missing_account_is_not_found() {
        let (store, community, _) = setup().await;
        let poster = TransactionPoster::new(store);

        let err = poster
            .post_raw(community, AccountId::new(), dec!(10), "income", "X", "Y")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(_)));
    }

    #[test]
    fn test_prepare_uses_explicit_date() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let date = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let input = NewTransaction::new(AccountId::new(), TransactionKind::Expense, dec!(0), "Luz", "Zonas comunes")
            .on(date);

        let posting = TransactionPoster::<InMemoryLedgerStore>::prepare(input, now).unwrap();

        assert_eq!(posting.transaction().date, date);
        assert_eq!(posting.transaction().created_at, now);
        assert_eq!(posting.delta(), dec!(0));
    }

    #[tokio::test]
    async fn test_concurrent_posts_do_not_lose_updates() {
        let (store, community, account) = setup().await;
        let poster = TransactionPoster::new(Arc::clone(&store));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let poster = poster.clone();
                tokio::spawn(async move {
                    let kind = if i % 2 == 0 {
                        TransactionKind::Income
                    } else {
                        TransactionKind::Expense
                    };
                    poster
                        .post(community, NewTransaction::new(account.id, kind, dec!(10.25), "Cuotas", ""))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let after = store.find_account(community, account.id).await.unwrap().unwrap();
        assert_eq!(after.balance, dec!(0));
        assert!(store.audit(account.id).await.unwrap().is_consistent());
    }
}
