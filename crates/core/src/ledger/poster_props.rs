//! Property-based tests for transaction posting.
//!
//! - Balance equals the replayed sum of incomes minus expenses after every posting
//! - Rejected postings leave the balance unchanged

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;
use fincahub_shared::types::CommunityId;

use super::error::LedgerError;
use super::memory::InMemoryLedgerStore;
use super::poster::TransactionPoster;
use super::store::LedgerStore;
use super::types::{AccountCategory, NewAccount, NewTransaction, TransactionKind};

/// Strategy to generate non-negative amounts (0.00 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a transaction kind.
fn kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Income), Just(TransactionKind::Expense)]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: balance == Σ income − Σ expense after each posting.
    #[test]
    fn prop_balance_matches_replay(
        opening in -50_000i64..50_000i64,
        postings in prop::collection::vec((kind(), amount()), 1..25),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(InMemoryLedgerStore::new());
            let community = CommunityId::new();
            let opening = Decimal::new(opening, 2);
            let account = store
                .create_account(NewAccount {
                    community_id: community,
                    name: "Banco".to_string(),
                    category: AccountCategory::Bank,
                    initial_balance: opening,
                })
                .await
                .unwrap();
            let poster = TransactionPoster::new(Arc::clone(&store));

            let mut expected = opening;
            for (kind, amount) in postings {
                let posted = poster
                    .post(community, NewTransaction::new(account.id, kind, amount, "Varios", ""))
                    .await
                    .unwrap();
                expected += kind.signed(amount);

                prop_assert_eq!(posted.account.balance, expected);
                let check = store.audit(account.id).await.unwrap();
                prop_assert!(check.is_consistent());
            }
            Ok(())
        })?;
    }

    /// Property: a negative amount is rejected and nothing changes.
    #[test]
    fn prop_negative_amount_rejected(
        start in amount(),
        cents in 1i64..1_000_000i64,
        kind in kind(),
    ) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(InMemoryLedgerStore::new());
            let community = CommunityId::new();
            let account = store
                .create_account(NewAccount {
                    community_id: community,
                    name: "Caja".to_string(),
                    category: AccountCategory::Cash,
                    initial_balance: start,
                })
                .await
                .unwrap();
            let poster = TransactionPoster::new(Arc::clone(&store));

            let result = poster
                .post(community, NewTransaction::new(account.id, kind, Decimal::new(-cents, 2), "Varios", ""))
                .await;
            prop_assert!(matches!(result, Err(LedgerError::NegativeAmount(_))));

            let after = store.find_account(community, account.id).await.unwrap().unwrap();
            prop_assert_eq!(after.balance, start);
            Ok(())
        })?;
    }
}
