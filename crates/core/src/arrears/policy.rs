//! Arrears policies.
//!
//! Two interchangeable variants sit behind [`ArrearsPolicy`]:
//!
//! - [`PlaceholderHashPolicy`] derives a stable fake debt from the resident
//!   identifier. It is NOT billing logic and exists for demos and fixtures.
//! - [`LedgerDerivedPolicy`] compares dues expected so far this year with
//!   dues income recorded in the ledger.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use fincahub_shared::types::CommunityId;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::error::ArrearsError;
use super::types::DebtAssessment;
use crate::directory::Resident;
use crate::ledger::{DateWindow, LedgerQuery, LedgerStore, TransactionKind};

/// Monthly amount the placeholder policy charges per missing month.
pub const PLACEHOLDER_MONTHLY_FEE: Decimal = Decimal::from_parts(5000, 0, 0, false, 2);

/// Decides how much a resident owes.
#[async_trait]
pub trait ArrearsPolicy: Send + Sync {
    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    /// Assesses one resident as of the given instant.
    async fn assess(
        &self,
        community_id: CommunityId,
        resident: &Resident,
        as_of: DateTime<Utc>,
    ) -> Result<DebtAssessment, ArrearsError>;
}

/// Sum of the character codes of the first and last characters.
///
/// Codes are UTF-16 units, so identifiers hash the same as their text form
/// does on any platform that stores strings that way.
#[must_use]
pub fn placeholder_hash(id: &str) -> u32 {
    let first = id.encode_utf16().next().map_or(0, u32::from);
    let last = id.encode_utf16().last().map_or(0, u32::from);
    first + last
}

/// Deterministic placeholder: debt from the identifier hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderHashPolicy;

impl PlaceholderHashPolicy {
    /// Assessment for an identifier string.
    #[must_use]
    pub fn assess_id(id: &str) -> DebtAssessment {
        let hash = placeholder_hash(id);
        if hash % 3 == 0 {
            return DebtAssessment::settled();
        }
        let months = hash % 6 + 1;
        DebtAssessment {
            debt_amount: PLACEHOLDER_MONTHLY_FEE * Decimal::from(months),
            months_overdue: months,
        }
    }
}

#[async_trait]
impl ArrearsPolicy for PlaceholderHashPolicy {
    fn name(&self) -> &'static str {
        "placeholder_hash"
    }

    async fn assess(
        &self,
        _community_id: CommunityId,
        resident: &Resident,
        _as_of: DateTime<Utc>,
    ) -> Result<DebtAssessment, ArrearsError> {
        Ok(Self::assess_id(&resident.id.to_string()))
    }
}

/// Expected dues this year minus dues income recorded for the resident's unit.
pub struct LedgerDerivedPolicy<S: ?Sized> {
    store: Arc<S>,
    monthly_fee: Decimal,
    dues_category: String,
}

impl<S: LedgerStore + ?Sized> LedgerDerivedPolicy<S> {
    /// Creates the policy.
    #[must_use]
    pub fn new(store: Arc<S>, monthly_fee: Decimal, dues_category: impl Into<String>) -> Self {
        Self {
            store,
            monthly_fee,
            dues_category: dues_category.into(),
        }
    }

    /// Dues owed from January up to and including the month of `as_of`.
    #[must_use]
    pub fn expected_dues(&self, as_of: DateTime<Utc>) -> Decimal {
        self.monthly_fee * Decimal::from(as_of.month())
    }

    /// Turns expected and paid dues into an assessment.
    #[must_use]
    pub fn outstanding(&self, expected: Decimal, paid: Decimal) -> DebtAssessment {
        let debt = (expected - paid).max(Decimal::ZERO);
        if debt.is_zero() || self.monthly_fee <= Decimal::ZERO {
            return DebtAssessment::settled();
        }
        let months = (debt / self.monthly_fee).ceil().to_u32().unwrap_or(u32::MAX);
        DebtAssessment {
            debt_amount: debt,
            months_overdue: months,
        }
    }
}

#[async_trait]
impl<S: LedgerStore + ?Sized> ArrearsPolicy for LedgerDerivedPolicy<S> {
    fn name(&self) -> &'static str {
        "ledger_derived"
    }

    async fn assess(
        &self,
        community_id: CommunityId,
        resident: &Resident,
        as_of: DateTime<Utc>,
    ) -> Result<DebtAssessment, ArrearsError> {
        // No property, no dues.
        let Some(unit) = resident.primary_unit() else {
            return Ok(DebtAssessment::settled());
        };
        let Some(window) = DateWindow::year_to_date(as_of) else {
            return Ok(DebtAssessment::settled());
        };

        let query = LedgerQuery {
            kind: Some(TransactionKind::Income),
            category: Some(self.dues_category.clone()),
            unit_reference: Some(unit.to_string()),
            window: Some(window),
        };
        let paid = self.store.sum_amounts(community_id, &query).await?;

        Ok(self.outstanding(self.expected_dues(as_of), paid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ResidentRole;
    use crate::ledger::{
        AccountCategory, InMemoryLedgerStore, NewAccount, NewTransaction, TransactionPoster,
    };
    use chrono::TimeZone;
    use fincahub_shared::types::ResidentId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn resident(units: &[&str]) -> Resident {
        Resident {
            id: ResidentId::new(),
            community_id: CommunityId::new(),
            name: "Carmen Ruiz".to_string(),
            email: "carmen@example.com".to_string(),
            role: ResidentRole::Neighbor,
            iban: None,
            property_units: units.iter().map(|u| (*u).to_string()).collect(),
        }
    }

    #[rstest]
    #[case("ab", 97 + 98)]
    #[case("a", 97 + 97)]
    #[case("", 0)]
    fn test_placeholder_hash(#[case] id: &str, #[case] expected: u32) {
        assert_eq!(placeholder_hash(id), expected);
    }

    #[test]
    fn test_placeholder_owes_nothing_when_divisible_by_three() {
        // '0' + '0' = 96, divisible by 3
        assert_eq!(PlaceholderHashPolicy::assess_id("0-0"), DebtAssessment::settled());
    }

    #[test]
    fn test_placeholder_debt_from_months() {
        // '0' + '1' = 97 -> 97 % 6 + 1 = 2 months
        let assessment = PlaceholderHashPolicy::assess_id("0-1");
        assert_eq!(assessment.months_overdue, 2);
        assert_eq!(assessment.debt_amount, dec!(100.00));
    }

    #[test]
    fn test_placeholder_is_stable() {
        let id = ResidentId::new().to_string();
        assert_eq!(PlaceholderHashPolicy::assess_id(&id), PlaceholderHashPolicy::assess_id(&id));
    }

    #[tokio::test]
    async fn test_ledger_derived_counts_unit_payments() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let community = CommunityId::new();
        let account = store
            .create_account(NewAccount {
                community_id: community,
                name: "Banco".to_string(),
                category: AccountCategory::Bank,
                initial_balance: Decimal::ZERO,
            })
            .await
            .unwrap();
        let poster = TransactionPoster::new(Arc::clone(&store));
        let feb = Utc.with_ymd_and_hms(2026, 2, 5, 0, 0, 0).unwrap();
        for (description, amount) in [("Cuota 2B enero", dec!(50)), ("Cuota 2B febrero", dec!(50)), ("Cuota 3A", dec!(50))] {
            poster
                .post(
                    community,
                    NewTransaction::new(account.id, TransactionKind::Income, amount, "Cuotas Ordinarias", description)
                        .on(feb),
                )
                .await
                .unwrap();
        }
        let policy = LedgerDerivedPolicy::new(Arc::clone(&store), dec!(50), "Cuotas Ordinarias");
        let as_of = Utc.with_ymd_and_hms(2026, 5, 20, 0, 0, 0).unwrap();

        let assessment = policy.assess(community, &resident(&["2B"]), as_of).await.unwrap();

        assert_eq!(assessment.debt_amount, dec!(150));
        assert_eq!(assessment.months_overdue, 3);
    }

    #[tokio::test]
    async fn test_ledger_derived_ignores_payments_of_longer_units() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let community = CommunityId::new();
        let account = store
            .create_account(NewAccount {
                community_id: community,
                name: "Banco".to_string(),
                category: AccountCategory::Bank,
                initial_balance: Decimal::ZERO,
            })
            .await
            .unwrap();
        let poster = TransactionPoster::new(Arc::clone(&store));
        for month in 1..=3 {
            let date = Utc.with_ymd_and_hms(2026, month, 5, 0, 0, 0).unwrap();
            poster
                .post(
                    community,
                    NewTransaction::new(account.id, TransactionKind::Income, dec!(50), "Cuotas Ordinarias", "Cuota 11A")
                        .on(date),
                )
                .await
                .unwrap();
        }
        let policy = LedgerDerivedPolicy::new(Arc::clone(&store), dec!(50), "Cuotas Ordinarias");
        let as_of = Utc.with_ymd_and_hms(2026, 3, 20, 0, 0, 0).unwrap();

        let debtor = policy.assess(community, &resident(&["1A"]), as_of).await.unwrap();
        assert_eq!(debtor.debt_amount, dec!(150));
        assert_eq!(debtor.months_overdue, 3);

        let payer = policy.assess(community, &resident(&["11A"]), as_of).await.unwrap();
        assert!(!payer.owes());
    }

    #[tokio::test]
    async fn test_ledger_derived_resident_without_unit_owes_nothing() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let policy = LedgerDerivedPolicy::new(store, dec!(50), "Cuotas Ordinarias");

        let assessment = policy
            .assess(CommunityId::new(), &resident(&[]), Utc::now())
            .await
            .unwrap();

        assert!(!assessment.owes());
    }

    #[test]
    fn test_outstanding_rounds_months_up() {
        let policy = LedgerDerivedPolicy::new(Arc::new(InMemoryLedgerStore::new()), dec!(50), "Cuotas");
        let assessment = policy.outstanding(dec!(200), dec!(125));
        assert_eq!(assessment.debt_amount, dec!(75));
        assert_eq!(assessment.months_overdue, 2);

        assert!(!policy.outstanding(dec!(100), dec!(180)).owes());
    }
}
