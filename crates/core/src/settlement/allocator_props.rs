//! Property-based tests for the settlement allocator.
//!
//! - Zero expenses give zero quotas for any coefficients
//! - With coefficients summing to 100, quotas sum to the total within one cent per property

use proptest::prelude::*;
use rust_decimal::Decimal;
use fincahub_shared::types::{CommunityId, PropertyId};

use super::allocator::allocate;
use crate::directory::Property;

/// Strategy to generate expense totals (0.00 to 1,000,000.00).
fn total() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate coefficient weights that sum to exactly 100.
///
/// Weights are drawn in thousandths; the last property takes the remainder.
fn balanced_coefficients() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..1_000u32, 1..30).prop_map(|weights| {
        let sum: u64 = weights.iter().map(|w| u64::from(*w)).sum();
        let mut coefficients: Vec<Decimal> = weights
            .iter()
            .map(|w| (Decimal::from(*w) * Decimal::ONE_HUNDRED / Decimal::from(sum)).round_dp(3))
            .collect();
        let assigned: Decimal = coefficients.iter().take(coefficients.len() - 1).copied().sum();
        if let Some(last) = coefficients.last_mut() {
            *last = Decimal::ONE_HUNDRED - assigned;
        }
        coefficients
    })
}

fn properties(coefficients: &[Decimal]) -> Vec<Property> {
    let community_id = CommunityId::new();
    coefficients
        .iter()
        .enumerate()
        .map(|(i, coefficient)| Property {
            id: PropertyId::new(),
            community_id,
            unit: format!("{i}"),
            floor: 0,
            coefficient: *coefficient,
            owners: Vec::new(),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: no expenses, no quotas.
    #[test]
    fn prop_zero_expenses_zero_quotas(coefficients in balanced_coefficients()) {
        let report = allocate(2026, Decimal::ZERO, &properties(&coefficients));
        prop_assert!(report.lines.iter().all(|l| l.quota.is_zero()));
        prop_assert_eq!(report.lines.len(), coefficients.len());
    }

    /// Property: |Σ quotas − total| <= count * 0.01 when coefficients sum to 100.
    #[test]
    fn prop_quotas_sum_to_total(
        total in total(),
        coefficients in balanced_coefficients(),
    ) {
        let report = allocate(2026, total, &properties(&coefficients));
        prop_assert!(report.coefficients_balanced);

        let tolerance = Decimal::new(1, 2) * Decimal::from(coefficients.len());
        prop_assert!(report.rounding_gap().abs() <= tolerance);
    }

    /// Property: every quota has at most two decimals.
    #[test]
    fn prop_quotas_are_cents(
        total in total(),
        coefficients in balanced_coefficients(),
    ) {
        let report = allocate(2026, total, &properties(&coefficients));
        for line in &report.lines {
            prop_assert!(line.quota.scale() <= 2);
        }
    }
}
