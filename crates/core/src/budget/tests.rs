//! Property-based tests for budget module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::BudgetError;
use super::service::BudgetService;
use super::types::{NewBudget, VarianceStatus};
use fincahub_shared::types::CommunityId;

proptest! {
    /// variance = budgeted - actual, favorable if variance > 0
    #[test]
    fn test_variance_calculation(
        budgeted in 0i64..1_000_000_000,
        actual in 0i64..1_000_000_000,
    ) {
        let budgeted = Decimal::from(budgeted);
        let actual = Decimal::from(actual);

        let result = BudgetService::calculate_variance(budgeted, actual);

        prop_assert_eq!(result.variance, budgeted - actual);

        if result.variance > Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Favorable);
        } else if result.variance < Decimal::ZERO {
            prop_assert_eq!(result.status, VarianceStatus::Unfavorable);
        } else {
            prop_assert_eq!(result.status, VarianceStatus::OnBudget);
        }
    }

    /// Utilization and variance percentages always add up to 100 for a non-zero budget.
    #[test]
    fn test_percentages_are_complementary(
        budgeted in 1i64..1_000_000,
        actual in 0i64..1_000_000,
    ) {
        let result = BudgetService::calculate_variance(Decimal::from(budgeted), Decimal::from(actual));
        let total = result.utilization_percent + result.variance_percent;
        prop_assert!((total - dec!(100)).abs() <= dec!(0.01));
    }

    /// Negative budget totals are always rejected.
    #[test]
    fn test_negative_budget_rejected(cents in 1i64..100_000_000) {
        let input = NewBudget {
            community_id: CommunityId::new(),
            year: 2026,
            total_amount: Decimal::new(-cents, 2),
        };
        prop_assert!(matches!(
            BudgetService::validate_new_budget(&input),
            Err(BudgetError::NegativeAmount(_))
        ));
    }
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_expense_variance_favorable() {
        let result = BudgetService::calculate_variance(dec!(50000), dec!(850));

        assert_eq!(result.variance, dec!(49150));
        assert_eq!(result.utilization_percent, dec!(1.70));
        assert_eq!(result.variance_percent, dec!(98.30));
        assert_eq!(result.status, VarianceStatus::Favorable);
    }

    #[test]
    fn test_expense_variance_unfavorable() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(1200));

        assert_eq!(result.variance, dec!(-200));
        assert_eq!(result.variance_percent, dec!(-20.00));
        assert_eq!(result.utilization_percent, dec!(120.00));
        assert_eq!(result.status, VarianceStatus::Unfavorable);
    }

    #[test]
    fn test_variance_on_budget() {
        let result = BudgetService::calculate_variance(dec!(1000), dec!(1000));
        assert_eq!(result.status, VarianceStatus::OnBudget);
    }

    #[test]
    fn test_zero_budget_percentages() {
        let result = BudgetService::calculate_variance(dec!(0), dec!(500));
        assert_eq!(result.utilization_percent, dec!(0));
        assert_eq!(result.variance_percent, dec!(0));
    }

    #[test]
    fn test_year_range() {
        let mut input = NewBudget {
            community_id: CommunityId::new(),
            year: 1899,
            total_amount: dec!(100),
        };
        assert!(matches!(
            BudgetService::validate_new_budget(&input),
            Err(BudgetError::InvalidYear(1899))
        ));

        input.year = 2026;
        assert!(BudgetService::validate_new_budget(&input).is_ok());
    }
}
