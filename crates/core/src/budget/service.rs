//! Budget service for variance calculation and validation.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{Budget, BudgetStatus, NewBudget, VarianceResult, VarianceStatus};

/// Earliest accepted budget year.
const MIN_YEAR: i32 = 1900;

/// Latest accepted budget year.
const MAX_YEAR: i32 = 9999;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Calculate variance between budgeted and actual expenses.
    ///
    /// variance = budgeted - actual
    ///   - Positive variance (under budget) is favorable
    ///   - Negative variance (over budget) is unfavorable
    #[must_use]
    pub fn calculate_variance(budgeted: Decimal, actual: Decimal) -> VarianceResult {
        let variance = budgeted - actual;

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::Favorable,
            std::cmp::Ordering::Less => VarianceStatus::Unfavorable,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        let variance_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (variance / budgeted * Decimal::ONE_HUNDRED).round_dp(2)
        };

        let utilization_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (actual / budgeted * Decimal::ONE_HUNDRED).round_dp(2)
        };

        VarianceResult {
            budgeted,
            actual,
            variance,
            variance_percent,
            utilization_percent,
            status,
        }
    }

    /// Compares a budget with the year's actual expenses.
    #[must_use]
    pub fn status(budget: &Budget, actual_expenses: Decimal) -> BudgetStatus {
        BudgetStatus {
            year: budget.year,
            budget_id: budget.id,
            variance: Self::calculate_variance(budget.total_amount, actual_expenses),
        }
    }

    /// Validate budget creation.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` if the amount is negative.
    /// Returns `BudgetError::InvalidYear` if the year is out of range.
    pub fn validate_new_budget(input: &NewBudget) -> Result<(), BudgetError> {
        if input.total_amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(input.total_amount));
        }

        if !(MIN_YEAR..=MAX_YEAR).contains(&input.year) {
            return Err(BudgetError::InvalidYear(input.year));
        }

        Ok(())
    }
}
