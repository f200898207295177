//! Budget data types.

use chrono::{DateTime, Utc};
use fincahub_shared::types::{BudgetId, CommunityId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A yearly budget of a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning community.
    pub community_id: CommunityId,
    /// Calendar year the budget covers.
    pub year: i32,
    /// Total amount budgeted for the year's expenses.
    pub total_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct NewBudget {
    /// Owning community.
    pub community_id: CommunityId,
    /// Calendar year.
    pub year: i32,
    /// Total amount, must not be negative.
    pub total_amount: Decimal,
}

/// Result of a variance calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// Variance amount (`budgeted - actual`).
    pub variance: Decimal,
    /// Variance percentage of the budget.
    pub variance_percent: Decimal,
    /// Utilization percentage of the budget.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Spent less than budgeted.
    Favorable,
    /// Spent more than budgeted.
    Unfavorable,
    /// Spent exactly the budget.
    OnBudget,
}

/// Budget versus actual expenses for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    /// Calendar year.
    pub year: i32,
    /// The budget the figures are compared against.
    pub budget_id: BudgetId,
    /// Variance figures.
    #[serde(flatten)]
    pub variance: VarianceResult,
}
