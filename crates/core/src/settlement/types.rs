//! Settlement report types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Owner name shown for properties nobody owns.
pub const NO_OWNER: &str = "Sin Propietario";

/// Share of the year's expenses charged to one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLine {
    /// Unit label.
    pub unit: String,
    /// Comma-joined owner names, or [`NO_OWNER`].
    pub owner_name: String,
    /// Ownership percentage.
    pub coefficient: Decimal,
    /// `total_expenses * coefficient / 100`, rounded to cents.
    pub quota: Decimal,
}

/// Yearly expense settlement of a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Settled calendar year.
    pub year: i32,
    /// Sum of the year's expenses, unrounded.
    pub total_expenses: Decimal,
    /// One line per property.
    pub lines: Vec<SettlementLine>,
    /// Sum of all coefficients.
    pub coefficient_total: Decimal,
    /// Sum of all quotas.
    pub quota_total: Decimal,
    /// True when the coefficients add up to exactly 100.
    pub coefficients_balanced: bool,
}

impl SettlementReport {
    /// Difference between what the quotas collect and what was spent.
    #[must_use]
    pub fn rounding_gap(&self) -> Decimal {
        self.quota_total - self.total_expenses
    }
}
