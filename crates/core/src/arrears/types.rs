//! Arrears view types. Derived on demand, never persisted.

use fincahub_shared::types::ResidentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit shown for residents without any associated property.
pub const UNASSIGNED_UNIT: &str = "S/N";

/// Outstanding debt estimated for one resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentDebt {
    /// Resident ID.
    pub id: ResidentId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Primary unit, or [`UNASSIGNED_UNIT`].
    pub unit: String,
    /// Estimated debt, always positive.
    pub debt_amount: Decimal,
    /// Months of dues outstanding.
    pub months_overdue: u32,
}

/// What a policy concluded about one resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DebtAssessment {
    /// Amount owed.
    pub debt_amount: Decimal,
    /// Months of dues outstanding.
    pub months_overdue: u32,
}

impl DebtAssessment {
    /// Nothing owed.
    #[must_use]
    pub const fn settled() -> Self {
        Self {
            debt_amount: Decimal::ZERO,
            months_overdue: 0,
        }
    }

    /// Returns true if the resident owes anything.
    #[must_use]
    pub fn owes(&self) -> bool {
        self.debt_amount > Decimal::ZERO
    }
}
