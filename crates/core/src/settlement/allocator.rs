//! Coefficient-weighted expense allocation.
//!
//! The year's expenses are summed without rounding; each property's quota
//! is rounded to cents once, at the end. Coefficients are taken as stored:
//! when they do not add up to 100 the quotas will not add up to the total,
//! and the report flags it instead of normalising.

use std::sync::Arc;

use fincahub_shared::types::CommunityId;
use fincahub_shared::types::money::round_cents;
use rust_decimal::Decimal;
use tracing::warn;

use super::error::SettlementError;
use super::types::{NO_OWNER, SettlementLine, SettlementReport};
use crate::directory::{Directory, Property};
use crate::ledger::{DateWindow, LedgerQuery, LedgerStore};

/// Computes yearly settlements from the ledger and the directory.
pub struct SettlementAllocator<S: ?Sized, D: ?Sized> {
    store: Arc<S>,
    directory: Arc<D>,
}

impl<S: ?Sized, D: ?Sized> Clone for SettlementAllocator<S, D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            directory: Arc::clone(&self.directory),
        }
    }
}

impl<S, D> SettlementAllocator<S, D>
where
    S: LedgerStore + ?Sized,
    D: Directory + ?Sized,
{
    /// Creates an allocator.
    #[must_use]
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self { store, directory }
    }

    /// Settles `year` for the community.
    ///
    /// # Errors
    ///
    /// Returns `InvalidYear` if the year has no calendar window, or the
    /// ledger/directory read error.
    pub async fn compute_settlement(
        &self,
        community_id: CommunityId,
        year: i32,
    ) -> Result<SettlementReport, SettlementError> {
        let window = DateWindow::calendar_year(year).ok_or(SettlementError::InvalidYear(year))?;
        let total_expenses = self
            .store
            .sum_amounts(community_id, &LedgerQuery::expenses_in(window))
            .await?;
        let properties = self.directory.list_properties(community_id).await?;

        let report = allocate(year, total_expenses, &properties);
        if !report.coefficients_balanced {
            warn!(
                %community_id,
                year,
                coefficient_total = %report.coefficient_total,
                rounding_gap = %report.rounding_gap(),
                "Property coefficients do not sum to 100"
            );
        }
        Ok(report)
    }
}

/// Quota of one property: `total * coefficient / 100`, rounded to cents.
#[must_use]
pub fn quota(total_expenses: Decimal, coefficient: Decimal) -> Decimal {
    round_cents(total_expenses * coefficient / Decimal::ONE_HUNDRED)
}

/// Owner names joined with ", ", or [`NO_OWNER`].
#[must_use]
pub fn owner_label(property: &Property) -> String {
    if property.owners.is_empty() {
        return NO_OWNER.to_string();
    }
    property
        .owners
        .iter()
        .map(|o| o.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Distributes `total_expenses` over every property, owned or not.
#[must_use]
pub fn allocate(year: i32, total_expenses: Decimal, properties: &[Property]) -> SettlementReport {
    let lines: Vec<SettlementLine> = properties
        .iter()
        .map(|property| SettlementLine {
            unit: property.unit.clone(),
            owner_name: owner_label(property),
            coefficient: property.coefficient,
            quota: quota(total_expenses, property.coefficient),
        })
        .collect();

    let coefficient_total: Decimal = lines.iter().map(|l| l.coefficient).sum();
    let quota_total: Decimal = lines.iter().map(|l| l.quota).sum();

    SettlementReport {
        year,
        total_expenses,
        lines,
        coefficient_total,
        quota_total,
        coefficients_balanced: coefficient_total == Decimal::ONE_HUNDRED,
    }
}
