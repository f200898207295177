//! Arrears estimation over the community's neighbors.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fincahub_shared::types::CommunityId;

use super::error::ArrearsError;
use super::policy::ArrearsPolicy;
use super::types::{ResidentDebt, UNASSIGNED_UNIT};
use crate::directory::{Directory, ResidentFilter, ResidentRole};

/// Lists neighbors who owe money according to the configured policy.
pub struct ArrearsEstimator<D: ?Sized, P: ?Sized> {
    directory: Arc<D>,
    policy: Arc<P>,
}

impl<D: ?Sized, P: ?Sized> Clone for ArrearsEstimator<D, P> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            policy: Arc::clone(&self.policy),
        }
    }
}

impl<D, P> ArrearsEstimator<D, P>
where
    D: Directory + ?Sized,
    P: ArrearsPolicy + ?Sized,
{
    /// Creates an estimator.
    #[must_use]
    pub fn new(directory: Arc<D>, policy: Arc<P>) -> Self {
        Self { directory, policy }
    }

    /// Name of the active policy.
    #[must_use]
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Neighbors with a positive estimated debt, in directory order.
    ///
    /// # Errors
    ///
    /// Returns `ArrearsError` if the directory or the ledger cannot be read.
    pub async fn estimate(
        &self,
        community_id: CommunityId,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<ResidentDebt>, ArrearsError> {
        let neighbors = self
            .directory
            .list_residents(community_id, &ResidentFilter::role(ResidentRole::Neighbor))
            .await?;

        let mut debtors = Vec::new();
        for resident in neighbors {
            let assessment = self.policy.assess(community_id, &resident, as_of).await?;
            if !assessment.owes() {
                continue;
            }
            debtors.push(ResidentDebt {
                id: resident.id,
                unit: resident
                    .primary_unit()
                    .unwrap_or(UNASSIGNED_UNIT)
                    .to_string(),
                name: resident.name,
                email: resident.email,
                debt_amount: assessment.debt_amount,
                months_overdue: assessment.months_overdue,
            });
        }
        Ok(debtors)
    }
}
