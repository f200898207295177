//! Storage port for budgets.

use async_trait::async_trait;
use fincahub_shared::types::CommunityId;

use super::error::BudgetError;
use super::types::{Budget, NewBudget};

/// Persistence for yearly budgets.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Lists the community's budgets, most recent year first.
    async fn list_budgets(&self, community_id: CommunityId) -> Result<Vec<Budget>, BudgetError>;

    /// Creates a budget record.
    async fn create_budget(&self, input: NewBudget) -> Result<Budget, BudgetError>;

    /// Latest created budget for the year, if any.
    async fn find_budget_for_year(
        &self,
        community_id: CommunityId,
        year: i32,
    ) -> Result<Option<Budget>, BudgetError>;
}
