//! Yearly budgets and budget-versus-actual variance.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use service::BudgetService;
pub use store::BudgetStore;
pub use types::{Budget, BudgetStatus, NewBudget, VarianceResult, VarianceStatus};
