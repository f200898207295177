//! Arrears estimation.
//!
//! The estimator walks the community's neighbors and asks a pluggable
//! [`ArrearsPolicy`] how much each one owes.

pub mod error;
pub mod estimator;
pub mod policy;
pub mod types;

pub use error::ArrearsError;
pub use estimator::ArrearsEstimator;
pub use policy::{
    ArrearsPolicy, LedgerDerivedPolicy, PLACEHOLDER_MONTHLY_FEE, PlaceholderHashPolicy,
    placeholder_hash,
};
pub use types::{DebtAssessment, ResidentDebt, UNASSIGNED_UNIT};
