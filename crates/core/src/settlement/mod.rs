//! Yearly expense settlement by ownership coefficient.

pub mod allocator;
pub mod error;
pub mod types;

#[cfg(test)]
mod allocator_props;

pub use allocator::{SettlementAllocator, allocate, owner_label, quota};
pub use error::SettlementError;
pub use types::{NO_OWNER, SettlementLine, SettlementReport};
