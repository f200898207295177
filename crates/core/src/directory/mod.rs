//! Community directory: residents and properties.
//!
//! The ledger does not own these records; settlement, arrears and direct
//! debit read them through the [`Directory`] port.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::DirectoryError;
pub use memory::InMemoryDirectory;
pub use store::Directory;
pub use types::{
    NewProperty, NewResident, Owner, Property, Resident, ResidentFilter, ResidentRole,
};
