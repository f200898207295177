//! Core business logic for FincaHub community accounting.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage and the resident directory are reached through async traits; in-memory
//! implementations are provided for tests and demos.
//!
//! # Modules
//!
//! - `ledger` - Accounts, transactions and atomic balance posting
//! - `budget` - Yearly budgets and variance against actual expenses
//! - `directory` - Residents and properties read from the community directory
//! - `settlement` - Yearly expense allocation by ownership coefficient
//! - `arrears` - Outstanding-dues estimation behind a pluggable policy
//! - `collection` - SEPA direct-debit batches (pain.008)
//! - `service` - The facade callers use

pub mod arrears;
pub mod budget;
pub mod collection;
pub mod directory;
pub mod ledger;
pub mod service;
pub mod settlement;

pub use service::{AccountingService, ServiceOptions};
