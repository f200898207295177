//! Repository abstractions for data access.
//!
//! Repositories implement the storage ports of `fincahub-core` on top of
//! `SeaORM`, hiding the database details from the accounting engine.

pub mod directory;
pub mod ledger;

pub use directory::DirectoryRepository;
pub use ledger::LedgerRepository;
