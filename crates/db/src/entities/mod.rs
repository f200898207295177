//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod accounts;
pub mod budgets;
pub mod communities;
pub mod properties;
pub mod property_owners;
pub mod residents;
pub mod sea_orm_active_enums;
pub mod transactions;
