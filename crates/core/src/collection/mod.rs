//! SEPA direct-debit collection.
//!
//! - `generator` picks the payers and assembles the batch
//! - `pain008` serializes it as an ISO 20022 pain.008.001.02 document
//! - `ids` issues message, payment and end-to-end identifiers

pub mod error;
pub mod generator;
pub mod ids;
pub mod pain008;
pub mod types;

pub use error::CollectionError;
pub use generator::{DirectDebitBatchGenerator, validate_request};
pub use ids::{BatchIdGenerator, mandate_reference};
pub use types::{
    CollectionSettings, CreditorInfo, DOCUMENT_CONTENT_TYPE, DirectDebitBatch,
    DirectDebitDocument, DirectDebitEntry, Payer,
};
