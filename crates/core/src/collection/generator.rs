//! Direct-debit batch generation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fincahub_shared::types::CommunityId;
use rust_decimal::Decimal;

use super::error::CollectionError;
use super::ids::{BatchIdGenerator, mandate_reference};
use super::pain008;
use super::types::{
    CollectionSettings, DOCUMENT_CONTENT_TYPE, DirectDebitBatch, DirectDebitDocument,
    DirectDebitEntry, Payer,
};
use crate::directory::{Directory, ResidentFilter};

/// Builds pain.008 collection documents for a community's payers.
pub struct DirectDebitBatchGenerator<D: ?Sized> {
    directory: Arc<D>,
    settings: CollectionSettings,
    ids: BatchIdGenerator,
}

impl<D: ?Sized> Clone for DirectDebitBatchGenerator<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            settings: self.settings.clone(),
            ids: self.ids,
        }
    }
}

impl<D: Directory + ?Sized> DirectDebitBatchGenerator<D> {
    /// Creates a generator.
    #[must_use]
    pub fn new(directory: Arc<D>, settings: CollectionSettings) -> Self {
        Self {
            directory,
            settings,
            ids: BatchIdGenerator::new(),
        }
    }

    /// Replaces the identifier generator.
    #[must_use]
    pub fn with_ids(mut self, ids: BatchIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Collection settings in use.
    #[must_use]
    pub fn settings(&self) -> &CollectionSettings {
        &self.settings
    }

    /// Charges `amount_per_payer` to every resident with a registered IBAN.
    ///
    /// # Errors
    ///
    /// Returns `EmptyConcept` or `InvalidAmount` before reading the directory,
    /// `NoPayers` if nobody can be charged, or the directory/XML error.
    pub async fn generate_batch(
        &self,
        community_id: CommunityId,
        concept: &str,
        amount_per_payer: Decimal,
    ) -> Result<DirectDebitDocument, CollectionError> {
        validate_request(concept, amount_per_payer)?;

        let residents = self
            .directory
            .list_residents(community_id, &ResidentFilter::with_iban())
            .await?;
        let payers: Vec<Payer> = residents
            .iter()
            .filter_map(|r| {
                r.registered_iban().map(|iban| Payer {
                    name: r.name.clone(),
                    iban: iban.to_string(),
                })
            })
            .collect();

        self.build_document(concept.trim(), amount_per_payer, payers, Utc::now())
    }

    /// Assembles and renders a batch for an explicit payer list.
    ///
    /// # Errors
    ///
    /// Returns `NoPayers` for an empty list, or the XML error.
    pub fn build_document(
        &self,
        concept: &str,
        amount_per_payer: Decimal,
        payers: Vec<Payer>,
        now: DateTime<Utc>,
    ) -> Result<DirectDebitDocument, CollectionError> {
        if payers.is_empty() {
            return Err(CollectionError::NoPayers);
        }

        let entries = payers
            .into_iter()
            .enumerate()
            .map(|(index, payer)| DirectDebitEntry {
                end_to_end_id: self.ids.end_to_end_id(now),
                mandate_id: mandate_reference(index),
                payer,
                amount: amount_per_payer,
            })
            .collect();

        let batch = DirectDebitBatch {
            message_id: self.ids.message_id(now),
            payment_info_id: self.ids.payment_info_id(now),
            created_at: now,
            collection_date: now.date_naive(),
            creditor: self.settings.creditor.clone(),
            mandate_signature_date: self.settings.mandate_signature_date,
            currency: self.settings.currency,
            concept: concept.to_string(),
            entries,
        };
        let bytes = pain008::render(&batch)?;

        Ok(DirectDebitDocument {
            filename: format!(
                "{}_{}.xml",
                self.settings.filename_prefix,
                now.timestamp_millis()
            ),
            content_type: DOCUMENT_CONTENT_TYPE,
            batch,
            bytes,
        })
    }
}

/// Checks the caller-supplied concept and amount.
///
/// # Errors
///
/// Returns `EmptyConcept` for blank text and `InvalidAmount` unless the amount is positive.
pub fn validate_request(concept: &str, amount_per_payer: Decimal) -> Result<(), CollectionError> {
    if concept.trim().is_empty() {
        return Err(CollectionError::EmptyConcept);
    }
    if amount_per_payer <= Decimal::ZERO {
        return Err(CollectionError::InvalidAmount(amount_per_payer));
    }
    Ok(())
}
