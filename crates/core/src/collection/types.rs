//! Direct-debit batch types.

use chrono::{DateTime, NaiveDate, Utc};
use fincahub_shared::config::CollectionConfig;
use fincahub_shared::types::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CollectionError;

/// MIME type of generated documents.
pub const DOCUMENT_CONTENT_TYPE: &str = "application/xml";

/// The collecting party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditorInfo {
    /// Name in the group header (`InitgPty/Nm`).
    pub initiating_party_name: String,
    /// Creditor name.
    pub name: String,
    /// Creditor account.
    pub iban: String,
    /// Creditor bank.
    pub bic: String,
}

/// Fixed parameters of every batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSettings {
    /// Who collects.
    pub creditor: CreditorInfo,
    /// Signature date stamped on every mandate.
    pub mandate_signature_date: NaiveDate,
    /// Instructed currency.
    pub currency: Currency,
    /// Filename prefix of generated documents.
    pub filename_prefix: String,
}

impl CollectionSettings {
    /// Builds settings from configuration.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Settings` for an unknown currency or a blank
    /// creditor field.
    pub fn from_config(config: &CollectionConfig) -> Result<Self, CollectionError> {
        let currency: Currency = config.currency.parse().map_err(CollectionError::Settings)?;

        for (field, value) in [
            ("creditor_name", &config.creditor_name),
            ("creditor_iban", &config.creditor_iban),
            ("creditor_bic", &config.creditor_bic),
        ] {
            if value.trim().is_empty() {
                return Err(CollectionError::Settings(format!("{field} is required")));
            }
        }

        Ok(Self {
            creditor: CreditorInfo {
                initiating_party_name: config.initiating_party_name.clone(),
                name: config.creditor_name.clone(),
                iban: config.creditor_iban.clone(),
                bic: config.creditor_bic.clone(),
            },
            mandate_signature_date: config.mandate_signature_date,
            currency,
            filename_prefix: config.filename_prefix.clone(),
        })
    }
}

/// A resident that will be charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    /// Debtor name.
    pub name: String,
    /// Debtor account.
    pub iban: String,
}

/// One collection instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDebitEntry {
    /// Unique end-to-end identifier.
    pub end_to_end_id: String,
    /// Mandate reference.
    pub mandate_id: String,
    /// Debtor.
    pub payer: Payer,
    /// Amount collected.
    pub amount: Decimal,
}

/// A complete direct-debit batch, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDebitBatch {
    /// Message identifier.
    pub message_id: String,
    /// Payment-information identifier.
    pub payment_info_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Requested collection date.
    pub collection_date: NaiveDate,
    /// Who collects.
    pub creditor: CreditorInfo,
    /// Signature date of the mandates.
    pub mandate_signature_date: NaiveDate,
    /// Instructed currency.
    pub currency: Currency,
    /// Shared remittance text.
    pub concept: String,
    /// Per-payer instructions.
    pub entries: Vec<DirectDebitEntry>,
}

impl DirectDebitBatch {
    /// Number of instructions.
    #[must_use]
    pub fn number_of_transactions(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all instructed amounts.
    #[must_use]
    pub fn control_sum(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// A rendered batch with its download metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDebitDocument {
    /// Suggested filename, embedding the generation time.
    pub filename: String,
    /// MIME type.
    pub content_type: &'static str,
    /// The structured batch.
    pub batch: DirectDebitBatch,
    /// UTF-8 document bytes.
    pub bytes: Vec<u8>,
}

impl DirectDebitDocument {
    /// Document text.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not UTF-8.
    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settings_from_default_config() {
        let settings = CollectionSettings::from_config(&CollectionConfig::default()).unwrap();
        assert_eq!(settings.currency, Currency::Eur);
        assert_eq!(settings.creditor.bic, "TESTBICXXX");
        assert_eq!(settings.filename_prefix, "remesa");
    }

    #[test]
    fn test_settings_reject_unknown_currency() {
        let config = CollectionConfig {
            currency: "XYZ".to_string(),
            ..CollectionConfig::default()
        };
        assert!(matches!(
            CollectionSettings::from_config(&config),
            Err(CollectionError::Settings(_))
        ));
    }

    #[test]
    fn test_settings_reject_blank_creditor() {
        let config = CollectionConfig {
            creditor_iban: " ".to_string(),
            ..CollectionConfig::default()
        };
        assert!(CollectionSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_control_sum() {
        let settings = CollectionSettings::from_config(&CollectionConfig::default()).unwrap();
        let entry = |amount| DirectDebitEntry {
            end_to_end_id: "TX".to_string(),
            mandate_id: "MANDATE-0".to_string(),
            payer: Payer {
                name: "Ana".to_string(),
                iban: "ES00".to_string(),
            },
            amount,
        };
        let batch = DirectDebitBatch {
            message_id: "MSG".to_string(),
            payment_info_id: "PMT".to_string(),
            created_at: Utc::now(),
            collection_date: Utc::now().date_naive(),
            creditor: settings.creditor,
            mandate_signature_date: settings.mandate_signature_date,
            currency: settings.currency,
            concept: "Cuota".to_string(),
            entries: vec![entry(dec!(50)), entry(dec!(25.5))],
        };
        assert_eq!(batch.number_of_transactions(), 2);
        assert_eq!(batch.control_sum(), dec!(75.5));
    }
}
