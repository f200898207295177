//! Application configuration management.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Direct-debit collection configuration.
    #[serde(default)]
    pub collection: CollectionConfig,
    /// Arrears estimation configuration.
    #[serde(default)]
    pub arrears: ArrearsConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Maximum number of transactions returned by a listing.
    #[serde(default = "default_transaction_list_limit")]
    pub transaction_list_limit: u64,
    /// Upper bound for a single storage or directory call, in milliseconds.
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

fn default_transaction_list_limit() -> u64 {
    50
}

fn default_operation_timeout_ms() -> u64 {
    5_000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            transaction_list_limit: default_transaction_list_limit(),
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

/// Creditor and document settings for direct-debit batches.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Name of the party initiating the batch (group header).
    #[serde(default = "default_initiating_party_name")]
    pub initiating_party_name: String,
    /// Creditor name.
    #[serde(default = "default_creditor_name")]
    pub creditor_name: String,
    /// Creditor IBAN the collected funds are credited to.
    #[serde(default = "default_creditor_iban")]
    pub creditor_iban: String,
    /// Creditor bank BIC.
    #[serde(default = "default_creditor_bic")]
    pub creditor_bic: String,
    /// Signature date stamped on every mandate reference.
    #[serde(default = "default_mandate_signature_date")]
    pub mandate_signature_date: NaiveDate,
    /// ISO 4217 code of the collected amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Prefix of the generated document filename.
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

fn default_initiating_party_name() -> String {
    "FINCAHUB COMMUNITY".to_string()
}

fn default_creditor_name() -> String {
    "FINCAHUB ADMIN".to_string()
}

fn default_creditor_iban() -> String {
    "ES9800000000000000000000".to_string()
}

fn default_creditor_bic() -> String {
    "TESTBICXXX".to_string()
}

fn default_mandate_signature_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_filename_prefix() -> String {
    "remesa".to_string()
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            initiating_party_name: default_initiating_party_name(),
            creditor_name: default_creditor_name(),
            creditor_iban: default_creditor_iban(),
            creditor_bic: default_creditor_bic(),
            mandate_signature_date: default_mandate_signature_date(),
            currency: default_currency(),
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// Which arrears policy the service runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrearsPolicyKind {
    /// Identifier-hash placeholder, not backed by billing data.
    #[default]
    PlaceholderHash,
    /// Dues owed minus dues paid, read from the ledger.
    LedgerDerived,
}

/// Arrears estimation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ArrearsConfig {
    /// Active policy.
    #[serde(default)]
    pub policy: ArrearsPolicyKind,
    /// Monthly dues per resident.
    #[serde(default = "default_monthly_fee")]
    pub monthly_fee: Decimal,
    /// Transaction category that records dues payments.
    #[serde(default = "default_dues_category")]
    pub dues_category: String,
}

fn default_monthly_fee() -> Decimal {
    Decimal::new(5000, 2)
}

fn default_dues_category() -> String {
    "Cuotas Ordinarias".to_string()
}

impl Default for ArrearsConfig {
    fn default() -> Self {
        Self {
            policy: ArrearsPolicyKind::default(),
            monthly_fee: default_monthly_fee(),
            dues_category: default_dues_category(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FINCAHUB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
