//! Ledger domain types for accounts and transactions.
//!
//! A community keeps a handful of accounts (bank, cash) whose balance is the
//! signed sum of an append-only list of income and expense transactions.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use fincahub_shared::types::{AccountId, CommunityId, TransactionId};

use super::error::LedgerError;

/// Category label used for the transaction that carries an account's opening balance.
pub const OPENING_BALANCE_CATEGORY: &str = "Opening balance";

/// Kind of account a community holds money in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountCategory {
    /// Petty cash.
    Cash,
    /// Bank account.
    Bank,
    /// Anything else (deposits, escrow).
    Other,
}

impl AccountCategory {
    /// Returns the canonical upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Bank => "BANK",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "BANK" => Ok(Self::Bank),
            "OTHER" => Ok(Self::Other),
            _ => Err(LedgerError::UnknownAccountCategory(s.to_string())),
        }
    }
}

/// Signed kind of a transaction.
///
/// - `Income` increases the account balance
/// - `Expense` decreases the account balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Returns the canonical upper-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Balance change produced by a transaction of this kind.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(LedgerError::UnknownTransactionKind(s.to_string())),
        }
    }
}

/// A community account with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning community.
    pub community_id: CommunityId,
    /// Display name.
    pub name: String,
    /// Cash, bank, or other.
    pub category: AccountCategory,
    /// Signed sum of every transaction posted to this account.
    pub balance: Decimal,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// An immutable ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Account the transaction is posted to.
    pub account_id: AccountId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Free-text category label (e.g. "Mantenimiento").
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// When the movement happened.
    pub date: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Balance change this transaction applies to its account.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Owning community.
    pub community_id: CommunityId,
    /// Display name.
    pub name: String,
    /// Cash, bank, or other.
    pub category: AccountCategory,
    /// Starting balance, recorded as an opening transaction when non-zero.
    pub initial_balance: Decimal,
}

/// Input for posting a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Target account.
    pub account_id: AccountId,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Amount, must not be negative.
    pub amount: Decimal,
    /// Free-text category label.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Occurrence date; defaults to the posting time.
    pub date: Option<DateTime<Utc>>,
}

impl NewTransaction {
    /// Creates an input dated at posting time.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date: None,
        }
    }

    /// Sets an explicit occurrence date.
    #[must_use]
    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// A fully formed transaction plus the balance change it carries.
///
/// Stores apply the insert and the balance increment as one atomic unit.
/// The delta is always the transaction's signed amount; there is no other
/// way to build one.
#[derive(Debug, Clone)]
pub struct Posting {
    transaction: Transaction,
    delta: Decimal,
}

impl Posting {
    /// Builds a posting whose delta is derived from the transaction kind.
    #[must_use]
    pub fn from_transaction(transaction: Transaction) -> Self {
        let delta = transaction.signed_amount();
        Self { transaction, delta }
    }

    /// The record to append.
    #[must_use]
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Signed balance change for the transaction's account.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.delta
    }

    /// Consumes the posting, keeping only the record.
    #[must_use]
    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }

    /// Checks the amount before a store applies the posting.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NegativeAmount` if `amount < 0`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let amount = self.transaction.amount;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(LedgerError::NegativeAmount(amount));
        }
        Ok(())
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only transactions of this account.
    pub account_id: Option<AccountId>,
    /// Only income or only expense.
    pub kind: Option<TransactionKind>,
    /// Exact category label.
    pub category: Option<String>,
    /// Maximum number of rows, clamped by the store's own cap.
    pub limit: Option<u64>,
}

impl TransactionFilter {
    /// Effective row limit given a hard cap, never below one row.
    #[must_use]
    pub fn effective_limit(&self, cap: u64) -> u64 {
        self.limit.map_or(cap, |limit| limit.min(cap)).max(1)
    }

    /// Returns true if the transaction passes the account, kind and category filters.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.account_id.is_none_or(|id| transaction.account_id == id)
            && self.kind.is_none_or(|kind| transaction.kind == kind)
            && self
                .category
                .as_deref()
                .is_none_or(|category| transaction.category == category)
    }
}

/// Inclusive time window over transaction occurrence dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First instant included.
    pub start: DateTime<Utc>,
    /// Last instant included.
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Creates a window; `None` if `end` precedes `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// `[Jan 1 00:00:00.000, Dec 31 23:59:59.999]` of `year`, in UTC.
    #[must_use]
    pub fn calendar_year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_milli_opt(0, 0, 0, 0)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?.and_hms_milli_opt(23, 59, 59, 999)?;
        Self::new(start.and_utc(), end.and_utc())
    }

    /// From Jan 1 of the instant's year up to the instant.
    #[must_use]
    pub fn year_to_date(as_of: DateTime<Utc>) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(as_of.year(), 1, 1)?.and_hms_opt(0, 0, 0)?;
        Self::new(start.and_utc(), as_of)
    }

    /// Returns true if the instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Aggregate query over a community's transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    /// Only income or only expense.
    pub kind: Option<TransactionKind>,
    /// Exact category label.
    pub category: Option<String>,
    /// Unit reference the description must mention as a whole token.
    pub unit_reference: Option<String>,
    /// Occurrence-date window.
    pub window: Option<DateWindow>,
}

impl LedgerQuery {
    /// All expenses inside a window.
    #[must_use]
    pub fn expenses_in(window: DateWindow) -> Self {
        Self {
            kind: Some(TransactionKind::Expense),
            window: Some(window),
            ..Self::default()
        }
    }

    /// Returns true if the transaction is selected by this query.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
            && self
                .category
                .as_deref()
                .is_none_or(|category| transaction.category == category)
            && self
                .unit_reference
                .as_deref()
                .is_none_or(|unit| mentions_unit(&transaction.description, unit))
            && self
                .window
                .is_none_or(|window| window.contains(transaction.date))
    }
}

/// Returns true if `unit` appears in `description` as a whole token.
///
/// A match must not be preceded or followed by a letter or digit, so "1A"
/// is found in "Cuota 1A-marzo" but not in "Cuota 11A" or "Cuota 1AB".
#[must_use]
pub fn mentions_unit(description: &str, unit: &str) -> bool {
    if unit.is_empty() {
        return false;
    }
    description.match_indices(unit).any(|(start, _)| {
        let before = description[..start].chars().next_back();
        let after = description[start + unit.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Sum of all account balances of a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Total across accounts.
    pub total_balance: Decimal,
    /// Number of accounts summed.
    pub account_count: usize,
}

impl BalanceSummary {
    /// Sums a list of accounts.
    #[must_use]
    pub fn from_accounts(accounts: &[Account]) -> Self {
        Self {
            total_balance: accounts.iter().map(|a| a.balance).sum(),
            account_count: accounts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn make_transaction(kind: TransactionKind, amount: Decimal, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            account_id: AccountId::new(),
            kind,
            amount,
            category: "Mantenimiento".to_string(),
            description: "Reparacion ascensor 3A".to_string(),
            date,
            created_at: date,
        }
    }

    #[rstest]
    #[case("INCOME", TransactionKind::Income)]
    #[case("income", TransactionKind::Income)]
    #[case(" Expense ", TransactionKind::Expense)]
    fn test_transaction_kind_from_str(#[case] raw: &str, #[case] expected: TransactionKind) {
        assert_eq!(TransactionKind::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_unknown_transaction_kind_is_rejected() {
        let err = TransactionKind::from_str("REFUND").unwrap_err();
        assert!(matches!(err, LedgerError::UnknownTransactionKind(ref s) if s == "REFUND"));
    }

    #[rstest]
    #[case("CASH", AccountCategory::Cash)]
    #[case("bank", AccountCategory::Bank)]
    #[case("Other", AccountCategory::Other)]
    fn test_account_category_from_str(#[case] raw: &str, #[case] expected: AccountCategory) {
        assert_eq!(AccountCategory::from_str(raw).unwrap(), expected);
        assert_eq!(expected.to_string(), raw.to_uppercase());
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(TransactionKind::Income.signed(dec!(1500)), dec!(1500));
        assert_eq!(TransactionKind::Expense.signed(dec!(850)), dec!(-850));
    }

    #[test]
    fn test_kind_serializes_upper_case() {
        let json = serde_json::to_string(&TransactionKind::Expense).unwrap();
        assert_eq!(json, "\"EXPENSE\"");
    }

    #[test]
    fn test_calendar_year_bounds_are_inclusive() {
        let window = DateWindow::calendar_year(2026).unwrap();
        let first = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let last = window.end;
        assert!(window.contains(first));
        assert!(window.contains(last));
        assert_eq!(last.timestamp_subsec_millis(), 999);
        assert!(!window.contains(last + chrono::Duration::milliseconds(1)));
        assert!(!window.contains(first - chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_year_to_date_window() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 15, 10, 0, 0).unwrap();
        let window = DateWindow::year_to_date(as_of).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, as_of);
    }

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let a = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert!(DateWindow::new(a, b).is_none());
    }

    #[test]
    fn test_filter_limit_is_capped() {
        let filter = TransactionFilter {
            limit: Some(500),
            ..TransactionFilter::default()
        };
        assert_eq!(filter.effective_limit(50), 50);
        assert_eq!(TransactionFilter::default().effective_limit(50), 50);

        let small = TransactionFilter {
            limit: Some(10),
            ..TransactionFilter::default()
        };
        assert_eq!(small.effective_limit(50), 10);
    }

    #[test]
    fn test_filter_limit_never_drops_to_zero() {
        let zero = TransactionFilter {
            limit: Some(0),
            ..TransactionFilter::default()
        };
        assert_eq!(zero.effective_limit(50), 1);
        assert_eq!(TransactionFilter::default().effective_limit(0), 1);
    }

    #[rstest]
    #[case("Cuota 1A", "1A", true)]
    #[case("Cuota 1A-marzo", "1A", true)]
    #[case("1A enero", "1A", true)]
    #[case("Cuota 11A", "1A", false)]
    #[case("Cuota 21A", "1A", false)]
    #[case("Cuota 1AB", "1A", false)]
    #[case("Cuota 11A y 1A", "1A", true)]
    #[case("Garaje 4 marzo", "Garaje 4", true)]
    #[case("Cuota 1A", "", false)]
    fn test_mentions_unit(#[case] description: &str, #[case] unit: &str, #[case] expected: bool) {
        assert_eq!(mentions_unit(description, unit), expected);
    }

    #[test]
    fn test_posting_rejects_negative_amount() {
        let date = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let mut tx = make_transaction(TransactionKind::Income, dec!(10), date);
        tx.amount = dec!(-10);

        let posting = Posting::from_transaction(tx);

        assert!(matches!(posting.validate(), Err(LedgerError::NegativeAmount(a)) if a == dec!(-10)));
        assert_eq!(posting.delta(), posting.transaction().signed_amount());
    }

    #[test]
    fn test_query_matches_window_and_description() {
        let date = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        let tx = make_transaction(TransactionKind::Expense, dec!(850), date);

        let window = DateWindow::calendar_year(2026).unwrap();
        assert!(LedgerQuery::expenses_in(window).matches(&tx));

        let other_year = DateWindow::calendar_year(2025).unwrap();
        assert!(!LedgerQuery::expenses_in(other_year).matches(&tx));

        let by_unit = LedgerQuery {
            unit_reference: Some("3A".to_string()),
            ..LedgerQuery::default()
        };
        assert!(by_unit.matches(&tx));

        let income_only = LedgerQuery {
            kind: Some(TransactionKind::Income),
            ..LedgerQuery::default()
        };
        assert!(!income_only.matches(&tx));
    }
}
