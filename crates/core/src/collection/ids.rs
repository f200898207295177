//! Batch identifier generation.
//!
//! Identifiers read `{PREFIX}-{unix-millis}-{node:04X}-{seq:06}`. The node is
//! random per generator and the sequence is shared by the whole process, so
//! two identifiers only collide if a million are drawn by one node within
//! the same millisecond. The longest form is 29 characters, inside the
//! 35-character limit of ISO 20022 `Max35Text`.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

/// Message identifier prefix.
pub const MESSAGE_PREFIX: &str = "MSG";
/// Payment-information identifier prefix.
pub const PAYMENT_INFO_PREFIX: &str = "PMT";
/// End-to-end identifier prefix.
pub const END_TO_END_PREFIX: &str = "TX";

const SEQUENCE_MODULUS: u64 = 1_000_000;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Produces unique batch, payment and end-to-end identifiers.
#[derive(Debug, Clone, Copy)]
pub struct BatchIdGenerator {
    node: u16,
}

impl Default for BatchIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchIdGenerator {
    /// Creates a generator with a random node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            node: rand::random(),
        }
    }

    /// Creates a generator with a fixed node.
    #[must_use]
    pub const fn with_node(node: u16) -> Self {
        Self { node }
    }

    /// Next identifier with the given prefix.
    #[must_use]
    pub fn next(&self, prefix: &str, now: DateTime<Utc>) -> String {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) % SEQUENCE_MODULUS;
        format!(
            "{prefix}-{millis}-{node:04X}-{seq:06}",
            millis = now.timestamp_millis(),
            node = self.node,
        )
    }

    /// Next message identifier.
    #[must_use]
    pub fn message_id(&self, now: DateTime<Utc>) -> String {
        self.next(MESSAGE_PREFIX, now)
    }

    /// Next payment-information identifier.
    #[must_use]
    pub fn payment_info_id(&self, now: DateTime<Utc>) -> String {
        self.next(PAYMENT_INFO_PREFIX, now)
    }

    /// Next end-to-end identifier.
    #[must_use]
    pub fn end_to_end_id(&self, now: DateTime<Utc>) -> String {
        self.next(END_TO_END_PREFIX, now)
    }
}

/// Mandate reference of the payer at `index` in batch order.
#[must_use]
pub fn mandate_reference(index: usize) -> String {
    format!("MANDATE-{index}")
}
