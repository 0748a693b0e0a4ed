use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One realized-gain entry, emitted per lot touched by a payment.
/// Append-only; the gain ledger is the raw material for reports.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GainRecord {
    pub exchange: String,
    /// Currency that was paid.
    pub currency: String,
    /// Amount still due when this lot was picked.
    pub to_pay: Decimal,
    pub fee_ratio: Decimal,
    /// Acquisition date of the consumed lot.
    pub lot_date: DateTime<Utc>,
    /// Lot quantity before this payment touched it.
    pub lot_amount: Decimal,
    /// Quantity consumed from the lot.
    pub lot_spent: Decimal,
    pub cost_currency: String,
    /// Cost basis of the consumed quantity.
    pub cost: Decimal,
    /// Whether the lot was held for less than the short-term threshold.
    pub short_term: bool,
    /// Exchange rate the proceeds were valued at.
    pub rate: Decimal,
    /// Fee-adjusted proceeds for the consumed quantity.
    pub proceeds: Decimal,
    /// Fee-adjusted proceeds minus cost.
    pub profit: Decimal,
    /// Timestamp of the payment realizing the gain.
    pub sell_date: DateTime<Utc>,
}

/// Aggregate result of one payment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Payment {
    /// Fee-adjusted short-term proceeds minus short-term cost; the
    /// taxable portion under a short/long-term regime.
    pub short_term_profit: Decimal,
    /// Fee-adjusted proceeds across the whole payment.
    pub total_proceeds: Decimal,
}
