//! Trade domain models.

use crate::errors::Result;
use crate::events::EventSink;
use crate::trades::trades_errors::TradeError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parses a string into a Decimal, tolerating empty input and scientific
/// notation. Falls back to zero (logged) so one malformed amount does not
/// abort a whole history import.
pub fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    let trimmed = value_str.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(trimmed) {
        Ok(d) => d,
        Err(e_decimal) => match Decimal::from_scientific(trimmed) {
            Ok(d) => d,
            Err(e_scientific) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as scientific (err: {}). Falling back to ZERO.",
                    field_name, trimmed, e_decimal, e_scientific
                );
                Decimal::ZERO
            }
        },
    }
}

/// Kind of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Deposit,
    Withdrawal,
    Trade,
}

impl FromStr for TradeKind {
    type Err = TradeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deposit" => Ok(TradeKind::Deposit),
            "withdrawal" => Ok(TradeKind::Withdrawal),
            "trade" => Ok(TradeKind::Trade),
            other => Err(TradeError::UnknownKind(other.to_string())),
        }
    }
}

/// Raw trade fields as loaded from a history file, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrade {
    pub kind: String,
    /// Either a timestamp string or a numeric UTC epoch (seconds).
    pub date: String,
    pub buy_currency: String,
    pub buy_amount: String,
    pub sell_currency: String,
    pub sell_amount: String,
    pub fee_currency: String,
    pub fee_amount: String,
    pub exchange: String,
    pub order_id: String,
    pub comment: String,
}

/// A canonical, validated trade event.
///
/// Both amounts are non-negative after normalization; the timestamp is
/// stored in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub kind: TradeKind,
    pub timestamp: DateTime<Utc>,
    pub buy_currency: String,
    pub buy_amount: Decimal,
    pub sell_currency: String,
    pub sell_amount: Decimal,
    pub fee_currency: String,
    pub fee_amount: Decimal,
    pub exchange: String,
    pub order_id: String,
    pub comment: String,
}

impl TradeRecord {
    /// Validates and normalizes raw fields into a canonical record.
    ///
    /// - At most one of the raw buy/sell amounts may be negative; a
    ///   negative buy amount is an implicit sale, so the sides swap.
    /// - A zero fee defaults its currency to the buy side when present,
    ///   else the sell side.
    /// - A fee charged in a currency matching neither trade side is not
    ///   supported: the amount is zeroed and a warning emitted.
    pub fn normalize(raw: RawTrade, default_tz: Tz, sink: &EventSink) -> Result<TradeRecord> {
        let kind = TradeKind::from_str(&raw.kind)?;
        let timestamp = parse_timestamp(&raw.date, default_tz)?;

        let mut buy_currency = raw.buy_currency;
        let mut buy_amount = parse_decimal_tolerant(&raw.buy_amount, "buy amount");
        let mut sell_currency = raw.sell_currency;
        let mut sell_amount = parse_decimal_tolerant(&raw.sell_amount, "sell amount");

        if buy_amount.is_sign_negative() && sell_amount.is_sign_negative() {
            return Err(TradeError::AmbiguousAmount.into());
        } else if buy_amount.is_sign_negative() {
            // Implicit sale: swap the sides.
            let negative_buy = buy_amount;
            buy_amount = sell_amount;
            sell_amount = negative_buy.abs();
            std::mem::swap(&mut buy_currency, &mut sell_currency);
        } else {
            sell_amount = sell_amount.abs();
        }

        let raw_fee_amount = parse_decimal_tolerant(&raw.fee_amount, "fee amount");
        let (mut fee_currency, mut fee_amount) = if raw_fee_amount.is_zero() {
            // Default the fee currency, preferring the buy side.
            if raw.fee_currency != sell_currency && !buy_currency.is_empty() {
                (buy_currency.clone(), Decimal::ZERO)
            } else {
                (sell_currency.clone(), Decimal::ZERO)
            }
        } else {
            (raw.fee_currency, raw_fee_amount.abs())
        };

        if fee_amount > Decimal::ZERO
            && fee_currency != buy_currency
            && fee_currency != sell_currency
        {
            // Foreign-fee amounts are not supported; zero the fee and move on.
            let message = format!(
                "Fee in foreign currency: {} {}",
                fee_currency, fee_amount
            );
            log::warn!("{}", message);
            sink.warn(message, Some(timestamp));
            fee_amount = Decimal::ZERO;
            fee_currency = String::new();
        }

        Ok(TradeRecord {
            kind,
            timestamp,
            buy_currency,
            buy_amount,
            sell_currency,
            sell_amount,
            fee_currency,
            fee_amount,
            exchange: raw.exchange,
            order_id: raw.order_id,
            comment: raw.comment,
        })
    }

    /// Fee expressed as a ratio of the sell amount, when the fee was
    /// charged in the sell currency. Zero otherwise.
    pub fn sell_fee_ratio(&self) -> Decimal {
        if self.fee_currency == self.sell_currency
            && self.fee_amount > Decimal::ZERO
            && self.sell_amount > Decimal::ZERO
        {
            self.fee_amount / self.sell_amount
        } else {
            Decimal::ZERO
        }
    }

    /// Buy amount after subtracting a fee charged in the bought currency.
    pub fn net_buy_amount(&self) -> Decimal {
        if self.fee_currency == self.buy_currency && self.fee_amount > Decimal::ZERO {
            self.buy_amount - self.fee_amount
        } else {
            self.buy_amount
        }
    }
}

/// Parses a raw timestamp into UTC.
///
/// Accepts a numeric UTC epoch in seconds, an RFC 3339 timestamp, or a
/// naive timestamp which is localized with `default_tz` before the UTC
/// conversion.
fn parse_timestamp(raw: &str, default_tz: Tz) -> std::result::Result<DateTime<Utc>, TradeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TradeError::Timestamp(raw.to_string()));
    }

    if let Ok(epoch_seconds) = trimmed.parse::<i64>() {
        return Utc
            .timestamp_opt(epoch_seconds, 0)
            .single()
            .ok_or_else(|| TradeError::Timestamp(raw.to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = parse_naive(trimmed).ok_or_else(|| TradeError::Timestamp(raw.to_string()))?;
    default_tz
        .from_local_datetime(&naive)
        .earliest()
        .map(|localized| localized.with_timezone(&Utc))
        .ok_or_else(|| TradeError::Timestamp(raw.to_string()))
}

fn parse_naive(trimmed: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
