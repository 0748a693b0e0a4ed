//! Per-pair and per-asset cumulative statistics.

use crate::constants::PAIR_KEY_SEPARATOR;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered pair key: "USDT-BTC" means USDT was spent to acquire BTC.
pub fn make_pair_key(spent_asset: &str, acquired_asset: &str) -> String {
    format!("{}{}{}", spent_asset, PAIR_KEY_SEPARATOR, acquired_asset)
}

/// Average price of a pair's cumulative totals. Division by a zero
/// amount is mathematically infinite, carried as an explicit sentinel
/// rather than a magic number.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Price {
    Finite(Decimal),
    Infinite,
}

impl Price {
    fn from_ratio(numerator: Decimal, denominator: Decimal) -> Price {
        if denominator.is_zero() {
            Price::Infinite
        } else {
            Price::Finite(numerator / denominator)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Finite(value) => write!(f, "{}", value),
            Price::Infinite => write!(f, "Inf"),
        }
    }
}

/// Cumulative trading totals for one direction of an asset pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PairStat {
    pub spent_asset: String,
    pub acquired_asset: String,
    pub spent_amount: Decimal,
    pub acquired_amount: Decimal,
    pub last_timestamp: DateTime<Utc>,
}

impl PairStat {
    pub fn new(spent_asset: impl Into<String>, acquired_asset: impl Into<String>) -> Self {
        PairStat {
            spent_asset: spent_asset.into(),
            acquired_asset: acquired_asset.into(),
            spent_amount: Decimal::ZERO,
            acquired_amount: Decimal::ZERO,
            last_timestamp: DateTime::UNIX_EPOCH,
        }
    }

    pub fn pair_key(&self) -> String {
        make_pair_key(&self.spent_asset, &self.acquired_asset)
    }

    /// Spent per acquired unit; [`Price::Infinite`] when nothing was
    /// acquired.
    pub fn price(&self) -> Price {
        Price::from_ratio(self.spent_amount, self.acquired_amount)
    }

    /// Acquired per spent unit; [`Price::Infinite`] when nothing was
    /// spent.
    pub fn price_inverted(&self) -> Price {
        Price::from_ratio(self.acquired_amount, self.spent_amount)
    }
}

/// Cumulative deposit/withdrawal totals for one asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferStat {
    pub asset: String,
    pub deposit_amount: Decimal,
    pub withdraw_amount: Decimal,
    pub last_timestamp: DateTime<Utc>,
}

impl TransferStat {
    pub fn new(asset: impl Into<String>) -> Self {
        TransferStat {
            asset: asset.into(),
            deposit_amount: Decimal::ZERO,
            withdraw_amount: Decimal::ZERO,
            last_timestamp: DateTime::UNIX_EPOCH,
        }
    }

    /// Deposited minus withdrawn.
    pub fn delta(&self) -> Decimal {
        self.deposit_amount - self.withdraw_amount
    }
}
