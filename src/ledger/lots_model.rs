//! Acquisition lots and the pluggable consumption order.

use super::ledger_errors::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A discrete acquisition of a currency, tracked with its own cost basis
/// and acquisition date, consumed in whole or in part by later payments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    pub currency: String,
    /// Remaining quantity; decremented by the payment engine, the lot is
    /// dropped from the inventory once this reaches zero.
    pub amount: Decimal,
    /// What funded the lot, in the base currency.
    pub cost_basis: Decimal,
    pub cost_currency: String,
    pub acquired_at: DateTime<Utc>,
    pub exchange: String,
}

impl Lot {
    /// Acquisition price per unit in the cost currency. Zero for an
    /// empty lot.
    pub fn unit_price(&self) -> Decimal {
        if self.amount.is_zero() {
            Decimal::ZERO
        } else {
            self.cost_basis / self.amount
        }
    }

    /// Spends up to `to_pay` from this lot, removing a proportional share
    /// of the cost basis.
    ///
    /// Returns `(spent, cost_removed, remainder)` where `remainder` is the
    /// part of `to_pay` this lot could not cover.
    pub fn spend(&mut self, to_pay: Decimal) -> (Decimal, Decimal, Decimal) {
        if to_pay >= self.amount {
            let spent = self.amount;
            let cost_removed = self.cost_basis;
            self.amount = Decimal::ZERO;
            self.cost_basis = Decimal::ZERO;
            (spent, cost_removed, to_pay - spent)
        } else {
            let cost_removed = self.cost_basis * to_pay / self.amount;
            self.amount -= to_pay;
            self.cost_basis -= cost_removed;
            (to_pay, cost_removed, Decimal::ZERO)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Order in which lots are consumed to satisfy a payment.
///
/// A plain tag dispatching to a comparator, so strategies are swappable
/// without inheritance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStrategy {
    /// Oldest acquisition first.
    #[default]
    Fifo,
    /// Newest acquisition first.
    Lifo,
    /// Lot with the lowest acquisition price first.
    Lpfo,
}

impl SelectionStrategy {
    /// Sorts lots so that consumption proceeds from the front.
    ///
    /// The sort is stable: lots tied on the ordering key keep their
    /// insertion order.
    pub fn sort_lots(&self, lots: &mut [Lot]) {
        match self {
            SelectionStrategy::Fifo => lots.sort_by_key(|lot| lot.acquired_at),
            SelectionStrategy::Lifo => {
                lots.sort_by(|a, b| b.acquired_at.cmp(&a.acquired_at))
            }
            SelectionStrategy::Lpfo => lots.sort_by_key(|lot| lot.unit_price()),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(SelectionStrategy::Fifo),
            "LIFO" => Ok(SelectionStrategy::Lifo),
            "LPFO" => Ok(SelectionStrategy::Lpfo),
            other => Err(LedgerError::UnknownStrategy(other.to_string())),
        }
    }
}
