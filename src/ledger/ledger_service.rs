//! The lot ledger: inventory bookkeeping, the payment engine and the
//! trade processor.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::gains_model::{GainRecord, Payment};
use super::ledger_errors::LedgerError;
use super::lots_model::{Lot, SelectionStrategy};
use crate::constants::SHORT_TERM_THRESHOLD_DAYS;
use crate::errors::Result;
use crate::events::{EngineEvent, EventSink};
use crate::rates::RateProviderTrait;
use crate::trades::{TradeKind, TradeRecord};

/// exchange -> currency -> value
type PerExchange<T> = HashMap<String, HashMap<String, T>>;

/// Serializable engine state: lot inventory, running totals and the
/// last-processed timestamp. The durability hook for callers wanting
/// resumability - persist after each trade, restore, replay unseen ones.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub base_currency: String,
    pub strategy: SelectionStrategy,
    pub lots: PerExchange<Vec<Lot>>,
    pub totals: PerExchange<Decimal>,
    pub last_timestamp: Option<DateTime<Utc>>,
}

/// Lot-based cost-basis accounting engine.
///
/// Holds per-exchange, per-currency acquisition lots and realizes gains
/// by consuming them in the configured [`SelectionStrategy`] order.
/// Strictly sequential: records must arrive in non-decreasing timestamp
/// order, which the engine enforces rather than restores.
pub struct LotLedger {
    base_currency: String,
    strategy: SelectionStrategy,
    short_term_threshold: Duration,
    rate_provider: Option<Arc<dyn RateProviderTrait>>,
    sink: EventSink,
    lots: PerExchange<Vec<Lot>>,
    totals: PerExchange<Decimal>,
    last_timestamp: Option<DateTime<Utc>>,
    gains: Vec<GainRecord>,
}

impl LotLedger {
    pub fn new(base_currency: impl Into<String>) -> Self {
        LotLedger {
            base_currency: base_currency.into(),
            strategy: SelectionStrategy::default(),
            short_term_threshold: Duration::days(SHORT_TERM_THRESHOLD_DAYS),
            rate_provider: None,
            sink: EventSink::noop(),
            lots: HashMap::new(),
            totals: HashMap::new(),
            last_timestamp: None,
            gains: Vec::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_rate_provider(mut self, provider: Arc<dyn RateProviderTrait>) -> Self {
        self.rate_provider = Some(provider);
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.sink = sink;
        self
    }

    /// Overrides the short/long-term holding threshold (a jurisdiction
    /// detail; defaults to 365 days).
    pub fn with_short_term_threshold(mut self, threshold: Duration) -> Self {
        self.short_term_threshold = threshold;
        self
    }

    // --- Read-only views ---

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Realized gains, in payment order, one record per lot touched.
    pub fn gains(&self) -> &[GainRecord] {
        &self.gains
    }

    /// Held amounts per exchange and currency.
    pub fn totals(&self) -> &PerExchange<Decimal> {
        &self.totals
    }

    /// Full lot inventory per exchange and currency.
    pub fn lots(&self) -> &PerExchange<Vec<Lot>> {
        &self.lots
    }

    pub fn total_for(&self, exchange: &str, currency: &str) -> Decimal {
        self.totals
            .get(exchange)
            .and_then(|per_currency| per_currency.get(currency))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn lots_for(&self, exchange: &str, currency: &str) -> &[Lot] {
        self.lots
            .get(exchange)
            .and_then(|per_currency| per_currency.get(currency))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    // --- Snapshot / restore ---

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            base_currency: self.base_currency.clone(),
            strategy: self.strategy,
            lots: self.lots.clone(),
            totals: self.totals.clone(),
            last_timestamp: self.last_timestamp,
        }
    }

    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.base_currency = snapshot.base_currency;
        self.strategy = snapshot.strategy;
        self.lots = snapshot.lots;
        self.totals = snapshot.totals;
        self.last_timestamp = snapshot.last_timestamp;
    }

    // --- Trade processing ---

    /// Processes one normalized history record, mutating inventory and
    /// appending to the gain ledger.
    pub fn process_trade(&mut self, trade: &TradeRecord) -> Result<()> {
        self.check_order(trade.timestamp)?;
        match trade.kind {
            TradeKind::Deposit => self.process_deposit(trade),
            TradeKind::Withdrawal => self.process_withdrawal(trade),
            TradeKind::Trade => self.process_exchange(trade),
        }
    }

    /// A sale funding a purchase. The sell side realizes gains through
    /// the payment engine (unless it is the base currency, in which case
    /// the face amount is the cost); the buy side creates a lot funded by
    /// that base-currency value, net of any fee charged in the bought
    /// currency.
    fn process_exchange(&mut self, trade: &TradeRecord) -> Result<()> {
        let base_cost = if trade.sell_currency != self.base_currency {
            self.pay(
                trade.timestamp,
                &trade.sell_currency,
                trade.sell_amount,
                &trade.exchange,
                trade.sell_fee_ratio(),
                None,
            )?
            .total_proceeds
        } else {
            trade.sell_amount
        };

        if trade.buy_currency != self.base_currency && trade.buy_amount > Decimal::ZERO {
            let lot_amount = trade.net_buy_amount();
            if lot_amount <= Decimal::ZERO {
                warn!(
                    "Fee consumed the whole acquired amount ({} {}); no lot created",
                    trade.buy_amount, trade.buy_currency
                );
                return Ok(());
            }
            self.place_lot(Lot {
                currency: trade.buy_currency.clone(),
                amount: lot_amount,
                cost_basis: base_cost,
                cost_currency: self.base_currency.clone(),
                acquired_at: trade.timestamp,
                exchange: trade.exchange.clone(),
            });
        }
        Ok(())
    }

    /// Deposits of the base currency are accounting no-ops. A non-base
    /// deposit enters the inventory as a lot valued at the provider rate,
    /// or at zero cost (with a warning) when no provider is configured.
    fn process_deposit(&mut self, trade: &TradeRecord) -> Result<()> {
        if trade.buy_currency == self.base_currency {
            debug!("Skipping base currency deposit of {}", trade.buy_amount);
            return Ok(());
        }
        let amount = trade.net_buy_amount();
        if amount <= Decimal::ZERO {
            return Ok(());
        }
        let cost_basis = match &self.rate_provider {
            Some(provider) => {
                let rate = provider
                    .get_rate(trade.timestamp, &trade.buy_currency, &self.base_currency)
                    .map_err(LedgerError::MissingRate)?;
                amount * rate
            }
            None => {
                let message = format!(
                    "No rate provider configured; deposit of {} {} enters with zero cost basis",
                    amount, trade.buy_currency
                );
                warn!("{}", message);
                self.sink.warn(message, Some(trade.timestamp));
                Decimal::ZERO
            }
        };
        self.place_lot(Lot {
            currency: trade.buy_currency.clone(),
            amount,
            cost_basis,
            cost_currency: self.base_currency.clone(),
            acquired_at: trade.timestamp,
            exchange: trade.exchange.clone(),
        });
        Ok(())
    }

    /// Withdrawals of the base currency are accounting no-ops. Whether a
    /// non-base withdrawal should realize gains is a caller policy; this
    /// engine leaves the inventory untouched and emits a warning so the
    /// skip is visible.
    fn process_withdrawal(&mut self, trade: &TradeRecord) -> Result<()> {
        if trade.sell_currency == self.base_currency {
            debug!("Skipping base currency withdrawal of {}", trade.sell_amount);
            return Ok(());
        }
        let message = format!(
            "Withdrawal of {} {} from {} not processed; spend it explicitly via pay() to realize gains",
            trade.sell_amount, trade.sell_currency, trade.exchange
        );
        warn!("{}", message);
        self.sink.warn(message, Some(trade.timestamp));
        Ok(())
    }

    // --- Payment engine ---

    /// Consumes lots of `currency` on `exchange` to satisfy a payment of
    /// `amount`, realizing gains against the base currency.
    ///
    /// The realization rate per lot is, in priority order: the explicit
    /// `custom_rate`, the configured rate provider (a lookup miss is
    /// fatal), or the lot's own acquisition price when no provider is
    /// configured at all.
    ///
    /// Returns the fee-adjusted short-term profit and total proceeds.
    pub fn pay(
        &mut self,
        timestamp: DateTime<Utc>,
        currency: &str,
        amount: Decimal,
        exchange: &str,
        fee_ratio: Decimal,
        custom_rate: Option<Decimal>,
    ) -> Result<Payment> {
        self.check_order(timestamp)?;
        if amount <= Decimal::ZERO {
            return Ok(Payment::default());
        }
        if currency == self.base_currency {
            return Err(LedgerError::BaseCurrencyPayment(self.base_currency.clone()).into());
        }
        if fee_ratio < Decimal::ZERO || fee_ratio > Decimal::ONE {
            return Err(LedgerError::InvalidFeeRatio(fee_ratio).into());
        }
        let total = self.total_for(exchange, currency);
        if amount > total {
            return Err(LedgerError::InsufficientFunds {
                currency: currency.to_string(),
                exchange: exchange.to_string(),
                requested: amount,
                available: total,
            }
            .into());
        }

        // Resolve the rate once per payment; None means value each lot at
        // its own acquisition price.
        let fixed_rate = match custom_rate {
            Some(rate) => Some(rate),
            None => match &self.rate_provider {
                Some(provider) => Some(
                    provider
                        .get_rate(timestamp, currency, &self.base_currency)
                        .map_err(LedgerError::MissingRate)?,
                ),
                None => {
                    debug!("Rate provider not configured, will use lot price as rate");
                    None
                }
            },
        };

        let mut lots = self
            .lots
            .get_mut(exchange)
            .and_then(|per_currency| per_currency.remove(currency))
            .unwrap_or_default();
        self.strategy.sort_lots(&mut lots);

        debug!(
            "Paying {} {} from {} (including {} {} fees)",
            amount,
            currency,
            exchange,
            amount * fee_ratio,
            currency
        );

        let mut cost = Decimal::ZERO;
        let mut st_cost = Decimal::ZERO;
        let mut proceeds = Decimal::ZERO;
        let mut st_proceeds = Decimal::ZERO;
        let mut to_pay = amount;
        let mut index = 0;

        while to_pay > Decimal::ZERO && index < lots.len() {
            let lot = &mut lots[index];
            let lot_amount_before = lot.amount;
            let rate = fixed_rate.unwrap_or_else(|| lot.unit_price());
            let due_before = to_pay;

            debug!(
                "Paying with lot from {}, containing {} {}",
                lot.acquired_at, lot.amount, lot.currency
            );
            let (spent, cost_removed, remainder) = lot.spend(to_pay);

            let lot_proceeds = spent * rate;
            proceeds += lot_proceeds;
            cost += cost_removed;
            let short_term = timestamp - lot.acquired_at < self.short_term_threshold;
            if short_term {
                st_proceeds += lot_proceeds;
                st_cost += cost_removed;
            }

            let corrected_proceeds = lot_proceeds * (Decimal::ONE - fee_ratio);
            let profit = corrected_proceeds - cost_removed;
            let record = GainRecord {
                exchange: exchange.to_string(),
                currency: currency.to_string(),
                to_pay: due_before,
                fee_ratio,
                lot_date: lot.acquired_at,
                lot_amount: lot_amount_before,
                lot_spent: spent,
                cost_currency: self.base_currency.clone(),
                cost: cost_removed,
                short_term,
                rate,
                proceeds: corrected_proceeds,
                profit,
                sell_date: timestamp,
            };
            self.sink.emit(&EngineEvent::GainRealized(record.clone()));
            self.gains.push(record);

            to_pay = remainder;
            index += 1;
        }
        debug_assert!(to_pay.is_zero(), "totals out of sync with lot inventory");
        debug!(
            "Payment complete: cost {} {base}, proceeds {} {base}",
            cost,
            proceeds,
            base = self.base_currency
        );

        lots.retain(|lot| !lot.is_empty());
        if !lots.is_empty() {
            self.lots
                .entry(exchange.to_string())
                .or_default()
                .insert(currency.to_string(), lots);
        } else if let Some(per_currency) = self.lots.get_mut(exchange) {
            if per_currency.is_empty() {
                self.lots.remove(exchange);
            }
        }

        // Subtract the full requested amount from the running total and
        // drop empty map entries.
        let new_total = total - amount;
        if let Some(per_currency) = self.totals.get_mut(exchange) {
            if new_total.is_zero() {
                per_currency.remove(currency);
            } else {
                per_currency.insert(currency.to_string(), new_total);
            }
            if per_currency.is_empty() {
                self.totals.remove(exchange);
            }
        }

        Ok(Payment {
            short_term_profit: st_proceeds * (Decimal::ONE - fee_ratio) - st_cost,
            total_proceeds: proceeds * (Decimal::ONE - fee_ratio),
        })
    }

    // --- Internals ---

    fn check_order(&mut self, timestamp: DateTime<Utc>) -> std::result::Result<(), LedgerError> {
        if let Some(last) = self.last_timestamp {
            if timestamp < last {
                return Err(LedgerError::OutOfOrderTimestamp {
                    last,
                    seen: timestamp,
                });
            }
        }
        self.last_timestamp = Some(timestamp);
        Ok(())
    }

    fn place_lot(&mut self, lot: Lot) {
        debug!(
            "Placing {} {} on {} (cost: {} {})",
            lot.amount, lot.currency, lot.exchange, lot.cost_basis, lot.cost_currency
        );
        *self
            .totals
            .entry(lot.exchange.clone())
            .or_default()
            .entry(lot.currency.clone())
            .or_insert(Decimal::ZERO) += lot.amount;
        self.lots
            .entry(lot.exchange.clone())
            .or_default()
            .entry(lot.currency.clone())
            .or_default()
            .push(lot);
    }
}
