//! Accumulation of per-pair totals and the position-netting algorithm.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

use super::netting_model::{make_pair_key, PairStat, TransferStat};
use crate::errors::Result;
use crate::trades::{TradeKind, TradeRecord};

/// Builds cumulative per-pair trade totals and per-asset transfer totals
/// by naive accumulation over a trade sequence, optionally restricted to
/// a `[start, end)` time window.
#[derive(Debug, Clone, Default)]
pub struct PositionAccumulator {
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    trade_stats: HashMap<String, PairStat>,
    transfer_stats: HashMap<String, TransferStat>,
}

impl PositionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts accumulation to records with `start <= timestamp < end`.
    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.window = Some((start, end));
        self
    }

    pub fn trade_stats(&self) -> &HashMap<String, PairStat> {
        &self.trade_stats
    }

    pub fn transfer_stats(&self) -> &HashMap<String, TransferStat> {
        &self.transfer_stats
    }

    /// Folds one record into the cumulative totals.
    pub fn process(&mut self, trade: &TradeRecord) -> Result<()> {
        if let Some((start, end)) = self.window {
            if trade.timestamp < start || trade.timestamp >= end {
                return Ok(());
            }
        }
        match trade.kind {
            TradeKind::Deposit => {
                let stat = self
                    .transfer_stats
                    .entry(trade.buy_currency.clone())
                    .or_insert_with(|| TransferStat::new(trade.buy_currency.clone()));
                stat.deposit_amount += trade.buy_amount;
                stat.last_timestamp = trade.timestamp;
            }
            TradeKind::Withdrawal => {
                let stat = self
                    .transfer_stats
                    .entry(trade.sell_currency.clone())
                    .or_insert_with(|| TransferStat::new(trade.sell_currency.clone()));
                stat.withdraw_amount += trade.sell_amount;
                stat.last_timestamp = trade.timestamp;
            }
            TradeKind::Trade => {
                let key = make_pair_key(&trade.sell_currency, &trade.buy_currency);
                let stat = self.trade_stats.entry(key).or_insert_with(|| {
                    PairStat::new(trade.sell_currency.clone(), trade.buy_currency.clone())
                });
                stat.spent_amount += trade.sell_amount;
                stat.acquired_amount += trade.buy_amount;
                stat.last_timestamp = trade.timestamp;
            }
        }
        Ok(())
    }
}

/// Collapses bidirectional trading totals into one canonical surplus per
/// unordered asset pair.
///
/// Pure function: recomputing on unchanged input yields identical
/// output. Pairs traded in a single direction pass through unchanged.
/// For a pair traded both ways (A spent for B and B spent for A), the
/// uncancelled remainder is:
///
/// ```text
/// delta_spent    = spent(A->B)    - acquired(B->A)
/// delta_acquired = acquired(A->B) - spent(B->A)
/// ```
///
/// and the emitted direction(s) depend on the signs: a non-negative pair
/// keeps the forward direction, a fully negative pair flips to the
/// reverse, and mixed signs split into two one-sided records (each with
/// a zero acquired amount) because the surplus cannot be expressed as a
/// single trade.
pub fn net_positions(stats: &HashMap<String, PairStat>) -> HashMap<String, PairStat> {
    let mut netted: HashMap<String, PairStat> = HashMap::new();
    let mut processed: HashSet<String> = HashSet::new();

    let emit = |stat: PairStat, netted: &mut HashMap<String, PairStat>| {
        netted.insert(stat.pair_key(), stat);
    };

    for (key, forward) in stats {
        if processed.contains(key) {
            continue;
        }
        let reverse_key = make_pair_key(&forward.acquired_asset, &forward.spent_asset);
        let reverse = match stats.get(&reverse_key) {
            Some(reverse) => reverse,
            None => {
                emit(forward.clone(), &mut netted);
                continue;
            }
        };
        processed.insert(reverse_key);

        let delta_spent = forward.spent_amount - reverse.acquired_amount;
        let delta_acquired = forward.acquired_amount - reverse.spent_amount;
        let last_timestamp = forward.last_timestamp.max(reverse.last_timestamp);

        let forward_stat = |spent: Decimal, acquired: Decimal| PairStat {
            spent_asset: forward.spent_asset.clone(),
            acquired_asset: forward.acquired_asset.clone(),
            spent_amount: spent,
            acquired_amount: acquired,
            last_timestamp,
        };
        let reverse_stat = |spent: Decimal, acquired: Decimal| PairStat {
            spent_asset: forward.acquired_asset.clone(),
            acquired_asset: forward.spent_asset.clone(),
            spent_amount: spent,
            acquired_amount: acquired,
            last_timestamp,
        };

        if delta_spent.is_zero() && delta_acquired.is_zero() {
            // Fully round-tripped at breakeven: nothing left to report.
        } else if delta_spent >= Decimal::ZERO && delta_acquired >= Decimal::ZERO {
            emit(forward_stat(delta_spent, delta_acquired), &mut netted);
        } else if delta_spent < Decimal::ZERO && delta_acquired <= Decimal::ZERO {
            emit(
                reverse_stat(delta_acquired.abs(), delta_spent.abs()),
                &mut netted,
            );
        } else if delta_spent > Decimal::ZERO && delta_acquired < Decimal::ZERO {
            // Lost on both legs; neither direction can absorb the other.
            emit(forward_stat(delta_spent, Decimal::ZERO), &mut netted);
            emit(
                reverse_stat(delta_acquired.abs(), Decimal::ZERO),
                &mut netted,
            );
        } else if delta_spent.is_zero() && delta_acquired < Decimal::ZERO {
            emit(
                reverse_stat(delta_acquired.abs(), Decimal::ZERO),
                &mut netted,
            );
        } else {
            // delta_spent < 0, delta_acquired > 0: gained on both legs.
            emit(forward_stat(Decimal::ZERO, delta_acquired), &mut netted);
            emit(
                reverse_stat(Decimal::ZERO, delta_spent.abs()),
                &mut netted,
            );
        }
    }

    netted
}
