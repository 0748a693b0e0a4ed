//! CSV trade history import.
//!
//! Reads the generic trade history layout:
//! `Kind, Date, Buy currency, Buy amount, Sell currency, Sell amount,
//! Fee currency, Fee amount, Exchange, Mark, Comment`
//! and keeps the combined history sorted by timestamp, since transfers
//! and trades usually arrive in separate files.

use chrono_tz::Tz;
use csv::ReaderBuilder;
use log::info;
use std::io::Read;

use crate::constants::HISTORY_CSV_COLUMNS;
use crate::errors::{Error, Result};
use crate::events::EventSink;
use crate::trades::{RawTrade, TradeRecord};

/// An ordered sequence of normalized trade records.
#[derive(Debug, Clone, Default)]
pub struct TradeHistory {
    records: Vec<TradeRecord>,
}

impl TradeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in non-decreasing timestamp order.
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends records from a CSV reader, normalizing each row, then
    /// re-sorts the whole history by timestamp (stable, so same-instant
    /// records keep their file order). Returns the number of records
    /// appended.
    pub fn append_csv<R: Read>(
        &mut self,
        reader: R,
        default_tz: Tz,
        sink: &EventSink,
    ) -> Result<usize> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let appended_from = self.records.len();
        for row in csv_reader.records() {
            let row = row?;
            if row.iter().all(|field| field.is_empty()) {
                continue;
            }
            if row.len() < HISTORY_CSV_COLUMNS {
                return Err(Error::History(format!(
                    "expected {} columns, got {} in row {:?}",
                    HISTORY_CSV_COLUMNS,
                    row.len(),
                    row
                )));
            }
            let field = |index: usize| row.get(index).unwrap_or_default().to_string();
            let raw = RawTrade {
                kind: field(0),
                date: field(1),
                buy_currency: field(2),
                buy_amount: field(3),
                sell_currency: field(4),
                sell_amount: field(5),
                fee_currency: field(6),
                fee_amount: field(7),
                exchange: field(8),
                // column 9 is an exchange-specific mark, not carried over
                order_id: String::new(),
                comment: field(10),
            };
            self.records
                .push(TradeRecord::normalize(raw, default_tz, sink)?);
        }

        let appended = self.records.len() - appended_from;
        info!("Loaded {} transactions", appended);
        self.records.sort_by_key(|record| record.timestamp);
        Ok(appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trades::TradeKind;
    use rust_decimal_macros::dec;

    const TRADES_CSV: &str = "\
Kind,Date,Buy currency,Buy amount,Sell currency,Sell amount,Fee currency,Fee amount,Exchange,Mark,Comment
Trade,2021-02-01T00:00:00+00:00,BTC,1.0,USDT,30000,BTC,0.001,Bitshares,-1,1.2.3
Deposit,2021-01-01T00:00:00+00:00,USDT,30000,,0,,0,Bitshares,-1,funding
";

    #[test]
    fn appends_and_sorts_by_timestamp() {
        let mut history = TradeHistory::new();
        let appended = history
            .append_csv(TRADES_CSV.as_bytes(), chrono_tz::UTC, &EventSink::noop())
            .unwrap();

        assert_eq!(appended, 2);
        // The deposit predates the trade, so sorting moves it first.
        assert_eq!(history.records()[0].kind, TradeKind::Deposit);
        assert_eq!(history.records()[1].kind, TradeKind::Trade);
        assert_eq!(history.records()[1].buy_amount, dec!(1.0));
        assert_eq!(history.records()[1].fee_amount, dec!(0.001));
        assert_eq!(history.records()[1].comment, "1.2.3");
    }

    #[test]
    fn short_row_is_an_error() {
        let mut history = TradeHistory::new();
        let csv = "Kind,Date,Buy currency\nTrade,2021-01-01,BTC\n";
        let result = history.append_csv(csv.as_bytes(), chrono_tz::UTC, &EventSink::noop());
        assert!(result.is_err());
    }
}
