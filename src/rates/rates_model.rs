use super::rates_errors::RateError;
use super::rates_traits::RateProviderTrait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// In-memory rate provider backed by per-pair, time-sorted rate points.
///
/// Answers lookups with the most recent rate at or before the requested
/// timestamp. Suitable for pre-fetched historical rates and for tests.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<(String, String), Vec<(DateTime<Utc>, Decimal)>>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rate point for the `quote`/`base` pair.
    pub fn insert(
        &mut self,
        quote_currency: &str,
        base_currency: &str,
        timestamp: DateTime<Utc>,
        rate: Decimal,
    ) {
        let points = self
            .rates
            .entry((quote_currency.to_string(), base_currency.to_string()))
            .or_default();
        let index = points.partition_point(|(ts, _)| *ts <= timestamp);
        points.insert(index, (timestamp, rate));
    }
}

impl RateProviderTrait for RateTable {
    fn get_rate(
        &self,
        timestamp: DateTime<Utc>,
        quote_currency: &str,
        base_currency: &str,
    ) -> Result<Decimal, RateError> {
        self.rates
            .get(&(quote_currency.to_string(), base_currency.to_string()))
            .and_then(|points| {
                let index = points.partition_point(|(ts, _)| *ts <= timestamp);
                index.checked_sub(1).map(|i| points[i].1)
            })
            .ok_or_else(|| RateError::NotFound {
                quote: quote_currency.to_string(),
                base: base_currency.to_string(),
                timestamp,
            })
    }
}
