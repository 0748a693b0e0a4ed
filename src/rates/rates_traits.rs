use super::rates_errors::RateError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Capability for resolving the price of one unit of `quote_currency`
/// expressed in `base_currency` at a point in time.
///
/// A lookup miss is an error, never a silent fallback: the payment engine
/// treats it as fatal when a provider is configured.
pub trait RateProviderTrait: Send + Sync {
    fn get_rate(
        &self,
        timestamp: DateTime<Utc>,
        quote_currency: &str,
        base_currency: &str,
    ) -> Result<Decimal, RateError>;
}
