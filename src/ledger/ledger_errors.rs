use crate::rates::RateError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the payment engine and trade processor.
///
/// All of these abort the current run: lot state mutation is not
/// transactional, so the caller resumes from the last snapshot.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("payments in the base currency '{0}' are not meaningful here")]
    BaseCurrencyPayment(String),

    #[error(
        "amount to be paid ({requested} {currency}) is higher than total available on {exchange}: {available} {currency}"
    )]
    InsufficientFunds {
        currency: String,
        exchange: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("fee ratio must be between 0 and 1, got {0}")]
    InvalidFeeRatio(Decimal),

    #[error("could not fetch exchange rate: {0}")]
    MissingRate(#[from] RateError),

    #[error("record at {seen} arrived after {last}; trades must be processed in timestamp order")]
    OutOfOrderTimestamp {
        last: DateTime<Utc>,
        seen: DateTime<Utc>,
    },

    #[error("unknown lot selection strategy: '{0}'")]
    UnknownStrategy(String),
}
