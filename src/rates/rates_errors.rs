use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by rate providers.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("no {quote}/{base} rate known at {timestamp}")]
    NotFound {
        quote: String,
        base: String,
        timestamp: DateTime<Utc>,
    },
}
