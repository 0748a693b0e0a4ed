//! Core error types for the gains engine.
//!
//! Each domain module defines its own error enum; this module wraps them
//! into a single root type so callers can pattern-match on the failure
//! kind instead of catching strings. Every ledger error is fatal to the
//! current run: lot mutation is not transactional, so the safe resume
//! point is the snapshot taken after the last completed trade.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::rates::RateError;
use crate::trades::TradeError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the gains engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Trade validation failed: {0}")]
    Trade(#[from] TradeError),

    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Rate lookup failed: {0}")]
    Rate(#[from] RateError),

    #[error("History import failed: {0}")]
    History(String),
}

// === From implementations for common error types ===

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::History(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
