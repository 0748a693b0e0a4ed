//! Coingains Core - lot-based capital gains accounting.
//!
//! This crate computes realized capital gains/losses from a time-ordered
//! history of currency trades, deposits and withdrawals, using lot-based
//! cost accounting (FIFO, LIFO or lowest-price-first-out), and separately
//! collapses bidirectional per-pair trading totals into netted positions.
//! The engine itself performs no I/O: the history loader feeds it
//! normalized records, and exchange rates come in through a
//! rate-provider trait.

pub mod constants;
pub mod errors;
pub mod events;
pub mod history;
pub mod ledger;
pub mod netting;
pub mod rates;
pub mod trades;

// Re-export common types from the ledger and netting modules
pub use ledger::*;
pub use netting::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
