//! Ledger module - lot inventory, payment engine and trade processing.

mod gains_model;
mod ledger_errors;
mod ledger_service;
mod lots_model;


#[cfg(test)]
mod lots_model_tests;

pub use gains_model::{GainRecord, Payment};
pub use ledger_errors::LedgerError;
pub use ledger_service::{LedgerSnapshot, LotLedger};
pub use lots_model::{Lot, SelectionStrategy};
