//! Trades module - canonical trade records and raw-input normalization.

mod trades_errors;
mod trades_model;


pub use trades_errors::TradeError;
pub use trades_model::{parse_decimal_tolerant, RawTrade, TradeKind, TradeRecord};
