//! Rates module - exchange-rate provider trait and in-memory table.

mod rates_errors;
mod rates_model;
mod rates_traits;

pub use rates_errors::RateError;
pub use rates_model::RateTable;
pub use rates_traits::RateProviderTrait;
