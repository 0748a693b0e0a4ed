//! History module - loading trade histories from CSV.

mod history_service;

pub use history_service::TradeHistory;
