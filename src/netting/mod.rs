//! Netting module - cumulative per-pair totals and position netting.

mod netting_model;
mod netting_service;



pub use netting_model::{make_pair_key, PairStat, Price, TransferStat};
pub use netting_service::{net_positions, PositionAccumulator};
