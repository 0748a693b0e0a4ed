/// Default short/long-term holding threshold, in days
pub const SHORT_TERM_THRESHOLD_DAYS: i64 = 365;

/// Separator used in asset pair keys ("USDT-BTC")
pub const PAIR_KEY_SEPARATOR: char = '-';

/// Column count of the generic trade history CSV layout
pub const HISTORY_CSV_COLUMNS: usize = 11;
