use serde::{Deserialize, Serialize};

/// Canonical OHLCV candle, independent of the exchange it came from.
///
/// `timestamp` is the candle open time in milliseconds since the Unix epoch.
/// `interval` is the normalized label the caller asked for, not the
/// provider's own spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleRecord {
    /// Source exchange identifier, e.g. `"binance"`.
    pub exchange: String,
    /// Normalized trading pair, e.g. `"btcusd"` or `"ETHUSDT"`.
    pub symbol: String,
    /// Normalized interval label, e.g. `"1d"`.
    pub interval: String,
    /// Candle open time (ms since epoch).
    pub timestamp: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume in the base asset.
    pub volume: f64,
}
