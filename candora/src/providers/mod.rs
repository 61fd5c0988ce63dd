//! Built-in provider configurations.

mod binance;
mod bitfinex;

pub use binance::binance;
pub use bitfinex::bitfinex;
