//! Raw page fixtures in the providers' wire shapes.

use candora_core::FieldLayout;
use serde_json::{Value, json};
use url::Url;

/// Binance kline row: prices and volume as decimal strings, trailing fields
/// filled with plausible values.
#[must_use]
pub fn binance_row(open_time: i64, o: f64, h: f64, l: f64, c: f64, v: f64) -> Value {
    json!([
        open_time,
        format!("{o:.8}"),
        format!("{h:.8}"),
        format!("{l:.8}"),
        format!("{c:.8}"),
        format!("{v:.8}"),
        open_time + 59_999,
        "0.0",
        1,
        "0.0",
        "0.0",
        "0"
    ])
}

/// Bitfinex candle row: `[time, open, close, high, low, volume]` as numbers.
#[must_use]
pub fn bitfinex_row(time: i64, o: f64, h: f64, l: f64, c: f64, v: f64) -> Value {
    json!([time, o, c, h, l, v])
}

/// Binance style error body.
#[must_use]
pub fn binance_error(code: i64, msg: &str) -> Value {
    json!({ "code": code, "msg": msg })
}

/// Bitfinex style error body.
#[must_use]
pub fn bitfinex_error(code: i64, msg: &str) -> Value {
    json!(["error", code, msg])
}

/// Generates a page for whatever window a request URL asks for.
///
/// Reads the start, end and limit query parameters, then emits one row per
/// candle open time (multiples of `duration_ms`) in `[start, end]`, capped at
/// `limit`, just like an exchange with no gaps would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthetic {
    /// Row layout to emit.
    pub layout: FieldLayout,
    /// Query parameter holding the window start.
    pub start_param: &'static str,
    /// Query parameter holding the window end.
    pub end_param: &'static str,
    /// Query parameter holding the page size cap.
    pub limit_param: &'static str,
    /// Candle duration in ms.
    pub duration_ms: i64,
    /// Encode prices as strings (Binance) rather than numbers (Bitfinex).
    pub string_prices: bool,
}

impl Synthetic {
    /// Binance-shaped generator.
    #[must_use]
    pub const fn binance(duration_ms: i64) -> Self {
        Self {
            layout: FieldLayout::BINANCE,
            start_param: "startTime",
            end_param: "endTime",
            limit_param: "limit",
            duration_ms,
            string_prices: true,
        }
    }

    /// Bitfinex-shaped generator.
    #[must_use]
    pub const fn bitfinex(duration_ms: i64) -> Self {
        Self {
            layout: FieldLayout::BITFINEX,
            start_param: "start",
            end_param: "end",
            limit_param: "limit",
            duration_ms,
            string_prices: false,
        }
    }

    /// Page answering `url`.
    #[must_use]
    pub fn page_for(&self, url: &Url) -> Value {
        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.parse::<i64>().ok())
        };
        let start = param(self.start_param).unwrap_or(0);
        let end = param(self.end_param).unwrap_or(i64::MAX);
        let limit = param(self.limit_param).unwrap_or(1000).max(0);
        let d = self.duration_ms.max(1);

        let first = start.div_euclid(d) * d + if start.rem_euclid(d) == 0 { 0 } else { d };
        let rows: Vec<Value> = (0..limit)
            .map(|i| first + i * d)
            .take_while(|t| *t <= end)
            .map(|t| self.row(t))
            .collect();
        Value::Array(rows)
    }

    /// Deterministic row for the candle opening at `t`.
    #[must_use]
    pub fn row(&self, t: i64) -> Value {
        let base = 100.0 + (t / self.duration_ms.max(1)).rem_euclid(50) as f64;
        let fields = [
            (self.layout.open, base),
            (self.layout.high, base + 2.0),
            (self.layout.low, base - 1.0),
            (self.layout.close, base + 1.0),
            (self.layout.volume, 10.0),
        ];
        let width = fields
            .iter()
            .map(|(i, _)| *i)
            .chain([self.layout.time])
            .max()
            .unwrap_or(0)
            + 1;
        let mut row = vec![Value::Null; width];
        row[self.layout.time] = json!(t);
        for (i, v) in fields {
            row[i] = if self.string_prices {
                json!(format!("{v:.8}"))
            } else {
                json!(v)
            };
        }
        Value::Array(row)
    }
}
