use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::CandleRecord;

/// Positional layout of one candle row in a provider page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Index of the open time (ms).
    pub time: usize,
    /// Index of the open price.
    pub open: usize,
    /// Index of the high price.
    pub high: usize,
    /// Index of the low price.
    pub low: usize,
    /// Index of the close price.
    pub close: usize,
    /// Index of the base-asset volume.
    pub volume: usize,
}

impl FieldLayout {
    /// `[openTime, open, high, low, close, volume, closeTime, ...]`
    pub const BINANCE: Self = Self {
        time: 0,
        open: 1,
        high: 2,
        low: 3,
        close: 4,
        volume: 5,
    };

    /// `[time, open, close, high, low, volume]`
    pub const BITFINEX: Self = Self {
        time: 0,
        open: 1,
        close: 2,
        high: 3,
        low: 4,
        volume: 5,
    };
}

/// Display values stamped onto every record of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext<'a> {
    /// Exchange identifier.
    pub exchange: &'a str,
    /// Normalized symbol.
    pub symbol: &'a str,
    /// Normalized interval label.
    pub interval: &'a str,
}

/// Flatten several raw pages into canonical records, preserving order.
///
/// Pages that are not JSON arrays are skipped.
pub fn normalize<'p>(
    ctx: &PageContext<'_>,
    layout: &FieldLayout,
    pages: impl IntoIterator<Item = &'p Value>,
) -> Vec<CandleRecord> {
    pages
        .into_iter()
        .flat_map(|page| normalize_page(ctx, layout, page))
        .collect()
}

/// Convert one raw page into canonical records, one per well-formed row.
///
/// A page that is not an array yields nothing. Rows whose fields are missing
/// or not numeric are skipped.
#[must_use]
pub fn normalize_page(
    ctx: &PageContext<'_>,
    layout: &FieldLayout,
    page: &Value,
) -> Vec<CandleRecord> {
    let Some(rows) = page.as_array() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(rec) = parse_row(ctx, layout, row) {
            out.push(rec);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!(exchange = ctx.exchange, symbol = ctx.symbol, row = %row, "skipping malformed candle row");
        }
    }
    out
}

fn parse_row(ctx: &PageContext<'_>, layout: &FieldLayout, row: &Value) -> Option<CandleRecord> {
    let fields = row.as_array()?;
    let num = |i: usize| fields.get(i).and_then(number);
    Some(CandleRecord {
        exchange: ctx.exchange.to_string(),
        symbol: ctx.symbol.to_string(),
        interval: ctx.interval.to_string(),
        timestamp: fields.get(layout.time).and_then(millis)?,
        open: num(layout.open)?,
        high: num(layout.high)?,
        low: num(layout.low)?,
        close: num(layout.close)?,
        volume: num(layout.volume)?,
    })
}

// Prices arrive as JSON numbers (Bitfinex) or decimal strings (Binance).
fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn millis(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Return the raw error text when a response body is a provider error
/// payload rather than a page.
///
/// Recognized shapes: an object carrying an `error` field, a Binance-style
/// `{"code": .., "msg": ..}` object, and a Bitfinex-style
/// `["error", code, message]` array.
#[must_use]
pub fn detect_provider_error(body: &Value) -> Option<String> {
    match body {
        Value::Object(map)
            if map.contains_key("error") || (map.contains_key("code") && map.contains_key("msg")) =>
        {
            Some(body.to_string())
        }
        Value::Array(items) if items.first().and_then(Value::as_str) == Some("error") => {
            Some(body.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CTX: PageContext<'static> = PageContext {
        exchange: "binance",
        symbol: "ADABTC",
        interval: "1d",
    };

    #[test]
    fn binance_row_with_string_fields() {
        let page = json!([[
            1_499_040_000_000_i64,
            "0.01634790",
            "0.80000000",
            "0.01575800",
            "0.01577100",
            "148976.11427815",
            1_499_644_799_999_i64,
            "2434.19055334",
            308,
            "1756.87402397",
            "28.46694368",
            "17928899.62484339"
        ]]);
        let recs = normalize_page(&CTX, &FieldLayout::BINANCE, &page);
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.timestamp, 1_499_040_000_000);
        assert!((r.open - 0.016_347_9).abs() < f64::EPSILON);
        assert!((r.high - 0.8).abs() < f64::EPSILON);
        assert!((r.close - 0.015_771).abs() < f64::EPSILON);
        assert!((r.volume - 148_976.114_278_15).abs() < 1e-9);
    }

    #[test]
    fn bitfinex_order_swaps_close_high_low() {
        let page = json!([[1_514_764_800_000_i64, 10.0, 12.0, 13.0, 9.0, 100.5]]);
        let recs = normalize_page(&CTX, &FieldLayout::BITFINEX, &page);
        let r = &recs[0];
        assert_eq!((r.open, r.close, r.high, r.low), (10.0, 12.0, 13.0, 9.0));
        assert_eq!(r.volume, 100.5);
    }

    #[test]
    fn non_array_pages_are_skipped() {
        let pages = [json!({"unexpected": true}), json!(null), json!([])];
        assert!(normalize(&CTX, &FieldLayout::BINANCE, pages.iter()).is_empty());
    }

    #[test]
    fn malformed_rows_are_dropped_but_order_kept() {
        let page = json!([
            [1, "1", "1", "1", "1", "1"],
            [2, "x", "1", "1", "1", "1"],
            [3, "1", "1"],
            "row",
            [4, "2", "2", "2", "2", "2"]
        ]);
        let ts: Vec<i64> = normalize_page(&CTX, &FieldLayout::BINANCE, &page)
            .into_iter()
            .map(|r| r.timestamp)
            .collect();
        assert_eq!(ts, vec![1, 4]);
    }

    #[test]
    fn provider_error_shapes() {
        assert!(detect_provider_error(&json!({"error": "ERR_RATE_LIMIT"})).is_some());
        assert!(detect_provider_error(&json!({"code": -1121, "msg": "Invalid symbol."})).is_some());
        assert!(detect_provider_error(&json!(["error", 10020, "limit: invalid"])).is_some());
        assert!(detect_provider_error(&json!([[1, 2, 3, 4, 5, 6]])).is_none());
        assert!(detect_provider_error(&json!([])).is_none());
    }
}
