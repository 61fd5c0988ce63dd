use std::time::Duration;

use candora_core::{DispatchPolicy, FieldLayout, IntervalSpec, IntervalTable};

use crate::provider::{EndTimePolicy, ProviderSpec, QueryValue, SymbolStyle, UrlTemplate};

/// Binance spot klines.
///
/// `endTime` is inclusive and the forming candle is never returned, so the
/// caller's end only loses one millisecond. Up to 1000 candles per request,
/// two seconds between requests.
#[must_use]
pub fn binance() -> ProviderSpec {
    ProviderSpec {
        exchange: "binance",
        base_url: "https://api.binance.com",
        page_size: 1000,
        layout: FieldLayout::BINANCE,
        symbols: SymbolStyle::Passthrough,
        intervals: IntervalTable::new(
            "binance",
            [
                IntervalSpec::minutes("1m", 1),
                IntervalSpec::minutes("5m", 5),
                IntervalSpec::minutes("15m", 15),
                IntervalSpec::minutes("30m", 30),
                IntervalSpec::hours("1h", 1),
                IntervalSpec::hours("4h", 4),
                IntervalSpec::hours("6h", 6),
                IntervalSpec::hours("8h", 8),
                IntervalSpec::days("1d", 1),
            ],
        ),
        end_time: EndTimePolicy::ChipOneMilli,
        template: UrlTemplate::new("api/v3/klines")
            .param("symbol", QueryValue::Symbol)
            .param("interval", QueryValue::Interval)
            .param("startTime", QueryValue::Start)
            .param("endTime", QueryValue::End)
            .param("limit", QueryValue::Limit),
        policy: DispatchPolicy::with_delay(Duration::from_secs(2)),
        history_floor_ms: 0,
    }
}
