use std::time::Duration;

use candora_core::{DispatchPolicy, FieldLayout, IntervalSpec, IntervalTable};

use crate::provider::{EndTimePolicy, ProviderSpec, QueryValue, SymbolStyle, UrlTemplate};

// 2013-01-01T00:00:00Z
const HISTORY_FLOOR_MS: i64 = 1_356_998_400_000;

/// Bitfinex v2 trading-pair candles.
///
/// Returns the forming candle when asked for "now", so the end time is
/// snapped back to the last closed candle. Symbols travel as `tBTCUSD`,
/// daily candles as `1D`. No 4h interval. Up to 750 candles per request,
/// three seconds between requests.
#[must_use]
pub fn bitfinex() -> ProviderSpec {
    ProviderSpec {
        exchange: "bitfinex",
        base_url: "https://api-pub.bitfinex.com",
        page_size: 750,
        layout: FieldLayout::BITFINEX,
        symbols: SymbolStyle::Prefixed { prefix: 't' },
        intervals: IntervalTable::new(
            "bitfinex",
            [
                IntervalSpec::minutes("1m", 1),
                IntervalSpec::minutes("5m", 5),
                IntervalSpec::minutes("15m", 15),
                IntervalSpec::minutes("30m", 30),
                IntervalSpec::hours("1h", 1),
                IntervalSpec::hours("6h", 6),
                IntervalSpec::hours("12h", 12),
                IntervalSpec::days("1d", 1),
            ],
        )
        .with_alias("1d", "1D"),
        end_time: EndTimePolicy::LastClosedCandle,
        template: UrlTemplate::new("v2/candles/trade:{interval}:{symbol}/hist")
            .param("start", QueryValue::Start)
            .param("end", QueryValue::End)
            .param("sort", QueryValue::Fixed("1"))
            .param("limit", QueryValue::Limit),
        policy: DispatchPolicy::with_delay(Duration::from_secs(3)),
        history_floor_ms: HISTORY_FLOOR_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_label_is_aliased() {
        let spec = bitfinex();
        assert_eq!(spec.intervals.translate("1d"), "1D");
        assert_eq!(spec.intervals.spec("1D").unwrap().label, "1d");
        assert!(!spec.intervals.supports("4h"));
    }
}
