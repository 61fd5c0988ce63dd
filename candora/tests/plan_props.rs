mod helpers;

use std::sync::Arc;

use candora::{RangeRequest, binance, bitfinex};
use candora_mock::MockTransport;
use helpers::{DAY, HOUR, MIN, exchange, with_page_size};
use proptest::prelude::*;

proptest! {
    #[test]
    fn plan_covers_each_closed_candle_once(
        start in 0i64..2_000_000_000_000,
        span in 0i64..400,
        tail in 0i64..DAY,
        page_size in 1u32..50,
        provider_idx in 0usize..2,
        interval_idx in 0usize..4,
    ) {
        let (label, d) = [("1m", MIN), ("15m", 15 * MIN), ("1h", HOUR), ("1d", DAY)][interval_idx];
        let spec = if provider_idx == 0 { binance() } else { bitfinex() };
        let spec = with_page_size(spec, page_size);
        let end = start + span * d + tail % d;
        let adjusted_end = spec
            .end_time
            .apply(end, &spec.intervals.spec(label).unwrap());

        let mock = Arc::new(MockTransport::new());
        let ex = exchange(spec, &mock);
        let plan = ex
            .plan(&RangeRequest::new(start, end, "BTCUSDT", label))
            .unwrap();

        let first_open = start + (d - start.rem_euclid(d)) % d;
        let expected = if first_open > adjusted_end {
            0
        } else {
            (adjusted_end - first_open) / d + 1
        };

        let windows: Vec<_> = plan.requests.iter().map(|r| r.window).collect();
        let covered: i64 = windows.iter().map(|w| w.candle_count(d)).sum();
        prop_assert_eq!(covered, expected);
        prop_assert_eq!(windows.is_empty(), expected == 0);

        if let Some(first) = windows.first() {
            prop_assert_eq!(first.start_ms, first_open);
        }
        for w in &windows {
            prop_assert_eq!(w.start_ms.rem_euclid(d), 0);
            prop_assert!(w.candle_count(d) <= i64::from(page_size));
        }
        for pair in windows.windows(2) {
            prop_assert_eq!(pair[1].start_ms, pair[0].end_ms + d);
        }
        prop_assert_eq!(mock.call_count(), 0);
    }
}
