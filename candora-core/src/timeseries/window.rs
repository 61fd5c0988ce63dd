use crate::types::RequestWindow;

/// Split `[start_ms, end_ms]` into end-inclusive request windows of at most
/// `page_size` candles each.
///
/// Candle open times are multiples of `candle_duration_ms` since the epoch.
/// Planning starts from the first open time at or after `start_ms`, so an
/// unaligned start never shifts page boundaries off the candle grid. Every
/// window but the last spans exactly `page_size` open times
/// (`end = start + (page_size - 1) * duration`). The last window is extended
/// to the overall `end_ms` so the final candle of the range is never dropped.
/// Windows are ordered and contiguous, and every open time in
/// `[start_ms, end_ms]` falls in exactly one of them.
///
/// The page count is derived from the number of candle open times in the
/// range, so a range that is an exact multiple of a page never produces a
/// final window with `page_size + 1` candles.
///
/// The function is total: `end_ms < start_ms` or a range holding no open
/// time yields no windows, a zero `page_size` behaves as one, and a
/// non-positive duration yields a single window spanning the whole range.
///
/// ```
/// use candora_core::plan_windows;
///
/// let day = 86_400_000;
/// let windows = plan_windows(0, 2499 * day, 1000, day);
/// assert_eq!(windows.len(), 3);
/// assert_eq!(windows[1].start_ms, 1000 * day);
/// assert_eq!(windows[2].end_ms, 2499 * day);
/// ```
#[must_use]
pub fn plan_windows(
    start_ms: i64,
    end_ms: i64,
    page_size: u32,
    candle_duration_ms: i64,
) -> Vec<RequestWindow> {
    if end_ms < start_ms {
        return Vec::new();
    }
    if candle_duration_ms <= 0 {
        return vec![RequestWindow {
            start_ms,
            end_ms,
            is_last: true,
        }];
    }

    let first_open = match start_ms.rem_euclid(candle_duration_ms) {
        0 => start_ms,
        rem => start_ms.saturating_add(candle_duration_ms - rem),
    };
    if first_open > end_ms {
        return Vec::new();
    }

    let page = i64::from(page_size.max(1));
    let open_times = (end_ms - first_open) / candle_duration_ms + 1;
    let pages = if open_times <= page {
        1
    } else {
        (open_times + page - 1) / page
    };
    let page_span = page.saturating_mul(candle_duration_ms);

    (0..pages)
        .map(|p| {
            let is_last = p == pages - 1;
            let window_start = first_open.saturating_add(p.saturating_mul(page_span));
            // end-inclusive: a page of N candles ends on the open time of the N-th
            let mut window_end = window_start
                .saturating_add(page_span)
                .saturating_sub(candle_duration_ms);
            if is_last {
                window_end = window_end.saturating_add(candle_duration_ms);
            }
            RequestWindow {
                start_ms: window_start,
                end_ms: window_end.min(end_ms),
                is_last,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DAY_MS;

    #[test]
    fn single_page_when_range_fits() {
        let w = plan_windows(0, 999 * DAY_MS, 1000, DAY_MS);
        assert_eq!(
            w,
            vec![RequestWindow {
                start_ms: 0,
                end_ms: 999 * DAY_MS,
                is_last: true
            }]
        );
    }

    #[test]
    fn three_pages_for_2500_candles() {
        let w = plan_windows(0, 2499 * DAY_MS, 1000, DAY_MS);
        let spans: Vec<i64> = w.iter().map(|w| (w.end_ms - w.start_ms) / DAY_MS).collect();
        assert_eq!(spans, vec![999, 999, 499]);
        let counts: Vec<i64> = w.iter().map(|w| w.candle_count(DAY_MS)).collect();
        assert_eq!(counts, vec![1000, 1000, 500]);
        assert!(w[2].is_last && !w[0].is_last && !w[1].is_last);
    }

    #[test]
    fn exact_page_multiple_does_not_overfill_last_window() {
        // 1001 open times: 0..=1000 days
        let w = plan_windows(0, 1000 * DAY_MS, 1000, DAY_MS);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].end_ms, 999 * DAY_MS);
        assert_eq!(w[1].start_ms, 1000 * DAY_MS);
        assert_eq!(w[1].end_ms, 1000 * DAY_MS);
    }

    #[test]
    fn empty_range_is_one_window() {
        let w = plan_windows(5 * DAY_MS, 5 * DAY_MS, 750, DAY_MS);
        assert_eq!(w.len(), 1);
        assert_eq!((w[0].start_ms, w[0].end_ms), (5 * DAY_MS, 5 * DAY_MS));
    }

    #[test]
    fn inverted_range_has_no_windows() {
        assert!(plan_windows(10, 0, 1000, DAY_MS).is_empty());
    }

    #[test]
    fn unaligned_start_snaps_to_next_open_time() {
        let h = 3_600_000;
        // open times 1h..=6h, two per page
        let w = plan_windows(h / 2, 6 * h + h / 2, 2, h);
        let bounds: Vec<(i64, i64)> = w.iter().map(|w| (w.start_ms, w.end_ms)).collect();
        assert_eq!(bounds, vec![(h, 2 * h), (3 * h, 4 * h), (5 * h, 6 * h + h / 2)]);
    }

    #[test]
    fn range_without_open_time_has_no_windows() {
        assert!(plan_windows(DAY_MS + 1, 2 * DAY_MS - 1, 1000, DAY_MS).is_empty());
    }

    #[test]
    fn unaligned_end_is_clamped() {
        let end = 3 * DAY_MS + 1234;
        let w = plan_windows(0, end, 2, DAY_MS);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].end_ms, DAY_MS);
        assert_eq!(w[1].start_ms, 2 * DAY_MS);
        assert_eq!(w[1].end_ms, end);
    }
}
