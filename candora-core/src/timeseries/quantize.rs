use chrono::{DateTime, TimeDelta, Timelike};

use crate::interval::IntervalSpec;

/// An end time already snapped back to the open time of the last
/// fully-closed candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuantizedEnd(i64);

impl QuantizedEnd {
    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }
}

impl From<QuantizedEnd> for i64 {
    fn from(q: QuantizedEnd) -> Self {
        q.0
    }
}

/// Input to [`quantize_end`]: a raw caller timestamp or an already
/// quantized one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndTime {
    /// Arbitrary timestamp in ms, e.g. "now".
    Raw(i64),
    /// Output of a previous quantization; passed through unchanged.
    Quantized(QuantizedEnd),
}

impl From<i64> for EndTime {
    fn from(ms: i64) -> Self {
        Self::Raw(ms)
    }
}

impl From<QuantizedEnd> for EndTime {
    fn from(q: QuantizedEnd) -> Self {
        Self::Quantized(q)
    }
}

/// Snap an end time to the open time of the most recent fully-closed candle.
///
/// The UTC minute field is floored to a multiple of the interval's length in
/// minutes, seconds and milliseconds are zeroed, then one whole candle is
/// subtracted: providers read the request end as the open time of the last
/// candle, and the candle opening at the snapped boundary may still be
/// forming.
///
/// Quantizing a [`QuantizedEnd`] again returns it unchanged.
///
/// ```
/// use candora_core::{IntervalSpec, quantize_end};
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2024, 3, 5, 15, 41, 21).unwrap().timestamp_millis() + 119;
/// let q = quantize_end(t, &IntervalSpec::minutes("15m", 15));
/// let expected = Utc.with_ymd_and_hms(2024, 3, 5, 15, 15, 0).unwrap().timestamp_millis();
/// assert_eq!(q.as_millis(), expected);
/// assert_eq!(quantize_end(q, &IntervalSpec::minutes("15m", 15)), q);
/// ```
#[must_use]
pub fn quantize_end(end: impl Into<EndTime>, interval: &IntervalSpec) -> QuantizedEnd {
    let t = match end.into() {
        EndTime::Quantized(q) => return q,
        EndTime::Raw(t) => t,
    };
    let Some(dt) = DateTime::from_timestamp_millis(t) else {
        return QuantizedEnd(t.saturating_sub(interval.duration_ms));
    };

    let granularity = interval.granularity_minutes().max(1);
    let minute = i64::from(dt.minute());
    let back = TimeDelta::minutes(minute % granularity)
        + TimeDelta::seconds(i64::from(dt.second()))
        + TimeDelta::nanoseconds(i64::from(dt.nanosecond()));
    let snapped = (dt - back).timestamp_millis();

    QuantizedEnd(snapped.saturating_sub(interval.duration_ms))
}
