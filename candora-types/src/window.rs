use serde::{Deserialize, Serialize};

/// One request's span of candle open times, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestWindow {
    /// First candle open time covered by the request (ms).
    pub start_ms: i64,
    /// Last candle open time covered by the request (ms).
    pub end_ms: i64,
    /// Whether this is the final window of the plan.
    pub is_last: bool,
}

impl RequestWindow {
    /// Number of candles of `duration_ms` whose open time lies in the window.
    #[must_use]
    pub const fn candle_count(&self, duration_ms: i64) -> i64 {
        if duration_ms <= 0 || self.end_ms < self.start_ms {
            return 0;
        }
        (self.end_ms - self.start_ms) / duration_ms + 1
    }
}
