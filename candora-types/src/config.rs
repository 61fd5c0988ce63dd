//! Configuration types shared across the dispatcher and provider adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scheduling policy for one sequential acquisition.
///
/// Requests are issued one at a time; `delay` is awaited between two
/// consecutive requests and never after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPolicy {
    /// Fixed pause between two consecutive requests.
    pub delay: Duration,
    /// Optional deadline applied to each individual request.
    pub request_timeout: Option<Duration>,
    /// Abort the whole acquisition on the first provider error payload.
    ///
    /// When disabled the offending window is skipped and the error is kept
    /// as a warning on the resulting report.
    pub fail_fast: bool,
}

impl DispatchPolicy {
    /// Policy with the given delay, no per-request timeout, and fail-fast enabled.
    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            request_timeout: None,
            fail_fast: true,
        }
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::with_delay(Duration::from_secs(2))
    }
}
