#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use candora::{Exchange, ProviderSpec};
use candora_mock::MockTransport;

pub const MIN: i64 = 60_000;
pub const HOUR: i64 = 60 * MIN;
pub const DAY: i64 = 24 * HOUR;

/// 2018-01-01T00:00:00Z
pub const JAN_2018: i64 = 1_514_764_800_000;

/// Client over a shared mock transport with the provider's own delay.
pub fn exchange(spec: ProviderSpec, mock: &Arc<MockTransport>) -> Exchange {
    Exchange::builder(spec)
        .transport(mock.clone())
        .build()
        .expect("valid exchange")
}

/// Client over a shared mock transport without pauses between requests.
pub fn fast_exchange(spec: ProviderSpec, mock: &Arc<MockTransport>) -> Exchange {
    Exchange::builder(spec)
        .transport(mock.clone())
        .delay(Duration::ZERO)
        .build()
        .expect("valid exchange")
}

/// Spec with a smaller page so multi-page behavior needs few rows.
pub fn with_page_size(mut spec: ProviderSpec, page_size: u32) -> ProviderSpec {
    spec.page_size = page_size;
    spec
}
