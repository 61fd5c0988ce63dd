//! Re-export of foundational types from `candora-types`.
// Consolidated re-exports so downstream crates can depend on `candora-core` only

pub use candora_types::{CandleRecord, CandoraError, DispatchPolicy, RangeReport, RequestWindow};

/// Milliseconds in one minute.
pub const MINUTE_MS: i64 = 60 * 1000;
/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * HOUR_MS;
