//! candora-core
//!
//! Provider-independent machinery of the candora acquisition engine.
//!
//! - `interval`: per-provider interval tables (label → duration, label aliases).
//! - `timeseries`: the window planner and the end-time quantizer.
//! - `normalize`: positional-array pages → canonical [`CandleRecord`]s.
//! - `dispatch`: the sequential, delay-spaced request loop.
//! - `sink`: destinations for normalized pages (buffered, callback, channel).
//! - `transport`: the `Transport` trait through which pages are fetched.
//!
//! Async runtime (Tokio)
//! ---------------------
//! The dispatcher suspends with `tokio::time::sleep` between requests and
//! applies per-request deadlines with `tokio::time::timeout`, so it must run
//! under a Tokio 1.x runtime with the time driver enabled.
#![warn(missing_docs)]

/// Sequential fetch dispatcher.
pub mod dispatch;
/// Interval tables.
pub mod interval;
/// Page normalization.
pub mod normalize;
/// Page sinks for buffered and streaming consumption.
pub mod sink;
/// Window planning and end-time quantization.
pub mod timeseries;
/// Transport capability consumed by the dispatcher.
pub mod transport;
pub mod types;

pub use dispatch::{Dispatcher, PageRequest};
pub use interval::{IntervalSpec, IntervalTable};
pub use normalize::{FieldLayout, PageContext, detect_provider_error, normalize, normalize_page};
pub use sink::{BufferSink, ChannelSink, FnSink, PageSink};
pub use timeseries::quantize::{EndTime, QuantizedEnd, quantize_end};
pub use timeseries::window::plan_windows;
pub use transport::Transport;
pub use types::*;
