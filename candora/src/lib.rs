//! Candora pulls historical OHLCV candles from crypto exchange REST APIs.
//!
//! Overview
//! - A requested `[start, end]` range is split into provider-sized windows,
//!   fetched strictly one after another with a fixed pause in between, and
//!   flattened into one canonical [`CandleRecord`] shape.
//! - Each exchange is a [`ProviderSpec`] value: page size, row layout,
//!   symbol and interval spelling, end-time policy, URL template and
//!   pacing. Binance and Bitfinex ship built in.
//! - Pages can be buffered ([`Exchange::range`]), streamed to a callback
//!   ([`Exchange::range_with`]), to any [`PageSink`] ([`Exchange::range_into`])
//!   or consumed as a `futures` stream ([`Exchange::stream_range`]).
//!
//! Key behaviors
//! - Validation happens before the first request: missing symbol or
//!   interval, unsupported interval, inverted range.
//! - Providers that return the still-forming candle get their end time
//!   snapped back to the last closed one.
//! - A provider error payload aborts the acquisition unless fail-fast is
//!   turned off, in which case the window is skipped and reported as a
//!   warning. Empty pages are warnings. Transport failures are never retried.
//!
//! Example
//! ```rust,ignore
//! use candora::{Exchange, bitfinex};
//!
//! let finex = Exchange::new(bitfinex())?;
//! let week = 7 * 86_400_000;
//! let now = chrono::Utc::now().timestamp_millis();
//! let candles = finex.range(now - week, now, "btcusd", "1d").await?;
//! ```
//!
//! Enable the `tracing` feature to get spans for every acquisition and an
//! event per requested URL.
#![warn(missing_docs)]

mod client;
mod provider;
pub mod providers;

pub use client::{Exchange, ExchangeBuilder, RangePlan, RangeRequest};
pub use provider::{EndTimePolicy, ProviderSpec, QueryValue, SymbolStyle, UrlParams, UrlTemplate};
pub use providers::{binance, bitfinex};

pub use candora_core::{
    BufferSink, ChannelSink, FieldLayout, FnSink, IntervalSpec, IntervalTable, PageRequest,
    PageSink, Transport,
};
pub use candora_http::HttpTransport;
pub use candora_types::{
    CandleRecord, CandoraError, DispatchPolicy, RangeReport, RequestWindow,
};
