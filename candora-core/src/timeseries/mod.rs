//! Time arithmetic shared by every provider.
//!
//! Modules include:
//! - `window`: split a range into provider-sized, end-inclusive request windows
//! - `quantize`: snap an end time back to the last fully-closed candle
/// End-time quantization.
pub mod quantize;
/// Request window planning.
pub mod window;
