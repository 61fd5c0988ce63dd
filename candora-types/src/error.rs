use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candora workspace.
///
/// Covers caller validation failures, provider-level error payloads, transport
/// failures, and the non-fatal `EmptyPage` condition that is reported as a
/// warning rather than returned.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CandoraError {
    /// A required argument (symbol or interval) was empty.
    #[error("missing parameter: {name}")]
    MissingParameter {
        /// Name of the missing parameter.
        name: String,
    },

    /// The interval label is not present in the provider's interval table.
    #[error("{exchange} does not support interval '{interval}'")]
    UnsupportedInterval {
        /// Exchange identifier.
        exchange: String,
        /// Requested interval label.
        interval: String,
    },

    /// The provider answered with an error payload instead of a page.
    #[error("{exchange} returned an error for {url}: {body}")]
    ProviderError {
        /// Exchange identifier.
        exchange: String,
        /// URL that produced the error.
        url: String,
        /// Raw error body as received.
        body: String,
    },

    /// A page came back with zero rows.
    #[error("{exchange} returned an empty page for {url}")]
    EmptyPage {
        /// Exchange identifier.
        exchange: String,
        /// URL that produced the empty page.
        url: String,
    },

    /// The transport failed (connection, HTTP layer, or non-JSON body).
    #[error("transport failure for {url}: {msg}")]
    Transport {
        /// URL being fetched.
        url: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A single request exceeded the configured per-request timeout.
    #[error("request timed out after {timeout_ms} ms: {url}")]
    RequestTimeout {
        /// URL being fetched.
        url: String,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The requested range ends before it starts.
    #[error("invalid range: start {start_ms} is after end {end_ms}")]
    InvalidRange {
        /// Requested start (ms since epoch).
        start_ms: i64,
        /// Requested end (ms since epoch).
        end_ms: i64,
    },

    /// The consumer of a streaming acquisition stopped listening.
    #[error("page consumer closed")]
    SinkClosed,

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl CandoraError {
    /// Helper: build a `MissingParameter` error.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Helper: build an `UnsupportedInterval` error.
    pub fn unsupported_interval(exchange: impl Into<String>, interval: impl Into<String>) -> Self {
        Self::UnsupportedInterval {
            exchange: exchange.into(),
            interval: interval.into(),
        }
    }

    /// Helper: build a `ProviderError`.
    pub fn provider(
        exchange: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::ProviderError {
            exchange: exchange.into(),
            url: url.into(),
            body: body.into(),
        }
    }

    /// Helper: build a `Transport` error.
    pub fn transport(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            msg: msg.into(),
        }
    }

    /// Whether this error is a non-fatal condition that only warrants a warning.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyPage { .. })
    }
}
