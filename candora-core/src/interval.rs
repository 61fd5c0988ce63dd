use serde::Serialize;

use crate::types::{CandoraError, DAY_MS, HOUR_MS, MINUTE_MS};

/// One supported candle interval: its normalized label and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct IntervalSpec {
    /// Normalized label, e.g. `"15m"` or `"1d"`.
    pub label: &'static str,
    /// Candle duration in milliseconds.
    pub duration_ms: i64,
}

impl IntervalSpec {
    /// Interval of `n` minutes.
    #[must_use]
    pub const fn minutes(label: &'static str, n: i64) -> Self {
        Self {
            label,
            duration_ms: n * MINUTE_MS,
        }
    }

    /// Interval of `n` hours.
    #[must_use]
    pub const fn hours(label: &'static str, n: i64) -> Self {
        Self {
            label,
            duration_ms: n * HOUR_MS,
        }
    }

    /// Interval of `n` days.
    #[must_use]
    pub const fn days(label: &'static str, n: i64) -> Self {
        Self {
            label,
            duration_ms: n * DAY_MS,
        }
    }

    /// Duration expressed in whole minutes.
    #[must_use]
    pub const fn granularity_minutes(&self) -> i64 {
        self.duration_ms / MINUTE_MS
    }
}

/// Immutable table of the intervals one provider supports.
///
/// Built once when a provider is configured and never mutated afterwards.
/// Durations are the same across providers; the supported label sets and the
/// provider-side spelling of some labels are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTable {
    exchange: &'static str,
    specs: Vec<IntervalSpec>,
    // normalized label -> provider label
    aliases: Vec<(&'static str, &'static str)>,
}

impl IntervalTable {
    /// Build a table for `exchange` from its supported intervals.
    pub fn new(exchange: &'static str, specs: impl IntoIterator<Item = IntervalSpec>) -> Self {
        Self {
            exchange,
            specs: specs.into_iter().collect(),
            aliases: Vec::new(),
        }
    }

    /// Declare that the provider spells the normalized `label` as `provider_label`.
    #[must_use]
    pub fn with_alias(mut self, label: &'static str, provider_label: &'static str) -> Self {
        self.aliases.push((label, provider_label));
        self
    }

    /// Resolve a label to its spec.
    ///
    /// Accepts the normalized label or the provider's own spelling.
    ///
    /// # Errors
    /// Returns `UnsupportedInterval` when the label is not in the table.
    pub fn spec(&self, label: &str) -> Result<IntervalSpec, CandoraError> {
        let normalized = self
            .aliases
            .iter()
            .find(|(_, provider)| *provider == label)
            .map_or(label, |(normalized, _)| *normalized);
        self.specs
            .iter()
            .find(|s| s.label == normalized)
            .copied()
            .ok_or_else(|| CandoraError::unsupported_interval(self.exchange, label))
    }

    /// Duration of `label` in milliseconds.
    ///
    /// # Errors
    /// Returns `UnsupportedInterval` when the label is not in the table.
    pub fn duration_of(&self, label: &str) -> Result<i64, CandoraError> {
        self.spec(label).map(|s| s.duration_ms)
    }

    /// Provider-side spelling of a normalized label (identity unless aliased).
    #[must_use]
    pub fn translate<'a>(&'a self, label: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(normalized, _)| *normalized == label)
            .map_or(label, |(_, provider)| *provider)
    }

    /// Whether the label (normalized or provider spelling) is supported.
    #[must_use]
    pub fn supports(&self, label: &str) -> bool {
        self.spec(label).is_ok()
    }
}
