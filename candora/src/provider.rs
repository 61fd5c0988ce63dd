use serde::Serialize;

use candora_core::{
    DispatchPolicy, EndTime, FieldLayout, IntervalSpec, IntervalTable, quantize_end,
};

/// How a caller's symbol maps onto the provider's wire form and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolStyle {
    /// Wire and display form are the caller's symbol.
    Passthrough,
    /// Wire form is `prefix` + uppercase pair; display form strips the
    /// prefix and lowercases (`tBTCUSD` <-> `btcusd`).
    Prefixed {
        /// Leading marker the provider expects, e.g. `'t'` for trading pairs.
        prefix: char,
    },
}

impl SymbolStyle {
    /// Symbol as sent to the provider.
    #[must_use]
    pub fn wire(&self, symbol: &str) -> String {
        match *self {
            Self::Passthrough => symbol.to_string(),
            Self::Prefixed { prefix } => {
                let mut chars = symbol.chars();
                let already = chars.next() == Some(prefix)
                    && chars.next().is_some_and(|c| c.is_ascii_uppercase());
                if already {
                    symbol.to_string()
                } else {
                    format!("{prefix}{}", symbol.to_uppercase())
                }
            }
        }
    }

    /// Symbol as stored on records.
    #[must_use]
    pub fn display(&self, symbol: &str) -> String {
        match *self {
            Self::Passthrough => symbol.to_string(),
            Self::Prefixed { prefix } => {
                let wire = self.wire(symbol);
                wire.strip_prefix(prefix).unwrap_or(&wire).to_lowercase()
            }
        }
    }
}

/// How the caller's end time is adjusted before planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EndTimePolicy {
    /// Use the end time unchanged.
    Raw,
    /// Subtract one millisecond; for end-inclusive providers that already
    /// omit the forming candle.
    ChipOneMilli,
    /// Snap back to the open time of the last fully-closed candle.
    LastClosedCandle,
}

impl EndTimePolicy {
    /// Adjusted end time for `interval`.
    #[must_use]
    pub fn apply(&self, end_ms: i64, interval: &IntervalSpec) -> i64 {
        match self {
            Self::Raw => end_ms,
            Self::ChipOneMilli => end_ms.saturating_sub(1),
            Self::LastClosedCandle => quantize_end(EndTime::Raw(end_ms), interval).as_millis(),
        }
    }
}

/// Value bound to one query parameter of a request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum QueryValue {
    /// Wire symbol.
    Symbol,
    /// Provider spelling of the interval.
    Interval,
    /// Window start in ms.
    Start,
    /// Window end in ms.
    End,
    /// Page size.
    Limit,
    /// Constant value.
    Fixed(&'static str),
}

/// Path plus ordered query parameters of a candle request.
///
/// The path may contain `{symbol}` and `{interval}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlTemplate {
    /// Path relative to the base URL.
    pub path: &'static str,
    /// Query parameters in emission order.
    pub query: Vec<(&'static str, QueryValue)>,
}

/// Concrete values substituted into a [`UrlTemplate`].
#[derive(Debug, Clone, Copy)]
pub struct UrlParams<'a> {
    /// Wire symbol.
    pub symbol: &'a str,
    /// Provider interval label.
    pub interval: &'a str,
    /// Window start in ms.
    pub start_ms: i64,
    /// Window end in ms.
    pub end_ms: i64,
    /// Page size.
    pub limit: u32,
}

impl UrlTemplate {
    /// Template without query parameters.
    #[must_use]
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            query: Vec::new(),
        }
    }

    /// Append one query parameter.
    #[must_use]
    pub fn param(mut self, name: &'static str, value: QueryValue) -> Self {
        self.query.push((name, value));
        self
    }

    /// Render against `base`.
    #[must_use]
    pub fn render(&self, base: &url::Url, p: &UrlParams<'_>) -> url::Url {
        let path = self
            .path
            .replace("{symbol}", p.symbol)
            .replace("{interval}", p.interval);
        let mut url = base.clone();
        let joined = format!("{}/{}", base.path().trim_end_matches('/'), path.trim_start_matches('/'));
        url.set_path(&joined);
        url.set_query(None);
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                let v = match value {
                    QueryValue::Symbol => p.symbol.to_string(),
                    QueryValue::Interval => p.interval.to_string(),
                    QueryValue::Start => p.start_ms.to_string(),
                    QueryValue::End => p.end_ms.to_string(),
                    QueryValue::Limit => p.limit.to_string(),
                    QueryValue::Fixed(s) => (*s).to_string(),
                };
                pairs.append_pair(name, &v);
            }
        }
        url
    }
}

/// Everything that distinguishes one exchange from another.
///
/// The planner, quantizer, dispatcher and normalizer are shared; a provider
/// is just this value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSpec {
    /// Exchange name stamped on records.
    pub exchange: &'static str,
    /// REST root, e.g. `https://api.binance.com`.
    pub base_url: &'static str,
    /// Maximum candles per request.
    pub page_size: u32,
    /// Positional field order of a page row.
    pub layout: FieldLayout,
    /// Symbol translation.
    pub symbols: SymbolStyle,
    /// Supported intervals.
    #[serde(skip)]
    pub intervals: IntervalTable,
    /// End-time adjustment.
    pub end_time: EndTimePolicy,
    /// Request URL shape.
    pub template: UrlTemplate,
    /// Pacing and failure policy.
    pub policy: DispatchPolicy,
    /// Earliest open time worth asking for; used by `first_candle`.
    pub history_floor_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_symbols() {
        let s = SymbolStyle::Prefixed { prefix: 't' };
        assert_eq!(s.wire("btcusd"), "tBTCUSD");
        assert_eq!(s.wire("BTCUSD"), "tBTCUSD");
        assert_eq!(s.wire("tBTCUSD"), "tBTCUSD");
        assert_eq!(s.wire("trxusd"), "tTRXUSD");
        assert_eq!(s.display("tBTCUSD"), "btcusd");
        assert_eq!(s.display("ethusd"), "ethusd");
    }

    #[test]
    fn passthrough_symbols() {
        let s = SymbolStyle::Passthrough;
        assert_eq!(s.wire("ETHUSDT"), "ETHUSDT");
        assert_eq!(s.display("ETHUSDT"), "ETHUSDT");
    }

    #[test]
    fn end_policies() {
        let m15 = IntervalSpec::minutes("15m", 15);
        assert_eq!(EndTimePolicy::Raw.apply(1_000, &m15), 1_000);
        assert_eq!(EndTimePolicy::ChipOneMilli.apply(1_000, &m15), 999);
        // 00:41:21.119 -> 00:30 -> 00:15
        let t = 41 * 60_000 + 21_119;
        assert_eq!(EndTimePolicy::LastClosedCandle.apply(t, &m15), 15 * 60_000);
    }

    #[test]
    fn renders_path_placeholders_and_query_in_order() {
        let tpl = UrlTemplate::new("v2/candles/trade:{interval}:{symbol}/hist")
            .param("start", QueryValue::Start)
            .param("end", QueryValue::End)
            .param("sort", QueryValue::Fixed("1"))
            .param("limit", QueryValue::Limit);
        let base = url::Url::parse("https://api-pub.bitfinex.com").unwrap();
        let url = tpl.render(
            &base,
            &UrlParams {
                symbol: "tBTCUSD",
                interval: "1D",
                start_ms: 0,
                end_ms: 86_400_000,
                limit: 750,
            },
        );
        assert_eq!(
            url.as_str(),
            "https://api-pub.bitfinex.com/v2/candles/trade:1D:tBTCUSD/hist?start=0&end=86400000&sort=1&limit=750"
        );
    }

    #[test]
    fn render_keeps_base_path_prefix() {
        let tpl = UrlTemplate::new("api/v3/klines").param("symbol", QueryValue::Symbol);
        let base = url::Url::parse("http://127.0.0.1:9000/mock/").unwrap();
        let url = tpl.render(
            &base,
            &UrlParams {
                symbol: "ETHUSDT",
                interval: "1d",
                start_ms: 0,
                end_ms: 0,
                limit: 1,
            },
        );
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/mock/api/v3/klines?symbol=ETHUSDT");
    }
}
