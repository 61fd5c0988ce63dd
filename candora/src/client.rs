use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use tokio::sync::mpsc;
use url::Url;

use candora_core::{
    BufferSink, CandleRecord, CandoraError, ChannelSink, DispatchPolicy, Dispatcher, FnSink,
    PageContext, PageRequest, PageSink, RangeReport, RequestWindow, Transport, normalize_page,
    plan_windows,
};
use candora_http::HttpTransport;

use crate::provider::{ProviderSpec, UrlParams};

// Pages buffered between the fetch task and a `stream_range` consumer.
const STREAM_BUFFER: usize = 16;

/// Caller-facing description of one acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// First candle open time wanted, ms since epoch.
    pub start_ms: i64,
    /// Last candle open time wanted, ms since epoch, before end-time adjustment.
    pub end_ms: i64,
    /// Trading pair, in either normalized or provider form.
    pub symbol: String,
    /// Interval label, e.g. `"1h"`.
    pub interval: String,
}

impl RangeRequest {
    /// Build a request.
    pub fn new(
        start_ms: i64,
        end_ms: i64,
        symbol: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            start_ms,
            end_ms,
            symbol: symbol.into(),
            interval: interval.into(),
        }
    }
}

/// A validated acquisition: the URLs to fetch and the values stamped on records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePlan {
    /// Display symbol written to records.
    pub symbol: String,
    /// Normalized interval label written to records.
    pub interval: &'static str,
    /// One request per window, in order. Empty when no closed candle falls
    /// inside the range.
    pub requests: Vec<PageRequest>,
}

/// Client for one exchange.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Exchange {
    spec: ProviderSpec,
    base: Url,
    dispatcher: Dispatcher,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exchange")
            .field("exchange", &self.spec.exchange)
            .field("base", &self.base.as_str())
            .field("policy", self.dispatcher.policy())
            .finish_non_exhaustive()
    }
}

/// Builder for an [`Exchange`] with overridden defaults.
pub struct ExchangeBuilder {
    spec: ProviderSpec,
    base_url: Option<String>,
    policy: DispatchPolicy,
    transport: Option<Arc<dyn Transport>>,
}

impl ExchangeBuilder {
    /// Start from a provider's defaults.
    #[must_use]
    pub fn new(spec: ProviderSpec) -> Self {
        Self {
            policy: spec.policy,
            spec,
            base_url: None,
            transport: None,
        }
    }

    /// Point requests at a different REST root (mirrors, test servers).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Pause between two consecutive requests.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.policy.delay = delay;
        self
    }

    /// Deadline applied to each request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.policy.request_timeout = Some(timeout);
        self
    }

    /// Abort on the first provider error (default) or skip the window and
    /// keep the error as a warning.
    #[must_use]
    pub const fn fail_fast(mut self, yes: bool) -> Self {
        self.policy.fail_fast = yes;
        self
    }

    /// Replace the whole dispatch policy.
    #[must_use]
    pub const fn policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a custom transport instead of [`HttpTransport`].
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL does not parse, the page size is
    /// zero, or the default HTTP client cannot be built.
    pub fn build(self) -> Result<Exchange, CandoraError> {
        let raw = self.base_url.as_deref().unwrap_or(self.spec.base_url);
        let base = Url::parse(raw)
            .map_err(|e| CandoraError::InvalidArg(format!("invalid base url '{raw}': {e}")))?;
        if self.spec.page_size == 0 {
            return Err(CandoraError::InvalidArg(format!(
                "{}: page size must be positive",
                self.spec.exchange
            )));
        }
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::try_new()?),
        };
        Ok(Exchange {
            spec: self.spec,
            base,
            dispatcher: Dispatcher::new(self.policy),
            transport,
        })
    }
}

impl Exchange {
    /// Client with the provider's defaults over HTTP.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the provider's base URL is malformed.
    pub fn new(spec: ProviderSpec) -> Result<Self, CandoraError> {
        ExchangeBuilder::new(spec).build()
    }

    /// Start building a client for `spec`.
    #[must_use]
    pub fn builder(spec: ProviderSpec) -> ExchangeBuilder {
        ExchangeBuilder::new(spec)
    }

    /// Provider configuration in use.
    #[must_use]
    pub const fn spec(&self) -> &ProviderSpec {
        &self.spec
    }

    /// Effective dispatch policy.
    #[must_use]
    pub const fn policy(&self) -> &DispatchPolicy {
        self.dispatcher.policy()
    }

    /// Validate a request and compute its URLs without touching the network.
    ///
    /// # Errors
    /// In this order: `MissingParameter`, `UnsupportedInterval`, `InvalidRange`.
    pub fn plan(&self, req: &RangeRequest) -> Result<RangePlan, CandoraError> {
        if req.symbol.trim().is_empty() {
            return Err(CandoraError::missing("symbol"));
        }
        if req.interval.trim().is_empty() {
            return Err(CandoraError::missing("interval"));
        }
        let interval = self.spec.intervals.spec(&req.interval)?;
        if req.start_ms > req.end_ms {
            return Err(CandoraError::InvalidRange {
                start_ms: req.start_ms,
                end_ms: req.end_ms,
            });
        }

        let end_ms = self.spec.end_time.apply(req.end_ms, &interval);
        let wire_symbol = self.spec.symbols.wire(&req.symbol);
        let wire_interval = self.spec.intervals.translate(interval.label);

        let requests = plan_windows(
            req.start_ms,
            end_ms,
            self.spec.page_size,
            interval.duration_ms,
        )
        .into_iter()
        .map(|window| self.page_request(window, &wire_symbol, wire_interval, self.spec.page_size))
        .collect();

        Ok(RangePlan {
            symbol: self.spec.symbols.display(&req.symbol),
            interval: interval.label,
            requests,
        })
    }

    fn page_request(
        &self,
        window: RequestWindow,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> PageRequest {
        let url = self.spec.template.render(
            &self.base,
            &UrlParams {
                symbol,
                interval,
                start_ms: window.start_ms,
                end_ms: window.end_ms,
                limit,
            },
        );
        PageRequest { window, url }
    }

    /// Run a validated plan, feeding each normalized page to `sink`.
    ///
    /// # Errors
    /// See [`Dispatcher::run`].
    pub async fn execute<S>(&self, plan: &RangePlan, sink: &mut S) -> Result<RangeReport, CandoraError>
    where
        S: PageSink + ?Sized,
    {
        if plan.requests.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(exchange = self.spec.exchange, "no closed candle in range; nothing to fetch");
            return Ok(RangeReport::default());
        }

        #[cfg(feature = "tracing")]
        {
            let pages = plan.requests.len();
            let wait_ms = self
                .policy()
                .delay
                .saturating_mul(u32::try_from(pages - 1).unwrap_or(u32::MAX))
                .as_millis();
            tracing::info!(
                exchange = self.spec.exchange,
                symbol = %plan.symbol,
                interval = plan.interval,
                pages,
                wait_ms = u64::try_from(wait_ms).unwrap_or(u64::MAX),
                "fetching range"
            );
        }

        let ctx = PageContext {
            exchange: self.spec.exchange,
            symbol: &plan.symbol,
            interval: plan.interval,
        };
        let layout = self.spec.layout;
        self.dispatcher
            .run(
                self.spec.exchange,
                &plan.requests,
                self.transport.as_ref(),
                |page| normalize_page(&ctx, &layout, page),
                sink,
            )
            .await
    }

    /// Acquire a range into any sink.
    ///
    /// The report's `records` stay empty; records go to the sink.
    ///
    /// # Errors
    /// Validation errors before any request, then whatever the dispatch
    /// raises: `ProviderError`, `Transport`, `RequestTimeout`, sink errors.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candora::exchange::range",
            skip(self, sink),
            fields(
                exchange = self.spec.exchange,
                symbol = %req.symbol,
                interval = %req.interval,
                start_ms = req.start_ms,
                end_ms = req.end_ms,
            ),
        )
    )]
    pub async fn range_into<S>(
        &self,
        req: &RangeRequest,
        sink: &mut S,
    ) -> Result<RangeReport, CandoraError>
    where
        S: PageSink + ?Sized,
    {
        let plan = self.plan(req)?;
        self.execute(&plan, sink).await
    }

    /// Buffered acquisition with request count and warnings.
    ///
    /// # Errors
    /// See [`Exchange::range_into`].
    pub async fn range_report(&self, req: &RangeRequest) -> Result<RangeReport, CandoraError> {
        let mut sink = BufferSink::new();
        let mut report = self.range_into(req, &mut sink).await?;
        report.records = sink.into_records();
        Ok(report)
    }

    /// Every candle whose open time lies in `[start_ms, end_ms]`, oldest first.
    ///
    /// # Errors
    /// See [`Exchange::range_into`].
    pub async fn range(
        &self,
        start_ms: i64,
        end_ms: i64,
        symbol: &str,
        interval: &str,
    ) -> Result<Vec<CandleRecord>, CandoraError> {
        let req = RangeRequest::new(start_ms, end_ms, symbol, interval);
        Ok(self.range_report(&req).await?.records)
    }

    /// Like [`Exchange::range`], but hands each page to `on_page` as soon as
    /// it arrives and returns an empty vector.
    ///
    /// # Errors
    /// See [`Exchange::range_into`].
    pub async fn range_with<F>(
        &self,
        start_ms: i64,
        end_ms: i64,
        symbol: &str,
        interval: &str,
        on_page: F,
    ) -> Result<Vec<CandleRecord>, CandoraError>
    where
        F: FnMut(Vec<CandleRecord>) + Send,
    {
        let req = RangeRequest::new(start_ms, end_ms, symbol, interval);
        self.range_into(&req, &mut FnSink(on_page)).await?;
        Ok(Vec::new())
    }

    /// Pages as a stream, fetched by a background task.
    ///
    /// The request is validated before anything is spawned. A dispatch
    /// failure is yielded as the last item. Dropping the stream stops the
    /// task at its next page.
    ///
    /// # Errors
    /// Validation errors, as for [`Exchange::plan`].
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn stream_range(
        &self,
        req: &RangeRequest,
    ) -> Result<impl Stream<Item = Result<Vec<CandleRecord>, CandoraError>> + Send + 'static, CandoraError>
    {
        let plan = self.plan(req)?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let this = self.clone();
        tokio::spawn(async move {
            let mut sink = ChannelSink::new(tx.clone());
            match this.execute(&plan, &mut sink).await {
                Ok(_) | Err(CandoraError::SinkClosed) => {}
                Err(e) => {
                    // only fails once the consumer has dropped the stream
                    let _ = tx.send(Err(e)).await;
                }
            }
        });
        Ok(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }))
    }

    /// Open time of the earliest candle the provider has for `symbol`.
    ///
    /// Issues a single request from the provider's history floor with a
    /// page size of one. `None` when the provider returns nothing.
    ///
    /// # Errors
    /// `MissingParameter`, `UnsupportedInterval`, then dispatch errors.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candora::exchange::first_candle",
            skip(self),
            fields(exchange = self.spec.exchange),
        )
    )]
    pub async fn first_candle(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<i64>, CandoraError> {
        if symbol.trim().is_empty() {
            return Err(CandoraError::missing("symbol"));
        }
        if interval.trim().is_empty() {
            return Err(CandoraError::missing("interval"));
        }
        let spec = self.spec.intervals.spec(interval)?;
        let now = chrono::Utc::now().timestamp_millis();
        let window = RequestWindow {
            start_ms: self.spec.history_floor_ms,
            end_ms: now.max(self.spec.history_floor_ms),
            is_last: true,
        };
        let wire_symbol = self.spec.symbols.wire(symbol);
        let plan = RangePlan {
            symbol: self.spec.symbols.display(symbol),
            interval: spec.label,
            requests: vec![self.page_request(
                window,
                &wire_symbol,
                self.spec.intervals.translate(spec.label),
                1,
            )],
        };
        let mut sink = BufferSink::new();
        self.execute(&plan, &mut sink).await?;
        Ok(sink.records().first().map(|r| r.timestamp))
    }
}
