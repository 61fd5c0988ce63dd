use serde_json::Value;
use url::Url;

use crate::normalize::detect_provider_error;
use crate::sink::PageSink;
use crate::transport::Transport;
use crate::types::{CandleRecord, CandoraError, DispatchPolicy, RangeReport, RequestWindow};

/// One planned request: the window it covers and the URL that fetches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Window of candle open times covered by the request.
    pub window: RequestWindow,
    /// Fully rendered request URL.
    pub url: Url,
}

/// Sequential fetch loop governed by a [`DispatchPolicy`].
///
/// Requests are issued strictly one after another. The policy delay is
/// awaited between two requests and never after the last one, so N requests
/// incur exactly N - 1 delays.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    policy: DispatchPolicy,
}

impl Dispatcher {
    /// Build a dispatcher for the given policy.
    #[must_use]
    pub const fn new(policy: DispatchPolicy) -> Self {
        Self { policy }
    }

    /// Policy this dispatcher applies.
    #[must_use]
    pub const fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// Fetch every request in order, normalize each page with `to_records`,
    /// and hand the result to `sink` before issuing the next request.
    ///
    /// The returned report carries the number of requests issued and any
    /// warnings; its `records` are always empty since records go to the sink.
    ///
    /// # Errors
    /// - `ProviderError` on the first error payload when `fail_fast` is set.
    /// - `Transport` / `RequestTimeout` when a request fails; never retried.
    /// - Whatever the sink returns, e.g. `SinkClosed`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "candora::dispatch::run",
            skip(self, requests, transport, to_records, sink),
            fields(
                exchange = exchange,
                pages = requests.len(),
                delay_ms = u64::try_from(self.policy.delay.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub async fn run<T, F, S>(
        &self,
        exchange: &str,
        requests: &[PageRequest],
        transport: &T,
        mut to_records: F,
        sink: &mut S,
    ) -> Result<RangeReport, CandoraError>
    where
        T: Transport + ?Sized,
        F: FnMut(&Value) -> Vec<CandleRecord> + Send,
        S: PageSink + ?Sized,
    {
        let mut report = RangeReport::default();

        for (i, req) in requests.iter().enumerate() {
            #[cfg(feature = "tracing")]
            tracing::info!(url = %req.url, "requesting page");

            let page = self.fetch(transport, &req.url).await?;
            report.requests += 1;

            if let Some(body) = detect_provider_error(&page) {
                let err = CandoraError::provider(exchange, req.url.as_str(), body);
                #[cfg(feature = "tracing")]
                tracing::error!(error = %err, fail_fast = self.policy.fail_fast, "provider returned an error payload");
                if self.policy.fail_fast {
                    return Err(err);
                }
                report.warnings.push(err);
            } else {
                if page.as_array().is_none_or(Vec::is_empty) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(url = %req.url, "nothing returned for window");
                    report.warnings.push(CandoraError::EmptyPage {
                        exchange: exchange.to_string(),
                        url: req.url.to_string(),
                    });
                }
                sink.accept(to_records(&page)).await?;
            }

            if i + 1 < requests.len() {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    delay_ms = u64::try_from(self.policy.delay.as_millis()).unwrap_or(u64::MAX),
                    "waiting before next request"
                );
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        Ok(report)
    }

    async fn fetch<T>(&self, transport: &T, url: &Url) -> Result<Value, CandoraError>
    where
        T: Transport + ?Sized,
    {
        match self.policy.request_timeout {
            Some(limit) => tokio::time::timeout(limit, transport.fetch_json(url))
                .await
                .unwrap_or_else(|_| {
                    Err(CandoraError::RequestTimeout {
                        url: url.to_string(),
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }),
            None => transport.fetch_json(url).await,
        }
    }
}
