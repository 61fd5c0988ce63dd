//! Deterministic [`Transport`] implementations for tests and demos.
//!
//! [`MockTransport`] replays a script of [`MockBehavior`]s in call order and,
//! once the script is exhausted, can fall back to a [`fixtures::Synthetic`]
//! generator that fabricates well-formed pages for whatever window the URL
//! asks for. Every call is recorded with its URL and the Tokio instant at
//! which it was made, so tests can assert on request order and pacing.

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use candora_core::{CandoraError, Transport};
use serde_json::Value;
use tokio::time::Instant;
use url::Url;

pub use fixtures::Synthetic;

/// Instruction for how the next call should behave.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the provided body.
    Return(Value),
    /// Fail with the provided error.
    Fail(CandoraError),
    /// Never answer (simulate a stalled connection).
    Hang,
}

/// One observed `fetch_json` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Requested URL.
    pub url: Url,
    /// Tokio instant at which the call started.
    pub at: Instant,
}

#[derive(Default)]
struct State {
    script: VecDeque<MockBehavior>,
    calls: Vec<RecordedCall>,
}

/// Scripted transport. See the crate docs.
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<State>,
    synthetic: Option<Synthetic>,
    latency: Duration,
}

impl MockTransport {
    /// Empty script, no fallback: every call fails until behaviors are queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that answers every call from a synthetic generator.
    #[must_use]
    pub fn synthetic(generator: Synthetic) -> Self {
        Self {
            synthetic: Some(generator),
            ..Self::default()
        }
    }

    /// Transport that returns `pages` in order.
    #[must_use]
    pub fn with_pages(pages: impl IntoIterator<Item = Value>) -> Self {
        let t = Self::new();
        for p in pages {
            t.push(MockBehavior::Return(p));
        }
        t
    }

    /// Simulated network latency applied to every answered call.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue a behavior for the next unanswered call.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    pub fn push(&self, behavior: MockBehavior) -> &Self {
        self.state
            .lock()
            .expect("mutex poisoned")
            .script
            .push_back(behavior);
        self
    }

    /// All calls observed so far, in order.
    ///
    /// # Panics
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().expect("mutex poisoned").calls.clone()
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url.to_string()).collect()
    }

    /// Number of calls observed so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().expect("mutex poisoned").calls.len()
    }

    /// Gaps between consecutive call start instants.
    #[must_use]
    pub fn gaps(&self) -> Vec<Duration> {
        self.calls()
            .windows(2)
            .map(|pair| pair[1].at - pair[0].at)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch_json(&self, url: &Url) -> Result<Value, CandoraError> {
        let next = {
            let mut state = self.state.lock().expect("mutex poisoned");
            state.calls.push(RecordedCall {
                url: url.clone(),
                at: Instant::now(),
            });
            state.script.pop_front()
        };

        let outcome = match next {
            Some(MockBehavior::Return(v)) => Ok(v),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => self.synthetic.as_ref().map_or_else(
                || Err(CandoraError::transport(url.as_str(), "no scripted response")),
                |g| Ok(g.page_for(url)),
            ),
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        outcome
    }
}
