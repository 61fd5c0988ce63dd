use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::types::CandoraError;

/// Capability to GET a URL and decode the body as JSON.
///
/// Implementations do not interpret the body: provider error payloads are
/// returned as `Ok` so the dispatcher can classify them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the decoded JSON body.
    async fn fetch_json(&self, url: &Url) -> Result<Value, CandoraError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch_json(&self, url: &Url) -> Result<Value, CandoraError> {
        (**self).fetch_json(url).await
    }
}

impl dyn Transport {
    /// Build a `Transport` from a synchronous closure (handy for tests).
    pub fn from_fn<F>(f: F) -> Arc<dyn Transport>
    where
        F: Send + Sync + 'static + Fn(&Url) -> Result<Value, CandoraError>,
    {
        struct FnTransport<F>(F);

        #[async_trait]
        impl<F> Transport for FnTransport<F>
        where
            F: Send + Sync + 'static + Fn(&Url) -> Result<Value, CandoraError>,
        {
            async fn fetch_json(&self, url: &Url) -> Result<Value, CandoraError> {
                (self.0)(url)
            }
        }

        Arc::new(FnTransport(f))
    }
}
