use std::sync::Arc;

use candora::{Exchange, ProviderSpec, Transport};
use candora_mock::{MockTransport, Synthetic};

/// Build a client for the demo.
///
/// With `CANDORA_DEMOS_USE_MOCK` set, pages come from a synthetic generator
/// shaped like the provider's wire format and no network is touched.
///
/// # Errors
/// Returns `InvalidArg` if the provider's base URL is malformed.
pub fn exchange_for(spec: ProviderSpec, interval_ms: i64) -> Result<Exchange, candora::CandoraError> {
    let builder = Exchange::builder(spec.clone());
    if std::env::var("CANDORA_DEMOS_USE_MOCK").is_ok() {
        let generator = if spec.exchange == "bitfinex" {
            Synthetic::bitfinex(interval_ms)
        } else {
            Synthetic::binance(interval_ms)
        };
        let transport: Arc<dyn Transport> = Arc::new(MockTransport::synthetic(generator));
        builder.transport(transport).build()
    } else {
        builder.build()
    }
}
