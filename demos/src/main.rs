use candora::{CandleRecord, binance, bitfinex};
use candora_demos::exchange_for;

const DAY_MS: i64 = 86_400_000;

fn print_page(page: Vec<CandleRecord>) {
    for c in page {
        println!(
            "{:<9} {:<8} {} {} o={} h={} l={} c={} v={}",
            c.exchange,
            c.symbol,
            c.interval,
            c.timestamp,
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,candora=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let end = chrono::Utc::now().timestamp_millis();
    let start = end - 7 * DAY_MS;

    let finex = exchange_for(bitfinex(), DAY_MS)?;
    finex
        .range_with(start, end, "BTCUSD", "1d", print_page)
        .await?;

    let binance = exchange_for(binance(), DAY_MS)?;
    binance
        .range_with(start, end, "ETHUSDT", "1d", print_page)
        .await?;

    tracing::info!("done");
    Ok(())
}
