use std::time::Duration;

use candora_core::{CandoraError, Transport};
use candora_mock::fixtures::{bitfinex_error, bitfinex_row};
use candora_mock::{MockBehavior, MockTransport, Synthetic};
use serde_json::json;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).expect("valid url")
}

#[tokio::test]
async fn replays_script_in_order_then_fails() {
    let mock = MockTransport::with_pages([json!([1]), json!([2])]);
    mock.push(MockBehavior::Fail(CandoraError::transport("u", "boom")));

    let u = url("https://api.test/a");
    assert_eq!(mock.fetch_json(&u).await.unwrap(), json!([1]));
    assert_eq!(mock.fetch_json(&u).await.unwrap(), json!([2]));
    assert!(matches!(
        mock.fetch_json(&u).await,
        Err(CandoraError::Transport { msg, .. }) if msg == "boom"
    ));
    assert!(matches!(
        mock.fetch_json(&u).await,
        Err(CandoraError::Transport { msg, .. }) if msg == "no scripted response"
    ));
    assert_eq!(mock.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn hang_never_resolves() {
    let mock = MockTransport::new();
    mock.push(MockBehavior::Hang);
    let res = tokio::time::timeout(
        Duration::from_secs(60),
        mock.fetch_json(&url("https://api.test/hang")),
    )
    .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn synthetic_binance_page_respects_window_and_limit() {
    let mock = MockTransport::synthetic(Synthetic::binance(60_000));
    let page = mock
        .fetch_json(&url(
            "https://api.test/api/v3/klines?symbol=X&interval=1m&startTime=60000&endTime=600000&limit=3",
        ))
        .await
        .unwrap();
    let rows = page.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], json!(60_000));
    assert_eq!(rows[2][0], json!(180_000));
    assert!(rows[0][1].is_string());
}

#[tokio::test]
async fn synthetic_bitfinex_page_is_end_inclusive() {
    let g = Synthetic::bitfinex(3_600_000);
    let page = g.page_for(&url(
        "https://api.test/v2/candles/trade:1h:tBTCUSD/hist?start=0&end=7200000&sort=1&limit=750",
    ));
    let times: Vec<i64> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r[0].as_i64().unwrap())
        .collect();
    assert_eq!(times, vec![0, 3_600_000, 7_200_000]);
    assert!(page[0][1].is_number());
}

#[test]
fn row_helpers_follow_wire_order() {
    // [time, open, close, high, low, volume]
    assert_eq!(
        bitfinex_row(1, 10.0, 13.0, 9.0, 12.0, 5.0),
        json!([1, 10.0, 12.0, 13.0, 9.0, 5.0])
    );
    assert_eq!(bitfinex_error(10020, "limit: invalid")[0], json!("error"));
}

#[tokio::test(start_paused = true)]
async fn records_call_instants() {
    let mock = MockTransport::synthetic(Synthetic::binance(60_000));
    let u = url("https://api.test/k?startTime=0&endTime=0&limit=1");
    mock.fetch_json(&u).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    mock.fetch_json(&u).await.unwrap();
    assert_eq!(mock.gaps(), vec![Duration::from_millis(2500)]);
    assert_eq!(mock.urls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn latency_delays_every_answer() {
    let mock = MockTransport::synthetic(Synthetic::binance(60_000))
        .with_latency(Duration::from_millis(300));
    let u = url("https://api.test/k?startTime=0&endTime=0&limit=1");

    let t0 = tokio::time::Instant::now();
    mock.fetch_json(&u).await.unwrap();
    mock.fetch_json(&u).await.unwrap();

    assert_eq!(t0.elapsed(), Duration::from_millis(600));
    // calls are stamped when they start, so the gap is the first call's latency
    assert_eq!(mock.gaps(), vec![Duration::from_millis(300)]);
}
