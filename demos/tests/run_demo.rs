use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn demo_prints_a_week_from_both_providers_with_mock() {
    let mut cmd = Command::cargo_bin("candora-demos").expect("demo binary");
    cmd.env("CANDORA_DEMOS_USE_MOCK", "1");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("bitfinex  btcusd   1d"))
        .stdout(predicate::str::contains("binance   ETHUSDT  1d"));
}
