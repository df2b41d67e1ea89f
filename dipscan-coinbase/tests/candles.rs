use chrono::DateTime;
use dipscan_core::{
    DipscanError, PriceHistoryProvider, RawStamp, SamplingInterval, Span, TimestampUnit,
};
use dipscan_coinbase::CoinbaseConnector;
use httpmock::prelude::*;
use serde_json::json;

fn span(secs: i64) -> Span {
    Span::new(
        DateTime::from_timestamp(0, 0).unwrap(),
        DateTime::from_timestamp(secs, 0).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn decodes_candles_and_takes_the_close() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products/BTC-USD/candles")
                .query_param("granularity", "300");
            then.status(200).json_body(json!([
                [600, 9.0, 11.0, 10.0, 10.5, 3.0],
                [300, 8.0, 10.0, 9.0, 9.5, 2.0],
                [0, 7.0, 9.0, 8.0, 8.5, 1.0]
            ]));
        })
        .await;

    let connector = CoinbaseConnector::builder()
        .base_url(server.base_url())
        .build();
    // One hour of 5m candles fits the 300-candle budget.
    let raw = connector
        .fetch("BTC-USD", span(3_600), SamplingInterval::M5)
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(raw.unit, TimestampUnit::Seconds);
    assert_eq!(raw.native_interval, SamplingInterval::M5);
    assert_eq!(raw.rows.len(), 3);
    assert_eq!(raw.rows[0].stamp, RawStamp::Epoch(600));
    assert_eq!(raw.rows[0].price.to_string(), "10.5");
}

#[tokio::test]
async fn coarsens_the_interval_to_fit_the_candle_budget() {
    let server = MockServer::start_async().await;
    // A week at 1m would be 10_080 candles; the resolver lands on 60m
    // (168 candles) and the connector must ask for that granularity.
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products/ETH-USD/candles")
                .query_param("granularity", "3600");
            then.status(200)
                .json_body(json!([[0, 1.0, 2.0, 1.5, 1.8, 1.0]]));
        })
        .await;

    let connector = CoinbaseConnector::builder()
        .base_url(server.base_url())
        .build();
    let raw = connector
        .fetch("ETH-USD", span(7 * 86_400), SamplingInterval::M1)
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(raw.native_interval, SamplingInterval::M60);
}

#[tokio::test]
async fn http_failure_carries_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products/NOPE-USD/candles");
            then.status(404).body("{\"message\":\"NotFound\"}");
        })
        .await;

    let connector = CoinbaseConnector::builder()
        .base_url(server.base_url())
        .build();
    let err = connector
        .fetch("NOPE-USD", span(3_600), SamplingInterval::M5)
        .await
        .unwrap_err();
    match err {
        DipscanError::ProviderFetch { provider, msg } => {
            assert_eq!(provider, "coinbase");
            assert!(msg.contains("404"), "missing status in {msg:?}");
            assert!(msg.contains("NotFound"), "missing body in {msg:?}");
        }
        other => panic!("expected ProviderFetch, got {other:?}"),
    }
}
