use chrono::DateTime;
use dipscan_core::{
    DipscanError, PriceHistoryProvider, RawStamp, SamplingInterval, Span, TimestampUnit, normalize,
};
use dipscan_coingecko::CoingeckoConnector;
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
async fn maps_tickers_to_coin_ids_and_decodes_millisecond_points() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/coins/bitcoin/market_chart/range")
                .query_param("vs_currency", "usd")
                .query_param("from", "0")
                .query_param("to", "43200");
            then.status(200).json_body(json!({
                "prices": [[0, 100.0], [300_000, 101.5], [600_000, 99.25]]
            }));
        })
        .await;

    let connector = CoingeckoConnector::builder()
        .base_url(server.base_url())
        .build();
    let raw = connector
        .fetch("BTC-USD", span(43_200), SamplingInterval::M5)
        .await
        .unwrap();
    mock.assert_async().await;

    assert_eq!(raw.unit, TimestampUnit::Milliseconds);
    // Half a day: CoinGecko serves 5-minutely points natively.
    assert_eq!(raw.native_interval, SamplingInterval::M5);
    assert_eq!(raw.rows[1].stamp, RawStamp::Epoch(300_000));
    assert_eq!(raw.rows[1].price.to_string(), "101.5");

    // The batch normalizes straight through at the native cadence.
    let series = normalize(raw, SamplingInterval::M5).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.points()[1].ts, DateTime::from_timestamp(300, 0).unwrap());
}

#[tokio::test]
async fn unknown_ticker_never_reaches_the_network() {
    let server = MockServer::start_async().await;
    let connector = CoingeckoConnector::builder()
        .base_url(server.base_url())
        .build();
    let err = connector
        .fetch("NOPE-USD", span(3_600), SamplingInterval::M5)
        .await
        .unwrap_err();
    match err {
        DipscanError::UnknownTicker { provider, ticker } => {
            assert_eq!(provider, "coingecko");
            assert_eq!(ticker, "NOPE-USD");
        }
        other => panic!("expected UnknownTicker, got {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_carries_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/coins/ethereum/market_chart/range");
            then.status(429).body("Throttled");
        })
        .await;

    let connector = CoingeckoConnector::builder()
        .base_url(server.base_url())
        .build();
    let err = connector
        .fetch("ETH-USD", span(3_600), SamplingInterval::M5)
        .await
        .unwrap_err();
    match err {
        DipscanError::ProviderFetch { msg, .. } => {
            assert!(msg.contains("429"), "missing status in {msg:?}");
            assert!(msg.contains("Throttled"), "missing body in {msg:?}");
        }
        other => panic!("expected ProviderFetch, got {other:?}"),
    }
}

#[test]
fn coin_id_lookup_is_static() {
    assert_eq!(
        CoingeckoConnector::coin_id("DOGE-USD").unwrap(),
        "dogecoin"
    );
    assert!(CoingeckoConnector::coin_id("SHIB-USD").is_err());
}
