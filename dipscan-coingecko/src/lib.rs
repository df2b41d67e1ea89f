//! CoinGecko market-chart connector.
//!
//! The `market_chart/range` endpoint keys coins by CoinGecko id rather than
//! ticker symbol, so the connector carries a ticker → id mapping and fails
//! with `UnknownTicker` on a miss. Points arrive as `[epoch_millis, price]`
//! pairs and the endpoint chooses its own granularity from the span (5m up
//! to a day, hourly up to 90 days, daily beyond); downstream normalization
//! resamples to whatever was requested.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use dipscan_core::{
    DipscanError, PriceHistoryProvider, RawRow, RawSeries, RawStamp, SamplingInterval, Span,
    TimestampUnit,
};

const NAME: &str = "coingecko";
const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Ticker symbols the connector can translate to CoinGecko coin ids.
const TICKER_MAP: [(&str, &str); 9] = [
    ("BTC-USD", "bitcoin"),
    ("ETH-USD", "ethereum"),
    ("LTC-USD", "litecoin"),
    ("XRP-USD", "ripple"),
    ("BCH-USD", "bitcoin-cash"),
    ("ADA-USD", "cardano"),
    ("DOT-USD", "polkadot"),
    ("LINK-USD", "chainlink"),
    ("DOGE-USD", "dogecoin"),
];

#[derive(Deserialize)]
struct MarketChart {
    prices: Vec<(i64, f64)>,
}

/// Connector for the public CoinGecko market-chart endpoint.
pub struct CoingeckoConnector {
    http: reqwest::Client,
    base_url: String,
}

/// Builder for [`CoingeckoConnector`].
#[derive(Default)]
pub struct CoingeckoBuilder {
    base_url: Option<String>,
    http: Option<reqwest::Client>,
}

impl CoingeckoBuilder {
    /// Start a builder with defaults (production base URL, fresh client).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL (tests point this at a local mock server).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Supply a shared `reqwest` client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the connector.
    #[must_use]
    pub fn build(self) -> CoingeckoConnector {
        CoingeckoConnector {
            http: self.http.unwrap_or_default(),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl Default for CoingeckoConnector {
    fn default() -> Self {
        CoingeckoBuilder::new().build()
    }
}

impl CoingeckoConnector {
    /// Start building a connector.
    #[must_use]
    pub fn builder() -> CoingeckoBuilder {
        CoingeckoBuilder::new()
    }

    /// Translate a ticker symbol to its CoinGecko coin id.
    ///
    /// # Errors
    /// Returns `UnknownTicker` when no mapping exists.
    pub fn coin_id(ticker: &str) -> Result<&'static str, DipscanError> {
        TICKER_MAP
            .iter()
            .find(|(t, _)| *t == ticker)
            .map(|(_, id)| *id)
            .ok_or_else(|| DipscanError::unknown_ticker(NAME, ticker))
    }

    /// The granularity CoinGecko picks for a span: 5-minutely up to a day,
    /// hourly up to 90 days, daily beyond.
    fn native_granularity(span: Span) -> SamplingInterval {
        let days = span.seconds() / 86_400;
        if days < 1 {
            SamplingInterval::M5
        } else if days <= 90 {
            SamplingInterval::M60
        } else {
            SamplingInterval::D1
        }
    }
}

#[async_trait]
impl PriceHistoryProvider for CoingeckoConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(
        &self,
        ticker: &str,
        span: Span,
        _interval: SamplingInterval,
    ) -> Result<RawSeries, DipscanError> {
        let coin = Self::coin_id(ticker)?;
        let url = format!("{}/coins/{coin}/market_chart/range", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("vs_currency", "usd".to_string()),
                ("from", span.start.timestamp().to_string()),
                ("to", span.end.timestamp().to_string()),
            ])
            .send()
            .await
            .map_err(|e| DipscanError::provider_fetch(NAME, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DipscanError::provider_fetch(
                NAME,
                format!("{status}: {body}"),
            ));
        }

        let chart: MarketChart = resp
            .json()
            .await
            .map_err(|e| DipscanError::provider_fetch(NAME, format!("bad chart payload: {e}")))?;

        let rows = chart
            .prices
            .into_iter()
            .filter_map(|(millis, price)| {
                Decimal::from_f64_retain(price).map(|price| RawRow {
                    stamp: RawStamp::Epoch(millis),
                    price,
                })
            })
            .collect();

        Ok(RawSeries {
            rows,
            unit: TimestampUnit::Milliseconds,
            native_interval: Self::native_granularity(span),
        })
    }
}
