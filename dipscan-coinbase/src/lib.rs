//! Coinbase Exchange candles connector.
//!
//! Coinbase serves at most [`MAX_CANDLES`] candles per request, so the
//! requested interval is first run through the interval resolver: the
//! connector fetches at the coarsest cadence that keeps the window under the
//! budget, and downstream normalization resamples if anything finer was
//! asked for. Candle rows arrive as `[time, low, high, open, close, volume]`
//! with epoch-second timestamps; the close is the canonical price.

use async_trait::async_trait;
use rust_decimal::Decimal;

use dipscan_core::timeseries::interval;
use dipscan_core::{
    DipscanError, PriceHistoryProvider, RawRow, RawSeries, RawStamp, SamplingInterval, Span,
    TimestampUnit,
};

const NAME: &str = "coinbase";
const DEFAULT_BASE_URL: &str = "https://api.exchange.coinbase.com";

/// Fixed response-window budget of the candles endpoint.
pub const MAX_CANDLES: usize = 300;

/// Connector for the public Coinbase Exchange candles endpoint.
pub struct CoinbaseConnector {
    http: reqwest::Client,
    base_url: String,
}

/// Builder for [`CoinbaseConnector`].
#[derive(Default)]
pub struct CoinbaseBuilder {
    base_url: Option<String>,
    http: Option<reqwest::Client>,
}

impl CoinbaseBuilder {
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
    pub fn build(self) -> CoinbaseConnector {
        CoinbaseConnector {
            http: self.http.unwrap_or_default(),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl Default for CoinbaseConnector {
    fn default() -> Self {
        CoinbaseBuilder::new().build()
    }
}

impl CoinbaseConnector {
    /// Start building a connector.
    #[must_use]
    pub fn builder() -> CoinbaseBuilder {
        CoinbaseBuilder::new()
    }
}

#[async_trait]
impl PriceHistoryProvider for CoinbaseConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(
        &self,
        ticker: &str,
        span: Span,
        interval: SamplingInterval,
    ) -> Result<RawSeries, DipscanError> {
        let granularity = interval::resolve(interval, span, MAX_CANDLES);
        if granularity != interval {
            tracing::debug!(
                requested = %interval,
                effective = %granularity,
                "coarsened interval to fit the candle budget"
            );
        }

        let url = format!("{}/products/{ticker}/candles", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("start", span.start.to_rfc3339()),
                ("end", span.end.to_rfc3339()),
                ("granularity", granularity.duration_secs().to_string()),
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

        // [time, low, high, open, close, volume], newest first.
        let candles: Vec<(i64, f64, f64, f64, f64, f64)> = resp
            .json()
            .await
            .map_err(|e| DipscanError::provider_fetch(NAME, format!("bad candle payload: {e}")))?;

        let rows = candles
            .into_iter()
            .filter_map(|(time, _low, _high, _open, close, _volume)| {
                Decimal::from_f64_retain(close).map(|price| RawRow {
                    stamp: RawStamp::Epoch(time),
                    price,
                })
            })
            .collect();

        Ok(RawSeries {
            rows,
            unit: TimestampUnit::Seconds,
            native_interval: granularity,
        })
    }
}
