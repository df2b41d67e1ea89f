//! Yahoo Finance v8 chart connector.
//!
//! Timestamps arrive in epoch seconds alongside a dense close array with
//! nullable entries (halted bars); nulls are dropped at the boundary. Yahoo
//! has no native six-hour cadence, so an `H6` request is fetched at `60m`
//! and left to downstream resampling.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use dipscan_core::{
    DipscanError, PriceHistoryProvider, RawRow, RawSeries, RawStamp, SamplingInterval, Span,
    TimestampUnit,
};

const NAME: &str = "yahoo";
const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Connector for the public Yahoo Finance chart endpoint.
pub struct YahooConnector {
    http: reqwest::Client,
    base_url: String,
}

/// Builder for [`YahooConnector`].
#[derive(Default)]
pub struct YahooBuilder {
    base_url: Option<String>,
    http: Option<reqwest::Client>,
}

impl YahooBuilder {
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
    pub fn build(self) -> YahooConnector {
        YahooConnector {
            http: self.http.unwrap_or_default(),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl Default for YahooConnector {
    fn default() -> Self {
        YahooBuilder::new().build()
    }
}

impl YahooConnector {
    /// Start building a connector.
    #[must_use]
    pub fn builder() -> YahooBuilder {
        YahooBuilder::new()
    }

    /// The cadence actually requested from Yahoo: identical to the caller's
    /// interval except for `H6`, which Yahoo cannot serve natively.
    const fn effective_interval(interval: SamplingInterval) -> SamplingInterval {
        match interval {
            SamplingInterval::H6 => SamplingInterval::M60,
            other => other,
        }
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(
        &self,
        ticker: &str,
        span: Span,
        interval: SamplingInterval,
    ) -> Result<RawSeries, DipscanError> {
        let effective = Self::effective_interval(interval);
        let url = format!("{}/v8/finance/chart/{ticker}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("period1", span.start.timestamp().to_string()),
                ("period2", span.end.timestamp().to_string()),
                ("interval", effective.label().to_string()),
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

        let envelope: ChartEnvelope = resp
            .json()
            .await
            .map_err(|e| DipscanError::provider_fetch(NAME, format!("bad chart payload: {e}")))?;

        if let Some(err) = envelope.chart.error {
            if err.code == "Not Found" {
                return Err(DipscanError::unknown_ticker(NAME, ticker));
            }
            return Err(DipscanError::provider_fetch(
                NAME,
                format!("{}: {}", err.code, err.description),
            ));
        }
        let Some(result) = envelope
            .chart
            .result
            .and_then(|mut r| (!r.is_empty()).then(|| r.remove(0)))
        else {
            return Err(DipscanError::provider_fetch(NAME, "empty chart result"));
        };
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Err(DipscanError::provider_fetch(NAME, "missing quote block"));
        };

        let rows = result
            .timestamp
            .into_iter()
            .zip(quote.close)
            .filter_map(|(ts, close)| {
                close
                    .and_then(Decimal::from_f64_retain)
                    .map(|price| RawRow {
                        stamp: RawStamp::Epoch(ts),
                        price,
                    })
            })
            .collect();

        Ok(RawSeries {
            rows,
            unit: TimestampUnit::Seconds,
            native_interval: effective,
        })
    }
}
