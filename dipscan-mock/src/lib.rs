//! Deterministic fixture connector for CI-safe tests and offline runs.
//!
//! Prices follow a fixed daily shape: cheapest at 07:00 UTC, climbing by one
//! currency unit per hour of distance from it. Two magic tickers exercise
//! failure paths: `FAIL` always errors, `TIMEOUT` sleeps long enough for a
//! tight orchestrator deadline to expire.

use async_trait::async_trait;
use chrono::Timelike;
use rust_decimal::Decimal;

use dipscan_core::{
    DipscanError, PriceHistoryProvider, RawRow, RawSeries, RawStamp, SamplingInterval, Span,
    TimestampUnit,
};

/// The artificial daily low, in currency units.
const BASE_PRICE: i64 = 50;
/// Hour of day (UTC) at which the fixture series bottoms out.
pub const CHEAPEST_HOUR: u32 = 7;

/// Mock connector with deterministic data.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Build the connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn price_at(ts: chrono::DateTime<chrono::Utc>) -> Decimal {
        let distance = i64::from(ts.hour().abs_diff(CHEAPEST_HOUR));
        Decimal::from(BASE_PRICE + distance)
    }
}

#[async_trait]
impl PriceHistoryProvider for MockConnector {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(
        &self,
        ticker: &str,
        span: Span,
        interval: SamplingInterval,
    ) -> Result<RawSeries, DipscanError> {
        match ticker {
            "FAIL" => {
                return Err(DipscanError::provider_fetch(
                    "mock",
                    "forced failure for tests",
                ));
            }
            "TIMEOUT" => {
                // Long enough for an orchestrator configured with a short
                // deadline to observe the timeout path.
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
            _ => {}
        }

        let step = interval.duration_secs();
        let first = span.start.timestamp().div_euclid(step) * step;
        let mut rows = Vec::new();
        let mut sec = first.max(span.start.timestamp());
        while sec < span.end.timestamp() {
            if let Some(ts) = chrono::DateTime::from_timestamp(sec, 0) {
                rows.push(RawRow {
                    stamp: RawStamp::Epoch(sec),
                    price: Self::price_at(ts),
                });
            }
            sec += step;
        }

        Ok(RawSeries {
            rows,
            unit: TimestampUnit::Seconds,
            native_interval: interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn span(days: i64) -> Span {
        Span::new(
            DateTime::from_timestamp(0, 0).unwrap(),
            DateTime::from_timestamp(days * 86_400, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fixture_bottoms_out_at_the_cheapest_hour() {
        let raw = MockConnector::new()
            .fetch("BTC-USD", span(2), SamplingInterval::M60)
            .await
            .unwrap();
        assert_eq!(raw.rows.len(), 48);
        let min = raw.rows.iter().map(|r| r.price).min().unwrap();
        assert_eq!(min, Decimal::from(BASE_PRICE));
    }

    #[tokio::test]
    async fn fail_ticker_errors() {
        let err = MockConnector::new()
            .fetch("FAIL", span(1), SamplingInterval::M60)
            .await
            .unwrap_err();
        assert!(matches!(err, DipscanError::ProviderFetch { .. }));
    }
}
