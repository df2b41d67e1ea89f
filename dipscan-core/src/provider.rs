//! The provider boundary: raw rows as adapters hand them over, and the trait
//! every data-source connector implements.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DipscanError;
use crate::types::{SamplingInterval, Span};

/// Native unit of the timestamps a provider returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampUnit {
    /// Seconds since the Unix epoch.
    Seconds,
    /// Milliseconds since the Unix epoch.
    Milliseconds,
    /// ISO-8601 / RFC 3339 text.
    Iso8601,
}

/// A provider-native timestamp, interpreted according to the batch's
/// [`TimestampUnit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawStamp {
    /// Numeric epoch value (seconds or milliseconds, per the declared unit).
    Epoch(i64),
    /// Textual timestamp (ISO-8601).
    Text(String),
}

/// One provider row before normalization: a native timestamp and the price
/// taken from the provider's designated price column. Every other column has
/// already been dropped by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// The provider-native timestamp.
    pub stamp: RawStamp,
    /// The price value for this row.
    pub price: Decimal,
}

/// The batch a connector hands to the normalizer: rows, their declared
/// timestamp unit, and the provider's native sampling interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSeries {
    /// Raw rows in provider order (the normalizer sorts).
    pub rows: Vec<RawRow>,
    /// Unit of every `stamp` in `rows`.
    pub unit: TimestampUnit,
    /// Cadence the provider actually served the data at.
    pub native_interval: SamplingInterval,
}

/// Role trait implemented by every data-source connector.
///
/// Connectors are thin: they fetch and reshape into [`RawSeries`], surfacing
/// failures as a single `ProviderFetch` error with a human-readable cause.
/// Normalization and all analysis happen downstream in the core.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Stable source identifier used in reports and error rows.
    fn name(&self) -> &'static str;

    /// Fetch raw history for `ticker` over `span` at (or as close as the
    /// provider allows to) `interval`.
    async fn fetch(
        &self,
        ticker: &str,
        span: Span,
        interval: SamplingInterval,
    ) -> Result<RawSeries, DipscanError>;
}
