use std::sync::Arc;
use std::time::Duration;

use dipscan_core::{
    DipscanError, PriceHistoryProvider, PriceSeries, SamplingInterval, Span, normalize,
};

const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrator that runs analyses across registered providers.
pub struct Dipscan {
    pub(crate) connectors: Vec<Arc<dyn PriceHistoryProvider>>,
    pub(crate) provider_timeout: Duration,
}

/// Builder for constructing a [`Dipscan`] orchestrator.
pub struct DipscanBuilder {
    connectors: Vec<Arc<dyn PriceHistoryProvider>>,
    provider_timeout: Duration,
}

impl Default for DipscanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DipscanBuilder {
    /// Create a new builder with no connectors and a 10s provider timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Register a provider connector.
    ///
    /// Duplicates are not deduplicated; avoid registering the same connector
    /// twice, since `best_time_all` fans out over every registration.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn PriceHistoryProvider>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set the per-provider request timeout.
    ///
    /// Applied to every fetch, single-source and fan-out alike. A provider
    /// exceeding it surfaces as `ProviderTimeout` rather than hanging the
    /// whole batch.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Build the `Dipscan` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered via
    /// [`with_connector`](Self::with_connector).
    pub fn build(self) -> Result<Dipscan, DipscanError> {
        if self.connectors.is_empty() {
            return Err(DipscanError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        Ok(Dipscan {
            connectors: self.connectors,
            provider_timeout: self.provider_timeout,
        })
    }
}

impl Dipscan {
    /// Start building a new `Dipscan` instance.
    ///
    /// Typical usage chains connector registration, e.g.:
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let scan = dipscan::Dipscan::builder()
    ///     .with_connector(Arc::new(dipscan_coinbase::CoinbaseConnector::default()))
    ///     .with_connector(Arc::new(dipscan_yahoo::YahooConnector::default()))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> DipscanBuilder {
        DipscanBuilder::new()
    }

    /// Names of the registered connectors, in registration order.
    #[must_use]
    pub fn sources(&self) -> Vec<&'static str> {
        self.connectors.iter().map(|c| c.name()).collect()
    }

    pub(crate) fn connector(
        &self,
        source: &str,
    ) -> Result<Arc<dyn PriceHistoryProvider>, DipscanError> {
        self.connectors
            .iter()
            .find(|c| c.name() == source)
            .cloned()
            .ok_or_else(|| {
                DipscanError::InvalidArg(format!(
                    "unknown source {source:?}; registered: {}",
                    self.sources().join(", ")
                ))
            })
    }

    /// Wrap a provider future with a timeout and standardized timeout error
    /// mapping.
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, DipscanError>
    where
        Fut: core::future::Future<Output = Result<T, DipscanError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(DipscanError::provider_timeout(connector_name)))
    }

    /// Fetch from one connector and normalize into the canonical series.
    pub(crate) async fn fetch_normalized(
        &self,
        connector: &Arc<dyn PriceHistoryProvider>,
        ticker: &str,
        span: Span,
        interval: SamplingInterval,
    ) -> Result<PriceSeries, DipscanError> {
        let name = connector.name();
        tracing::debug!(source = name, ticker, %interval, "fetching history");
        let raw = Self::provider_call_with_timeout(
            name,
            self.provider_timeout,
            connector.fetch(ticker, span, interval),
        )
        .await?;
        let series = normalize(raw, interval)?;
        tracing::debug!(source = name, points = series.len(), "normalized series");
        Ok(series)
    }

    /// Fetch price history from a named source, normalized to `interval`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unregistered source, `ProviderTimeout`
    /// when the fetch exceeds the configured timeout, and any fetch or
    /// normalization error otherwise.
    pub async fn fetch_series(
        &self,
        source: &str,
        ticker: &str,
        span: Span,
        interval: SamplingInterval,
    ) -> Result<PriceSeries, DipscanError> {
        let connector = self.connector(source)?;
        self.fetch_normalized(&connector, ticker, span, interval)
            .await
    }
}
