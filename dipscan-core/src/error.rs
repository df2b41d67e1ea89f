use thiserror::Error;

/// Unified error type for the dipscan workspace.
///
/// Every variant is recoverable at the request boundary: a single-source run
/// surfaces it as the terminal failure message for that run, and an
/// all-sources run captures it per source so one bad provider never blocks
/// the others. The core never exits the process.
#[derive(Debug, Error)]
pub enum DipscanError {
    /// No usable rows remained after parsing and normalization.
    #[error("no usable data after normalization")]
    EmptySeries,

    /// The requested sampling interval has no resampling rule defined.
    #[error("unsupported interval: {interval}")]
    UnsupportedInterval {
        /// Label of the interval that could not be resampled.
        interval: String,
    },

    /// The bucket analysis (or another derived computation) has nothing to
    /// group, or the series is too coarse for the requested granularity.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A provider fetch failed; includes the HTTP status and body when available.
    #[error("{provider} fetch failed: {msg}")]
    ProviderFetch {
        /// Provider name that failed.
        provider: String,
        /// Human-readable cause, including status and body when known.
        msg: String,
    },

    /// The ticker has no mapping to a provider-specific identifier.
    #[error("unknown ticker: no {provider} identifier for {ticker}")]
    UnknownTicker {
        /// Provider that lacks the mapping.
        provider: String,
        /// The requested ticker symbol.
        ticker: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {provider}")]
    ProviderTimeout {
        /// Provider name that timed out.
        provider: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Flat-file I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Flat-file encode/decode failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl DipscanError {
    /// Helper: build a `ProviderFetch` error with the provider name and cause.
    pub fn provider_fetch(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ProviderFetch {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `UnknownTicker` error.
    pub fn unknown_ticker(provider: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self::UnknownTicker {
            provider: provider.into(),
            ticker: ticker.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(provider: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            provider: provider.into(),
        }
    }

    /// Helper: build an `UnsupportedInterval` error from any labelled interval.
    pub fn unsupported_interval(interval: impl Into<String>) -> Self {
        Self::UnsupportedInterval {
            interval: interval.into(),
        }
    }

    /// Helper: build an `InsufficientData` error.
    pub fn insufficient(what: impl Into<String>) -> Self {
        Self::InsufficientData(what.into())
    }
}
