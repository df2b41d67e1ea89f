//! Dipscan orchestrates price-history analysis across multiple providers.
//!
//! Overview
//! - Routes requests to connectors that implement the `dipscan_core`
//!   [`PriceHistoryProvider`] contract.
//! - Normalizes every provider's raw payload into one canonical UTC series
//!   before any analysis runs, so results are comparable across sources.
//! - Answers two questions: at what UTC time of day has an asset
//!   historically been cheapest, and how would a ladder of discounted limit
//!   orders have filled over a past window.
//!
//! Key behaviors
//! - `best_time_all` fans out concurrently over every registered connector
//!   and captures each source's failure in its own result row; one slow or
//!   broken provider never sinks the batch.
//! - Every provider call is bounded by a configurable timeout (10s by
//!   default) and surfaces as `ProviderTimeout` when exceeded.
//! - Bucketing granularity follows the cadence: sub-daily data is grouped
//!   by hour and minute, coarser data by hour only.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use dipscan::{Dipscan, Period, SamplingInterval};
//!
//! let scan = Dipscan::builder()
//!     .with_connector(Arc::new(dipscan_coinbase::CoinbaseConnector::default()))
//!     .with_connector(Arc::new(dipscan_coingecko::CoingeckoConnector::default()))
//!     .build()?;
//!
//! let results = scan
//!     .best_time_all("BTC-USD", Period::Days(30), SamplingInterval::M60)
//!     .await;
//! for r in &results {
//!     match &r.outcome {
//!         Ok(best) => println!("{}: {} at {}", r.source, best.mean_price, best.bucket),
//!         Err(e) => eprintln!("{}: {e}", r.source),
//!     }
//! }
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{Dipscan, DipscanBuilder};

// Re-export core types for convenience
pub use dipscan_core::{
    AnalysisResult,
    BestTime,
    BucketGranularity,
    DipscanError,
    DiscountTier,
    FillResult,
    LadderOutcome,
    Period,
    PriceHistoryProvider,
    PricePoint,
    PriceSeries,
    SamplingInterval,
    ScheduleComparison,
    Span,
    TimeBucketKey,
};
