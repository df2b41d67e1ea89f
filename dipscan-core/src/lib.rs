//! dipscan-core
//!
//! Canonical types, provider traits, and the analysis algorithms shared
//! across the dipscan workspace.
//!
//! - `types`: the canonical data model (series, intervals, buckets, tiers).
//! - `provider`: raw provider rows and the `PriceHistoryProvider` trait.
//! - `timeseries`: normalization, resampling, and interval resolution.
//! - `analysis`: cheapest-bucket search, DCA ladder simulation, schedule
//!   comparison.
//! - `flatfile`: the `Date,Close` export/import codec.
//!
//! Everything here is a pure, synchronous transformation over an in-memory
//! series; the only async surface is the `PriceHistoryProvider` trait that
//! connectors implement.
#![warn(missing_docs)]

/// Derived analyses over canonical series.
pub mod analysis;
/// Error taxonomy for the whole workspace.
pub mod error;
/// The `Date,Close` flat-file codec.
pub mod flatfile;
/// Provider boundary types and trait.
pub mod provider;
/// Normalization and interval resolution.
pub mod timeseries;
pub mod types;

pub use analysis::bucket::{BucketGranularity, bucket_stats, find_cheapest_bucket};
pub use analysis::ladder::{simulate, suggest_tiers};
pub use analysis::schedule::{Accumulation, ScheduleComparison, compare_schedules};
pub use error::DipscanError;
pub use provider::{PriceHistoryProvider, RawRow, RawSeries, RawStamp, TimestampUnit};
pub use timeseries::interval::resolve;
pub use timeseries::normalize::{normalize, resample};
pub use types::*;
