//! Time-of-day bucket aggregation: pool the same clock time across all
//! calendar days in a series and find the historically cheapest slot.

use std::collections::BTreeMap;

use chrono::Timelike;
use rust_decimal::Decimal;

use crate::error::DipscanError;
use crate::types::{BucketStat, BucketStats, PriceSeries, TimeBucketKey};

/// Bucketing granularity for the time-of-day aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketGranularity {
    /// Hour-of-day only (used for daily-cadence series).
    Hour,
    /// Hour and minute of day.
    HourMinute,
}

/// Group every point by its UTC time of day and compute the mean price per
/// bucket. Dates are discarded: 14:00 on Monday and 14:00 on Friday pool
/// into the same bucket.
///
/// # Errors
/// Returns `InsufficientData` when the series is empty, or when
/// `HourMinute` granularity is requested for a series sampled coarser than
/// one hour — minute buckets of daily bars would be meaningless noise.
pub fn bucket_stats(
    series: &PriceSeries,
    granularity: BucketGranularity,
) -> Result<BucketStats, DipscanError> {
    if series.is_empty() {
        return Err(DipscanError::insufficient(
            "cannot bucket an empty series",
        ));
    }
    if granularity == BucketGranularity::HourMinute && series.interval().is_coarser_than_hourly() {
        return Err(DipscanError::insufficient(format!(
            "minute granularity requires hourly or finer sampling, series is {}",
            series.interval()
        )));
    }

    let mut sums: BTreeMap<TimeBucketKey, (Decimal, u64)> = BTreeMap::new();
    for p in series.points() {
        let key = TimeBucketKey {
            hour: p.ts.hour(),
            minute: match granularity {
                BucketGranularity::Hour => None,
                BucketGranularity::HourMinute => Some(p.ts.minute()),
            },
        };
        let entry = sums.entry(key).or_insert((Decimal::ZERO, 0));
        entry.0 += p.price;
        entry.1 += 1;
    }

    let buckets = sums
        .into_iter()
        .map(|(key, (sum, samples))| {
            (
                key,
                BucketStat {
                    mean: sum / Decimal::from(samples),
                    samples,
                },
            )
        })
        .collect();
    Ok(BucketStats { buckets })
}

/// Find the bucket with the minimum historical mean price.
///
/// Ties on the exact minimum mean resolve to the earliest `(hour, minute)`
/// key, so the result is reproducible across runs.
///
/// # Errors
/// Same conditions as [`bucket_stats`].
pub fn find_cheapest_bucket(
    series: &PriceSeries,
    granularity: BucketGranularity,
) -> Result<(TimeBucketKey, Decimal), DipscanError> {
    let stats = bucket_stats(series, granularity)?;
    // BTreeMap iterates in key order, and the strict `<` keeps the first
    // (earliest) key on ties.
    let mut best: Option<(TimeBucketKey, Decimal)> = None;
    for (key, stat) in &stats.buckets {
        match best {
            Some((_, mean)) if stat.mean >= mean => {}
            _ => best = Some((*key, stat.mean)),
        }
    }
    best.ok_or_else(|| DipscanError::insufficient("no buckets produced"))
}
