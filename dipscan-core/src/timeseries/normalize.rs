//! Series normalization: one routine that reconciles heterogeneous
//! timestamp units and cadences into the canonical [`PriceSeries`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::DipscanError;
use crate::provider::{RawSeries, RawStamp, TimestampUnit};
use crate::types::{PricePoint, PriceSeries, SamplingInterval};

/// Data-driven mapping from sampling interval to resampling window length in
/// seconds. Single table consumed by [`resample`] for every provider, so
/// there is exactly one place a cadence rule can live.
const RESAMPLE_WINDOWS: [(SamplingInterval, i64); 7] = [
    (SamplingInterval::M1, 60),
    (SamplingInterval::M5, 300),
    (SamplingInterval::M15, 900),
    (SamplingInterval::M30, 1_800),
    (SamplingInterval::M60, 3_600),
    (SamplingInterval::H6, 21_600),
    (SamplingInterval::D1, 86_400),
];

fn resample_window_secs(interval: SamplingInterval) -> Option<i64> {
    RESAMPLE_WINDOWS
        .iter()
        .find(|(iv, _)| *iv == interval)
        .map(|(_, secs)| *secs)
}

fn parse_stamp(stamp: &RawStamp, unit: TimestampUnit) -> Option<DateTime<Utc>> {
    match (unit, stamp) {
        (TimestampUnit::Seconds, RawStamp::Epoch(s)) => DateTime::from_timestamp(*s, 0),
        (TimestampUnit::Milliseconds, RawStamp::Epoch(ms)) => DateTime::from_timestamp_millis(*ms),
        (TimestampUnit::Iso8601, RawStamp::Text(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        // Unit/stamp mismatch: the row is malformed and gets skipped.
        _ => None,
    }
}

/// Convert a raw provider batch into a canonical series at the requested
/// sampling interval.
///
/// Rows with unparseable timestamps or non-positive prices are skipped, not
/// fatal. When the requested interval differs from the provider's native
/// cadence, the series is resampled via [`resample`].
///
/// # Errors
/// - `EmptySeries` when zero rows survive parsing.
/// - `UnsupportedInterval` when the requested interval has no resampling rule.
pub fn normalize(
    raw: RawSeries,
    requested: SamplingInterval,
) -> Result<PriceSeries, DipscanError> {
    let total = raw.rows.len();
    let mut points = Vec::with_capacity(total);
    for row in raw.rows {
        let Some(ts) = parse_stamp(&row.stamp, raw.unit) else {
            continue;
        };
        if row.price <= Decimal::ZERO {
            continue;
        }
        points.push(PricePoint {
            ts,
            price: row.price,
        });
    }
    if points.len() < total {
        tracing::debug!(kept = points.len(), total, "dropped malformed provider rows");
    }
    if points.is_empty() {
        return Err(DipscanError::EmptySeries);
    }

    let series = PriceSeries::new(points, raw.native_interval);
    if requested == raw.native_interval {
        return Ok(series);
    }
    resample(&series, requested)
}

/// Resample a series by averaging all points that fall within each
/// interval-aligned window.
///
/// Windows with zero observations are dropped, never interpolated: a
/// fabricated point would bias the lowest-price search toward sparse hours.
/// Output timestamps sit at the window start, which makes the operation
/// idempotent: resampling an already-resampled series at the same interval
/// returns it unchanged.
///
/// # Errors
/// - `UnsupportedInterval` when `target` has no entry in the resampling table.
/// - `EmptySeries` when the input holds no observations.
pub fn resample(
    series: &PriceSeries,
    target: SamplingInterval,
) -> Result<PriceSeries, DipscanError> {
    let step = resample_window_secs(target)
        .ok_or_else(|| DipscanError::unsupported_interval(target.label()))?;
    if series.is_empty() {
        return Err(DipscanError::EmptySeries);
    }

    let mut out: Vec<PricePoint> = Vec::new();
    let mut cur_window: Option<i64> = None;
    let mut sum = Decimal::ZERO;
    let mut count: u32 = 0;

    let flush = |window: i64, sum: Decimal, count: u32, out: &mut Vec<PricePoint>| {
        if let Some(ts) = DateTime::from_timestamp(window, 0) {
            out.push(PricePoint {
                ts,
                price: sum / Decimal::from(count),
            });
        }
    };

    for p in series.points() {
        let window = p.ts.timestamp().div_euclid(step) * step;
        match cur_window {
            Some(w) if w == window => {
                sum += p.price;
                count += 1;
            }
            Some(w) => {
                flush(w, sum, count, &mut out);
                cur_window = Some(window);
                sum = p.price;
                count = 1;
            }
            None => {
                cur_window = Some(window);
                sum = p.price;
                count = 1;
            }
        }
    }
    if let Some(w) = cur_window {
        flush(w, sum, count, &mut out);
    }

    Ok(PriceSeries::new(out, target))
}
