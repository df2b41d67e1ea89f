//! Canonical data model shared by connectors, the orchestrator, and the
//! analysis layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DipscanError;

/// Sampling cadence of a canonical price series.
///
/// The enumeration is ordered from finest to coarsest; `duration_secs` is
/// strictly increasing across that order, which the interval resolver relies
/// on when it degrades a request to stay under a provider's point budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SamplingInterval {
    /// One minute.
    M1,
    /// Five minutes.
    M5,
    /// Fifteen minutes.
    M15,
    /// Thirty minutes.
    M30,
    /// Sixty minutes.
    M60,
    /// Six hours.
    H6,
    /// One day.
    D1,
}

impl SamplingInterval {
    /// All intervals, finest first.
    pub const ALL: [Self; 7] = [
        Self::M1,
        Self::M5,
        Self::M15,
        Self::M30,
        Self::M60,
        Self::H6,
        Self::D1,
    ];

    /// Window duration in seconds.
    #[must_use]
    pub const fn duration_secs(self) -> i64 {
        match self {
            Self::M1 => 60,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::M30 => 1_800,
            Self::M60 => 3_600,
            Self::H6 => 21_600,
            Self::D1 => 86_400,
        }
    }

    /// Canonical label as accepted on the command line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::M60 => "60m",
            Self::H6 => "6h",
            Self::D1 => "1d",
        }
    }

    /// The next coarser interval, or `None` when already at `D1`.
    #[must_use]
    pub const fn next_coarser(self) -> Option<Self> {
        match self {
            Self::M1 => Some(Self::M5),
            Self::M5 => Some(Self::M15),
            Self::M15 => Some(Self::M30),
            Self::M30 => Some(Self::M60),
            Self::M60 => Some(Self::H6),
            Self::H6 => Some(Self::D1),
            Self::D1 => None,
        }
    }

    /// Whether the cadence is strictly coarser than one hour.
    #[must_use]
    pub const fn is_coarser_than_hourly(self) -> bool {
        self.duration_secs() > 3_600
    }
}

impl fmt::Display for SamplingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SamplingInterval {
    type Err = DipscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "30m" => Ok(Self::M30),
            // "1h" is a common spelling for the hourly cadence.
            "60m" | "1h" => Ok(Self::M60),
            "6h" => Ok(Self::H6),
            "1d" => Ok(Self::D1),
            other => Err(DipscanError::unsupported_interval(other)),
        }
    }
}

/// A half-open UTC time window `[start, end)` to fetch history for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive window start.
    pub start: DateTime<Utc>,
    /// Exclusive window end.
    pub end: DateTime<Utc>,
}

impl Span {
    /// Build a span, validating that `start` precedes `end`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DipscanError> {
        if start >= end {
            return Err(DipscanError::InvalidArg(format!(
                "span start {start} must precede end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window length in whole seconds.
    #[must_use]
    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// A lookback period expressed the way the CLI accepts it (`5d`, `1mo`, `2y`,
/// `ytd`, `max`), resolved against a caller-supplied "now" so the mapping
/// stays deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// A number of calendar days.
    Days(u32),
    /// A number of calendar months.
    Months(u32),
    /// A number of calendar years.
    Years(u32),
    /// From January 1st of the current year.
    YearToDate,
    /// The maximum supported window (ten years).
    Max,
}

impl Period {
    /// Resolve the period into a concrete span ending at `now`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the resolved window is empty (e.g. `ytd`
    /// exactly at midnight on January 1st) or when the subtraction leaves the
    /// supported calendar range.
    pub fn resolve(self, now: DateTime<Utc>) -> Result<Span, DipscanError> {
        let start = match self {
            Self::Days(d) => now - Duration::days(i64::from(d)),
            Self::Months(m) => now
                .checked_sub_months(Months::new(m))
                .ok_or_else(|| DipscanError::InvalidArg(format!("period {m}mo out of range")))?,
            Self::Years(y) => {
                let months = y.checked_mul(12).ok_or_else(|| {
                    DipscanError::InvalidArg(format!("period {y}y out of range"))
                })?;
                now.checked_sub_months(Months::new(months))
                    .ok_or_else(|| DipscanError::InvalidArg(format!("period {y}y out of range")))?
            }
            Self::YearToDate => Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .single()
                .ok_or_else(|| DipscanError::InvalidArg("cannot resolve ytd".to_string()))?,
            Self::Max => now
                .checked_sub_months(Months::new(120))
                .ok_or_else(|| DipscanError::InvalidArg("period max out of range".to_string()))?,
        };
        Span::new(start, now)
    }
}

impl FromStr for Period {
    type Err = DipscanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            DipscanError::InvalidArg(format!(
                "invalid period '{s}'; expected e.g. 5d, 1mo, 2y, ytd, max"
            ))
        };
        match s {
            "ytd" => return Ok(Self::YearToDate),
            "max" => return Ok(Self::Max),
            _ => {}
        }
        let (digits, suffix) = s.split_at(s.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?);
        let n: u32 = digits.parse().map_err(|_| invalid())?;
        if n == 0 {
            return Err(invalid());
        }
        match suffix {
            "d" => Ok(Self::Days(n)),
            "mo" => Ok(Self::Months(n)),
            "y" => Ok(Self::Years(n)),
            _ => Err(invalid()),
        }
    }
}

/// A single observation in a canonical series. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Observation instant, always UTC.
    pub ts: DateTime<Utc>,
    /// Observed price, strictly positive.
    pub price: Decimal,
}

/// An ordered, deduplicated price series at a resolved sampling interval.
///
/// Timestamps are strictly increasing; constructors sort input and drop
/// duplicate timestamps (first occurrence wins). Every transformation
/// produces a new series rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    interval: SamplingInterval,
}

impl PriceSeries {
    /// Build a series from unordered points, sorting and dropping duplicate
    /// timestamps (the first occurrence of a timestamp wins).
    #[must_use]
    pub fn new(mut points: Vec<PricePoint>, interval: SamplingInterval) -> Self {
        points.sort_by_key(|p| p.ts);
        points.dedup_by(|a, b| a.ts == b.ts);
        Self { points, interval }
    }

    /// The ordered observations.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The resolved sampling interval.
    #[must_use]
    pub const fn interval(&self) -> SamplingInterval {
        self.interval
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The earliest observation, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// The most recent observation, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Arithmetic mean price over the whole series, `None` when empty.
    #[must_use]
    pub fn mean_price(&self) -> Option<Decimal> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Decimal = self.points.iter().map(|p| p.price).sum();
        Some(sum / Decimal::from(self.points.len()))
    }
}

/// A recurring time-of-day slot used to pool prices across calendar days.
///
/// `minute: None` means the bucket is hour-only (daily-interval mode). The
/// derived ordering (hour, then minute) is what makes the cheapest-bucket
/// tie-break deterministic: the earliest key wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeBucketKey {
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Minute of hour, 0–59, absent in hour-only mode.
    pub minute: Option<u32>,
}

impl fmt::Display for TimeBucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute.unwrap_or(0))
    }
}

/// Mean price and sample count for one bucket. Sample count is always >= 1;
/// empty buckets are never materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStat {
    /// Arithmetic mean price of the bucket.
    pub mean: Decimal,
    /// Number of observations pooled into the bucket.
    pub samples: u64,
}

/// Per-bucket statistics, ordered by bucket key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BucketStats {
    /// Mean/count per present bucket; iteration order is key order.
    pub buckets: BTreeMap<TimeBucketKey, BucketStat>,
}

/// One rung of a limit-order ladder: a percentage discount off a reference
/// price and the budget allocated at that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    /// Discount below the reference price, in percent (>= 0).
    pub discount_pct: Decimal,
    /// Budget allocated to this tier, in currency units (> 0).
    pub budget: Decimal,
}

/// Outcome of one tier in a ladder simulation. Created once per tier per run
/// and never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillResult {
    /// Index of the tier within the submitted ladder.
    pub tier: usize,
    /// Limit price derived from the reference price and the tier discount.
    pub limit_price: Decimal,
    /// Timestamp of the first bar at or below the limit, absent when the
    /// tier never filled.
    pub filled_at: Option<DateTime<Utc>>,
    /// Quantity acquired (`budget / fill price`), zero when unfilled.
    pub quantity: Decimal,
}

impl FillResult {
    /// Whether the tier found a qualifying bar.
    #[must_use]
    pub const fn is_filled(&self) -> bool {
        self.filled_at.is_some()
    }
}

/// Aggregate outcome of a ladder simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderOutcome {
    /// One result per submitted tier, in tier order.
    pub fills: Vec<FillResult>,
    /// Budget that actually filled (sum over filled tiers).
    pub invested: Decimal,
    /// Quantity acquired across filled tiers.
    pub quantity: Decimal,
    /// Volume-weighted average fill price; `None` when nothing filled, since
    /// the division is mathematically undefined in that case.
    pub average_fill_price: Option<Decimal>,
}

/// The cheapest recurring time window found by the bucket analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestTime {
    /// The winning bucket.
    pub bucket: TimeBucketKey,
    /// Its historical mean price.
    pub mean_price: Decimal,
}

/// The unit handed to the report layer for one source: either a best-time
/// answer or the error that source produced.
#[derive(Debug)]
pub struct AnalysisResult {
    /// Source identifier (connector name).
    pub source: String,
    /// The analysis outcome for that source.
    pub outcome: Result<BestTime, DipscanError>,
}
