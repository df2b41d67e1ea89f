use chrono::{DateTime, Utc};
use dipscan_core::{
    BucketGranularity, DipscanError, PricePoint, PriceSeries, SamplingInterval, bucket_stats,
    find_cheapest_bucket,
};
use rust_decimal_macros::dec;

fn t(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn series(points: &[(i64, &str)], interval: SamplingInterval) -> PriceSeries {
    PriceSeries::new(
        points
            .iter()
            .map(|(sec, price)| PricePoint {
                ts: t(*sec),
                price: price.parse().unwrap(),
            })
            .collect(),
        interval,
    )
}

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

#[test]
fn empty_series_is_insufficient_data() {
    let s = series(&[], SamplingInterval::M60);
    let err = find_cheapest_bucket(&s, BucketGranularity::Hour).unwrap_err();
    assert!(matches!(err, DipscanError::InsufficientData(_)));
}

#[test]
fn minute_granularity_on_coarse_series_is_insufficient_data() {
    let s = series(&[(0, "10")], SamplingInterval::H6);
    let err = bucket_stats(&s, BucketGranularity::HourMinute).unwrap_err();
    assert!(matches!(err, DipscanError::InsufficientData(_)));
}

#[test]
fn minute_granularity_on_hourly_series_is_allowed() {
    let s = series(&[(0, "10"), (HOUR, "20")], SamplingInterval::M60);
    assert!(bucket_stats(&s, BucketGranularity::HourMinute).is_ok());
}

#[test]
fn pools_the_same_clock_time_across_days() {
    // 14:00 on three different days, one 15:00 outlier.
    let s = series(
        &[
            (14 * HOUR, "10"),
            (DAY + 14 * HOUR, "20"),
            (2 * DAY + 14 * HOUR, "30"),
            (15 * HOUR, "100"),
        ],
        SamplingInterval::M60,
    );
    let stats = bucket_stats(&s, BucketGranularity::Hour).unwrap();
    assert_eq!(stats.buckets.len(), 2);
    let fourteen = stats
        .buckets
        .iter()
        .find(|(k, _)| k.hour == 14)
        .map(|(_, v)| *v)
        .unwrap();
    assert_eq!(fourteen.mean, dec!(20));
    assert_eq!(fourteen.samples, 3);
}

#[test]
fn cheapest_bucket_mean_is_minimal() {
    let s = series(
        &[
            (0, "30"),
            (6 * HOUR, "10"),
            (12 * HOUR, "20"),
            (DAY + 6 * HOUR, "14"),
        ],
        SamplingInterval::M60,
    );
    let (key, mean) = find_cheapest_bucket(&s, BucketGranularity::Hour).unwrap();
    assert_eq!(key.hour, 6);
    assert_eq!(key.minute, None);
    assert_eq!(mean, dec!(12));
    let stats = bucket_stats(&s, BucketGranularity::Hour).unwrap();
    assert!(stats.buckets.values().all(|b| b.mean >= mean));
}

#[test]
fn tie_breaks_to_the_earliest_key() {
    // 00:00 and 12:00 share the exact minimum mean.
    let s = series(&[(0, "50"), (12 * HOUR, "50")], SamplingInterval::M60);
    let (key, mean) = find_cheapest_bucket(&s, BucketGranularity::Hour).unwrap();
    assert_eq!(key.hour, 0);
    assert_eq!(mean, dec!(50));
}

#[test]
fn hour_minute_granularity_keeps_minutes_apart() {
    let s = series(
        &[(14 * HOUR, "10"), (14 * HOUR + 300, "7")],
        SamplingInterval::M5,
    );
    let (key, mean) = find_cheapest_bucket(&s, BucketGranularity::HourMinute).unwrap();
    assert_eq!((key.hour, key.minute), (14, Some(5)));
    assert_eq!(mean, dec!(7));
    assert_eq!(key.to_string(), "14:05");
}
