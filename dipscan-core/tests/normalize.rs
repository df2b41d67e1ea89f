use chrono::{DateTime, Utc};
use dipscan_core::{
    DipscanError, RawRow, RawSeries, RawStamp, SamplingInterval, TimestampUnit, normalize,
};
use rust_decimal_macros::dec;

fn t(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn epoch_rows(rows: &[(i64, &str)]) -> Vec<RawRow> {
    rows.iter()
        .map(|(ts, price)| RawRow {
            stamp: RawStamp::Epoch(*ts),
            price: price.parse().unwrap(),
        })
        .collect()
}

#[test]
fn zero_rows_is_empty_series_error() {
    let raw = RawSeries {
        rows: vec![],
        unit: TimestampUnit::Seconds,
        native_interval: SamplingInterval::M5,
    };
    let err = normalize(raw, SamplingInterval::M5).unwrap_err();
    assert!(matches!(err, DipscanError::EmptySeries));
}

#[test]
fn all_rows_malformed_is_empty_series_error() {
    // Text stamps under a numeric unit, plus a non-positive price.
    let raw = RawSeries {
        rows: vec![
            RawRow {
                stamp: RawStamp::Text("not-a-time".to_string()),
                price: dec!(10),
            },
            RawRow {
                stamp: RawStamp::Epoch(60),
                price: dec!(0),
            },
        ],
        unit: TimestampUnit::Seconds,
        native_interval: SamplingInterval::M1,
    };
    let err = normalize(raw, SamplingInterval::M1).unwrap_err();
    assert!(matches!(err, DipscanError::EmptySeries));
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let mut rows = epoch_rows(&[(0, "100"), (60, "101")]);
    rows.push(RawRow {
        stamp: RawStamp::Epoch(120),
        price: dec!(-5),
    });
    let raw = RawSeries {
        rows,
        unit: TimestampUnit::Seconds,
        native_interval: SamplingInterval::M1,
    };
    let series = normalize(raw, SamplingInterval::M1).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn native_interval_passes_through_sorted_and_deduped() {
    let raw = RawSeries {
        rows: epoch_rows(&[(120, "3"), (0, "1"), (60, "2"), (0, "9")]),
        unit: TimestampUnit::Seconds,
        native_interval: SamplingInterval::M1,
    };
    let series = normalize(raw, SamplingInterval::M1).unwrap();
    let ts: Vec<_> = series.points().iter().map(|p| p.ts).collect();
    assert_eq!(ts, vec![t(0), t(60), t(120)]);
    // First occurrence of the duplicate timestamp wins.
    assert_eq!(series.points()[0].price, dec!(1));
}

#[test]
fn millisecond_and_iso_stamps_land_on_the_same_instant() {
    let ms = RawSeries {
        rows: vec![RawRow {
            stamp: RawStamp::Epoch(90_000),
            price: dec!(42),
        }],
        unit: TimestampUnit::Milliseconds,
        native_interval: SamplingInterval::M1,
    };
    let iso = RawSeries {
        rows: vec![RawRow {
            stamp: RawStamp::Text("1970-01-01T00:01:30Z".to_string()),
            price: dec!(42),
        }],
        unit: TimestampUnit::Iso8601,
        native_interval: SamplingInterval::M1,
    };
    let a = normalize(ms, SamplingInterval::M1).unwrap();
    let b = normalize(iso, SamplingInterval::M1).unwrap();
    assert_eq!(a.points()[0].ts, b.points()[0].ts);
}

#[test]
fn resampling_averages_within_aligned_windows_and_drops_empty_ones() {
    // Two points in the first 5m window, nothing for the second window,
    // one point in the third.
    let raw = RawSeries {
        rows: epoch_rows(&[(0, "10"), (60, "20"), (660, "40")]),
        unit: TimestampUnit::Seconds,
        native_interval: SamplingInterval::M1,
    };
    let series = normalize(raw, SamplingInterval::M5).unwrap();
    assert_eq!(series.interval(), SamplingInterval::M5);
    assert_eq!(series.len(), 2);
    assert_eq!(series.points()[0].ts, t(0));
    assert_eq!(series.points()[0].price, dec!(15));
    assert_eq!(series.points()[1].ts, t(600));
    assert_eq!(series.points()[1].price, dec!(40));
}
