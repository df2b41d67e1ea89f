use chrono::{DateTime, Utc};
use dipscan_core::flatfile::{read_closes, write_closes};
use dipscan_core::{DipscanError, PricePoint, PriceSeries, SamplingInterval, compare_schedules};
use rust_decimal_macros::dec;
use std::io::Write;

fn daily_series(days: &[(&str, &str)]) -> PriceSeries {
    PriceSeries::new(
        days.iter()
            .map(|(date, price)| PricePoint {
                ts: format!("{date}T00:00:00Z").parse::<DateTime<Utc>>().unwrap(),
                price: price.parse().unwrap(),
            })
            .collect(),
        SamplingInterval::D1,
    )
}

#[test]
fn round_trips_daily_closes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("btc_prices.csv");
    let series = daily_series(&[
        ("2024-01-01", "42000.5"),
        ("2024-01-02", "43100"),
        ("2024-01-03", "41250.25"),
    ]);

    write_closes(&path, &series).unwrap();
    let back = read_closes(&path).unwrap();
    assert_eq!(back, series);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Date,Close\n2024-01-01,42000.5\n"));
}

#[test]
fn rejects_wrong_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "Timestamp,Price").unwrap();
    writeln!(f, "2024-01-01,100").unwrap();
    drop(f);
    assert!(matches!(
        read_closes(&path),
        Err(DipscanError::InvalidArg(_))
    ));
}

#[test]
fn header_only_file_is_empty_series() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "Date,Close\n").unwrap();
    assert!(matches!(read_closes(&path), Err(DipscanError::EmptySeries)));
}

#[test]
fn schedule_comparison_over_exported_closes() {
    // Constant price of 100 over January: daily spends 31 * 10, the
    // twice-monthly schedule spends 2 * 150 and acquires less.
    let days: Vec<(String, &str)> = (1..=31)
        .map(|d| (format!("2024-01-{d:02}"), "100"))
        .collect();
    let borrowed: Vec<(&str, &str)> = days.iter().map(|(d, p)| (d.as_str(), *p)).collect();
    let series = daily_series(&borrowed);

    let cmp = compare_schedules(&series, dec!(10)).unwrap();
    assert_eq!(cmp.daily.cost, dec!(310));
    assert_eq!(cmp.daily.quantity, dec!(3.1));
    assert_eq!(cmp.twice_monthly.cost, dec!(300));
    assert_eq!(cmp.twice_monthly.quantity, dec!(3));
    assert_eq!(cmp.quantity_difference(), dec!(0.1));
}

#[test]
fn schedule_comparison_rejects_bad_amounts() {
    let series = daily_series(&[("2024-01-01", "100")]);
    assert!(matches!(
        compare_schedules(&series, dec!(0)),
        Err(DipscanError::InvalidArg(_))
    ));
}
