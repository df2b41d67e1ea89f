//! The `Date,Close` flat file: written by the export utility, read back by
//! the comparison utilities. Two columns, header row `Date,Close`, ISO date
//! strings.

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::DipscanError;
use crate::types::{PricePoint, PriceSeries, SamplingInterval};

const HEADER: [&str; 2] = ["Date", "Close"];

/// Write a series of daily closes as `Date,Close` rows with ISO dates.
///
/// # Errors
/// Propagates I/O and CSV encoding failures.
pub fn write_closes(path: &Path, series: &PriceSeries) -> Result<(), DipscanError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for p in series.points() {
        writer.write_record([p.ts.date_naive().to_string(), p.price.to_string()])?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = series.len(), "wrote daily closes");
    Ok(())
}

/// Read a `Date,Close` file back into a daily series.
///
/// Dates are interpreted as UTC midnight. Rows that fail to parse are
/// rejected rather than skipped: a flat file is under our control, so a bad
/// row means a corrupt file, not a flaky provider.
///
/// # Errors
/// - `InvalidArg` when the header is missing or not `Date,Close`, or a row
///   fails to parse.
/// - `EmptySeries` when the file holds no data rows.
/// - I/O and CSV decoding failures are propagated.
pub fn read_closes(path: &Path) -> Result<PriceSeries, DipscanError> {
    let mut reader = csv::Reader::from_path(path)?;
    let header = reader.headers()?;
    if header.iter().ne(HEADER) {
        return Err(DipscanError::InvalidArg(format!(
            "expected header Date,Close, found {header:?}"
        )));
    }

    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let (Some(date), Some(close)) = (record.get(0), record.get(1)) else {
            return Err(DipscanError::InvalidArg(format!(
                "malformed row: {record:?}"
            )));
        };
        let date = chrono::NaiveDate::from_str(date)
            .map_err(|e| DipscanError::InvalidArg(format!("bad date '{date}': {e}")))?;
        let price = Decimal::from_str(close)
            .map_err(|e| DipscanError::InvalidArg(format!("bad close '{close}': {e}")))?;
        let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
            return Err(DipscanError::InvalidArg(format!("bad date '{date}'")));
        };
        points.push(PricePoint {
            ts: midnight.and_utc(),
            price,
        });
    }
    if points.is_empty() {
        return Err(DipscanError::EmptySeries);
    }
    Ok(PriceSeries::new(points, SamplingInterval::D1))
}
