//! CSV ingestion of dated price observations.
//!
//! The file needs a header row with `Date` and `Price` columns (any case,
//! surrounding whitespace ignored); other columns are skipped. Any malformed
//! row fails the whole load, since a silently thinned series would distort
//! every downstream statistic.

use crate::errors::{SignalAnalysisError, SignalResult};
use crate::time_series::TimeSeries;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DATE_COLUMN: &str = "date";
const PRICE_COLUMN: &str = "price";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Loads a price series from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> SignalResult<TimeSeries> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| SignalAnalysisError::io(format!("open {}", path.display()), e))?;
    let series = load_csv_from_reader(file)?;
    log::info!("loaded {} observations from {}", series.len(), path.display());
    Ok(series)
}

/// Loads a price series from any CSV source.
///
/// The result is sorted ascending by date.
///
/// # Example
/// ```rust
/// use fractal_signals::loader::load_csv_from_reader;
///
/// let csv = "Date,Price\n2024-01-02,101.5\n2024-01-01,100.0\n";
/// let series = load_csv_from_reader(csv.as_bytes()).unwrap();
/// assert_eq!(series.values(), &[100.0, 101.5]);
/// ```
pub fn load_csv_from_reader<R: Read>(reader: R) -> SignalResult<TimeSeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| csv_error(&e))?.clone();
    let date_idx = find_column(&headers, DATE_COLUMN)?;
    let price_idx = find_column(&headers, PRICE_COLUMN)?;

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(&e))?;
        let line = record.position().map(|p| p.line() as usize);

        let date_field = field(&record, date_idx, DATE_COLUMN, line)?;
        let price_field = field(&record, price_idx, PRICE_COLUMN, line)?;

        let timestamp = parse_timestamp(date_field).ok_or_else(|| SignalAnalysisError::DataFormat {
            reason: format!("unrecognized date '{}'", date_field),
            line,
        })?;
        let price: f64 = price_field.parse().map_err(|_| SignalAnalysisError::DataFormat {
            reason: format!("invalid price '{}'", price_field),
            line,
        })?;
        if !price.is_finite() {
            return Err(SignalAnalysisError::DataFormat {
                reason: format!("non-finite price '{}'", price_field),
                line,
            });
        }

        points.push((timestamp, price));
    }

    if points.is_empty() {
        return Err(SignalAnalysisError::DataFormat {
            reason: "no data rows".to_string(),
            line: None,
        });
    }

    TimeSeries::new(points)
}

/// Parses the date formats accepted in the `Date` column.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::default()))
        })
}

fn find_column(headers: &StringRecord, name: &str) -> SignalResult<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| SignalAnalysisError::DataFormat {
            reason: format!("missing required column '{}'", name),
            line: Some(1),
        })
}

fn field<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &str,
    line: Option<usize>,
) -> SignalResult<&'r str> {
    match record.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SignalAnalysisError::DataFormat {
            reason: format!("missing value in column '{}'", column),
            line,
        }),
    }
}

fn csv_error(err: &csv::Error) -> SignalAnalysisError {
    SignalAnalysisError::DataFormat {
        reason: err.to_string(),
        line: err.position().map(|p| p.line() as usize),
    }
}
