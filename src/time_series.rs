//! The shared input value: an ordered, immutable price series.

use crate::errors::{validate_all_finite, SignalResult};
use chrono::{Duration, NaiveDateTime};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered sequence of `(timestamp, value)` observations.
///
/// Timestamps are non-decreasing and every value is finite. Analyzers only
/// borrow the series; nothing mutates it after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Builds a series from unsorted observations.
    ///
    /// Observations are stable-sorted ascending by timestamp, so equal
    /// timestamps keep their input order. Fails with `DataFormat` if any
    /// value is NaN or infinite.
    pub fn new(mut points: Vec<(NaiveDateTime, f64)>) -> SignalResult<Self> {
        points.sort_by_key(|&(ts, _)| ts);
        let (timestamps, values): (Vec<_>, Vec<_>) = points.into_iter().unzip();
        validate_all_finite(&values, "price series")?;
        Ok(Self { timestamps, values })
    }

    /// Builds a series from bare values, one per day starting 1970-01-01.
    ///
    /// Intended for synthetic data where only the sample order matters.
    pub fn from_values(values: &[f64]) -> SignalResult<Self> {
        validate_all_finite(values, "price series")?;
        let epoch = NaiveDateTime::default();
        let timestamps = (0..values.len())
            .map(|i| epoch + Duration::days(i as i64))
            .collect();
        Ok(Self {
            timestamps,
            values: values.to_vec(),
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the series holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observed values in timestamp order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Timestamps, aligned index-for-index with [`values`](Self::values).
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Iterates `(timestamp, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }

    /// Earliest observation.
    pub fn first(&self) -> Option<(NaiveDateTime, f64)> {
        self.iter().next()
    }

    /// Latest observation.
    pub fn last(&self) -> Option<(NaiveDateTime, f64)> {
        Some((*self.timestamps.last()?, *self.values.last()?))
    }
}
