//! Trailing-window sample variance.

use crate::errors::{validate_window, SignalResult};
use crate::math_utils::sample_variance;
use crate::time_series::TimeSeries;
use chrono::NaiveDateTime;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Window used when the caller does not pick one
pub const DEFAULT_ROLLING_WINDOW: usize = 20;

/// Rolling variance aligned index-for-index with its source series.
///
/// Entries before the first full window are `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingVarianceSeries {
    window: usize,
    timestamps: Vec<NaiveDateTime>,
    variances: Vec<Option<f64>>,
}

impl RollingVarianceSeries {
    /// Window length used.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Same length as the source series.
    pub fn len(&self) -> usize {
        self.variances.len()
    }

    /// True if the source series was empty.
    pub fn is_empty(&self) -> bool {
        self.variances.is_empty()
    }

    /// Variance per index, `None` where undefined.
    pub fn values(&self) -> &[Option<f64>] {
        &self.variances
    }

    /// Source timestamps.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Iterates `(timestamp, variance)` over every index.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, Option<f64>)> + '_ {
        self.timestamps.iter().copied().zip(self.variances.iter().copied())
    }

    /// Only the defined entries.
    pub fn defined(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.iter().filter_map(|(ts, v)| v.map(|v| (ts, v)))
    }

    /// Largest defined variance and where it occurs (first one on ties).
    pub fn peak(&self) -> Option<(NaiveDateTime, f64)> {
        self.defined().fold(None, |best, (ts, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((ts, v)),
        })
    }
}

/// Trailing sample variance over `window` values ending at each index.
///
/// A window longer than the series is allowed and yields all-`None` output.
///
/// # Errors
/// `InvalidParameter` when `window < 2` (including zero and negative values).
///
/// # Example
/// ```rust
/// use fractal_signals::{rolling_variance, TimeSeries};
///
/// let series = TimeSeries::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
/// let rolling = rolling_variance(&series, 2).unwrap();
/// assert_eq!(rolling.values(), &[None, Some(0.5), Some(0.5), Some(0.5)]);
/// ```
pub fn rolling_variance(series: &TimeSeries, window: i64) -> SignalResult<RollingVarianceSeries> {
    let window = validate_window(window)?;
    let values = series.values();

    let variances = (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                Some(sample_variance(&values[i + 1 - window..=i]))
            }
        })
        .collect();

    Ok(RollingVarianceSeries {
        window,
        timestamps: series.timestamps().to_vec(),
        variances,
    })
}

/// Computes rolling variance with a fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolatilityAnalyzer {
    window: usize,
}

impl Default for VolatilityAnalyzer {
    fn default() -> Self {
        Self {
            window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

impl VolatilityAnalyzer {
    /// Analyzer with the given window; fails if `window < 2`.
    pub fn new(window: i64) -> SignalResult<Self> {
        Ok(Self {
            window: validate_window(window)?,
        })
    }

    /// Configured window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// See [`rolling_variance`].
    pub fn rolling_variance(&self, series: &TimeSeries) -> SignalResult<RollingVarianceSeries> {
        rolling_variance(series, self.window as i64)
    }
}
