//! Linear price trend fitted against the observation index.

use crate::errors::{validate_data_length, SignalResult};
use crate::math_utils::ols_regression;
use crate::time_series::TimeSeries;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum series length for a trend line
pub const MIN_TREND_POINTS: usize = 2;

/// Least-squares line `value = slope * x + intercept` with `x = 1..=n`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearTrend {
    /// Change in value per observation
    pub slope: f64,
    /// Value extrapolated to `x = 0`
    pub intercept: f64,
    /// Number of observations fitted
    pub observations: usize,
}

impl LinearTrend {
    /// Value predicted at 1-based position `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Prediction for the observation following the last one (`x = n + 1`).
    pub fn forecast_next(&self) -> f64 {
        self.predict((self.observations + 1) as f64)
    }
}

/// Fits a linear trend to the series, indexing observations from 1.
///
/// Timestamps are not used: observations are assumed evenly spaced.
///
/// # Example
/// ```rust
/// use fractal_signals::{fit_linear_trend, TimeSeries};
///
/// let series = TimeSeries::from_values(&[3.0, 5.0, 7.0]).unwrap();
/// let trend = fit_linear_trend(&series).unwrap();
/// assert!((trend.forecast_next() - 9.0).abs() < 1e-10);
/// ```
pub fn fit_linear_trend(series: &TimeSeries) -> SignalResult<LinearTrend> {
    let values = series.values();
    validate_data_length(values, MIN_TREND_POINTS, "trend fit")?;

    let x: Vec<f64> = (1..=values.len()).map(|i| i as f64).collect();
    let (slope, intercept) = ols_regression(&x, values)?;

    Ok(LinearTrend {
        slope,
        intercept,
        observations: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SignalAnalysisError;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_exact_line() {
        let series = TimeSeries::from_values(&[12.0, 14.0, 16.0, 18.0]).unwrap();
        let trend = fit_linear_trend(&series).unwrap();
        assert_approx_eq!(trend.slope, 2.0, 1e-12);
        assert_approx_eq!(trend.intercept, 10.0, 1e-12);
        assert_eq!(trend.observations, 4);
        assert_approx_eq!(trend.predict(1.0), 12.0, 1e-12);
        assert_approx_eq!(trend.forecast_next(), 20.0, 1e-12);
    }

    #[test]
    fn test_flat_noisy_series() {
        let series = TimeSeries::from_values(&[10.0, 11.0, 10.0, 11.0, 10.0, 11.0]).unwrap();
        let trend = fit_linear_trend(&series).unwrap();
        // Alternation starting low gives a small positive slope
        assert!(trend.slope > 0.0 && trend.slope < 0.2);
        assert!((trend.forecast_next() - 10.5).abs() < 1.0);
    }

    #[test]
    fn test_single_point_rejected() {
        let series = TimeSeries::from_values(&[10.0]).unwrap();
        assert!(matches!(
            fit_linear_trend(&series),
            Err(SignalAnalysisError::InsufficientData { required: 2, actual: 1, .. })
        ));
    }
}
