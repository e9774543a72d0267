//! Mathematical utility functions shared by the analyzers.
//!
//! Descriptive statistics and the least-squares line fit used by both the
//! Hurst estimator and the linear trend model.

use crate::errors::{SignalAnalysisError, SignalResult};

/// Numerical constants.
pub mod constants {
    /// Smallest spread of predictor values accepted by [`super::ols_regression`]
    pub const MIN_PREDICTOR_SPREAD: f64 = 1e-15;
}

/// Arithmetic mean. Returns NaN for empty input.
///
/// Finite inputs whose plain sum overflows are averaged as `sum(x / n)`, so
/// the result stays finite.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let n = data.len() as f64;
    let sum = data.iter().sum::<f64>();
    if sum.is_finite() {
        sum / n
    } else {
        data.iter().map(|&x| x / n).sum()
    }
}

/// Unbiased sample variance (denominator `n - 1`).
///
/// Uses Welford's single-pass update for numerical stability. Returns NaN when
/// fewer than two values are given, since the estimator is undefined there.
pub fn sample_variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }

    let mut mean = 0.0;
    let mut m2 = 0.0;

    for (i, &value) in data.iter().enumerate() {
        let count = (i + 1) as f64;
        let delta = value - mean;
        mean += delta / count;
        let delta2 = value - mean;
        m2 += delta * delta2;
    }

    m2 / (data.len() - 1) as f64
}

/// Population standard deviation (denominator `n`).
///
/// Returns NaN for empty input.
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let m = mean(data);
    let sum_sq: f64 = data
        .iter()
        .map(|&x| {
            let d = x - m;
            d * d
        })
        .sum();
    (sum_sq / data.len() as f64).sqrt()
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
///
/// Two points are enough to define the line. Data is centered before the
/// sums are taken to avoid cancellation when `x` values are large.
///
/// # Returns
/// `(slope, intercept)`
///
/// # Errors
/// - `InsufficientData` if the inputs differ in length or have fewer than 2 points
/// - `NumericalError` for non-finite input or constant `x`
///
/// # Example
/// ```rust
/// use fractal_signals::math_utils::ols_regression;
///
/// let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
/// let (slope, intercept) = ols_regression(&x, &y).unwrap();
/// assert!((slope - 2.0).abs() < 1e-10);
/// assert!(intercept.abs() < 1e-10);
/// ```
pub fn ols_regression(x: &[f64], y: &[f64]) -> SignalResult<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return Err(SignalAnalysisError::InsufficientData {
            analysis: "least-squares regression".to_string(),
            required: 2,
            actual: x.len().min(y.len()),
        });
    }

    if !x.iter().chain(y).all(|v| v.is_finite()) {
        return Err(SignalAnalysisError::NumericalError {
            reason: "Non-finite values in regression data".to_string(),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let sxx: f64 = x
        .iter()
        .map(|xi| {
            let centered = xi - mean_x;
            centered * centered
        })
        .sum();

    if sxx.abs() < constants::MIN_PREDICTOR_SPREAD {
        return Err(SignalAnalysisError::NumericalError {
            reason: "Predictor variable has zero variance (constant values)".to_string(),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(SignalAnalysisError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
        });
    }

    Ok((slope, intercept))
}
