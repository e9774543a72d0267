//! Hurst exponent estimation from lagged-difference dispersion.
//!
//! For each lag `l` in `2..min(max_lag, n / 2)` the population standard
//! deviation `tau(l)` of `x[t + l] - x[t]` is computed. A least-squares line is
//! fitted to `(ln l, ln tau(l))` and the Hurst exponent is reported as twice
//! its slope.
//!
//! ## Convention
//!
//! Doubling the slope of a *standard deviation* regression is not the
//! textbook relation: for a random walk `tau(l) ~ l^H`, so the slope itself
//! already estimates `H`. Regressing the variance would call for halving
//! instead. Results are kept compatible with the established output of this
//! tool, so the factor of two stays. Treat the number as a relative
//! persistence score rather than a calibrated `H`.

use crate::errors::{validate_data_length, SignalAnalysisError, SignalResult};
use crate::math_utils::{ols_regression, population_std_dev};
use crate::time_series::TimeSeries;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum series length accepted by the estimator
pub const MIN_HURST_POINTS: usize = 4;
/// Upper bound (exclusive) on lags unless configured otherwise
pub const DEFAULT_MAX_LAG: usize = 100;
/// Smallest lag examined
const MIN_LAG: usize = 2;
/// Minimum number of usable lags for the regression
const MIN_USABLE_LAGS: usize = 2;
/// Boundary between anti-persistent and persistent behaviour
pub const RANDOM_WALK_HURST: f64 = 0.5;

/// Qualitative reading of a Hurst exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HurstRegime {
    /// H < 0.5: anti-persistent
    MeanReverting,
    /// H == 0.5: memoryless
    RandomWalk,
    /// H > 0.5: persistent
    Trending,
}

impl HurstRegime {
    /// Classifies with an exact comparison against 0.5.
    ///
    /// Floating-point estimates practically never land on 0.5 exactly; use
    /// [`classify_with_tolerance`](Self::classify_with_tolerance) for a band.
    pub fn classify(hurst: f64) -> Self {
        Self::classify_with_tolerance(hurst, 0.0)
    }

    /// Classifies `|H - 0.5| <= tolerance` as a random walk.
    pub fn classify_with_tolerance(hurst: f64, tolerance: f64) -> Self {
        if (hurst - RANDOM_WALK_HURST).abs() <= tolerance {
            HurstRegime::RandomWalk
        } else if hurst < RANDOM_WALK_HURST {
            HurstRegime::MeanReverting
        } else {
            HurstRegime::Trending
        }
    }

    /// Short label.
    pub fn label(&self) -> &'static str {
        match self {
            HurstRegime::MeanReverting => "mean-reverting",
            HurstRegime::RandomWalk => "random walk",
            HurstRegime::Trending => "trending",
        }
    }

    /// Sentence describing the behaviour.
    pub fn indication(&self) -> &'static str {
        match self {
            HurstRegime::MeanReverting => "Mean-reverting behavior (anti-persistent)",
            HurstRegime::RandomWalk => "Random walk (Brownian motion)",
            HurstRegime::Trending => "Trending behavior (persistent)",
        }
    }
}

impl fmt::Display for HurstRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dispersion of lagged differences at one lag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LagDispersion {
    /// Lag in samples
    pub lag: usize,
    /// Population standard deviation of the lagged differences
    pub tau: f64,
}

/// Result of a Hurst estimation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HurstEstimate {
    /// Estimated exponent (twice the log-log slope)
    pub exponent: f64,
    /// Classification of `exponent`
    pub regime: HurstRegime,
    /// Slope of ln(tau) against ln(lag)
    pub slope: f64,
    /// Intercept of the same fit
    pub intercept: f64,
    /// Lags that entered the regression
    pub lags: Vec<LagDispersion>,
}

/// Estimates the Hurst exponent of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractalAnalyzer {
    max_lag: usize,
}

impl Default for FractalAnalyzer {
    fn default() -> Self {
        Self {
            max_lag: DEFAULT_MAX_LAG,
        }
    }
}

impl FractalAnalyzer {
    /// Analyzer with the default lag cap of 100.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer examining lags strictly below `max_lag` (and below `n / 2`).
    pub fn with_max_lag(max_lag: usize) -> SignalResult<Self> {
        if max_lag <= MIN_LAG {
            return Err(SignalAnalysisError::InvalidParameter {
                parameter: "max_lag".to_string(),
                value: max_lag as f64,
                constraint: format!("an integer > {}", MIN_LAG),
            });
        }
        Ok(Self { max_lag })
    }

    /// Exclusive lag cap.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Estimates the Hurst exponent.
    ///
    /// # Errors
    /// `InsufficientData` for fewer than 4 points, or when fewer than 2 lags
    /// have a strictly positive `tau` (e.g. short or constant series).
    pub fn estimate(&self, series: &TimeSeries) -> SignalResult<HurstEstimate> {
        let values = series.values();
        validate_data_length(values, MIN_HURST_POINTS, "Hurst estimation")?;

        let n = values.len();
        let upper = self.max_lag.min(n / 2);

        let lags: Vec<LagDispersion> = (MIN_LAG..upper)
            .filter_map(|lag| {
                let diffs: Vec<f64> = values[lag..]
                    .iter()
                    .zip(&values[..n - lag])
                    .map(|(later, earlier)| later - earlier)
                    .collect();
                let tau = population_std_dev(&diffs);
                // ln(tau) is undefined for tau <= 0
                (tau.is_finite() && tau > 0.0).then_some(LagDispersion { lag, tau })
            })
            .collect();

        if lags.len() < MIN_USABLE_LAGS {
            return Err(SignalAnalysisError::InsufficientData {
                analysis: "Hurst estimation (usable lags)".to_string(),
                required: MIN_USABLE_LAGS,
                actual: lags.len(),
            });
        }

        let log_lags: Vec<f64> = lags.iter().map(|l| (l.lag as f64).ln()).collect();
        let log_taus: Vec<f64> = lags.iter().map(|l| l.tau.ln()).collect();
        let (slope, intercept) = ols_regression(&log_lags, &log_taus)?;

        let exponent = 2.0 * slope;
        log::debug!(
            "Hurst fit over {} lags: slope {:.6}, H = {:.6}",
            lags.len(),
            slope,
            exponent
        );

        Ok(HurstEstimate {
            exponent,
            regime: HurstRegime::classify(exponent),
            slope,
            intercept,
            lags,
        })
    }
}

/// Estimates the Hurst exponent with the default analyzer.
pub fn estimate_hurst(series: &TimeSeries) -> SignalResult<HurstEstimate> {
    FractalAnalyzer::default().estimate(series)
}
