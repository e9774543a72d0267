//! # Analysis Configuration
//!
//! Parameters for the analyses run by [`crate::SignalAnalyzer`] and switches
//! to enable or skip each of them.

use crate::errors::{validate_positive, validate_window, SignalAnalysisError, SignalResult};
use crate::fractal::DEFAULT_MAX_LAG;
use crate::volatility::DEFAULT_ROLLING_WINDOW;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a full analysis run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisConfig {
    /// Trailing window for rolling variance (>= 2)
    pub rolling_window: i64,
    /// Spacing between samples for frequency labels (> 0)
    pub sampling_interval: f64,
    /// Exclusive upper bound on Hurst lags (> 2)
    pub max_hurst_lag: usize,
    /// Run the amplitude spectrum
    pub enable_spectral: bool,
    /// Run rolling variance
    pub enable_volatility: bool,
    /// Run Hurst estimation
    pub enable_fractal: bool,
    /// Run the linear trend fit
    pub enable_trend: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rolling_window: DEFAULT_ROLLING_WINDOW as i64,
            sampling_interval: 1.0,
            max_hurst_lag: DEFAULT_MAX_LAG,
            enable_spectral: true,
            enable_volatility: true,
            enable_fractal: true,
            enable_trend: true,
        }
    }
}

impl AnalysisConfig {
    /// Core analyses only: spectrum, rolling variance, Hurst exponent
    pub fn core() -> Self {
        Self {
            enable_trend: false,
            ..Self::default()
        }
    }

    /// Set the rolling-variance window
    pub fn with_rolling_window(mut self, window: i64) -> Self {
        self.rolling_window = window;
        self
    }

    /// Set the Hurst lag cap
    pub fn with_max_hurst_lag(mut self, max_lag: usize) -> Self {
        self.max_hurst_lag = max_lag;
        self
    }

    /// Check every parameter of the enabled analyses.
    ///
    /// Parameters of disabled analyses are not checked, so a bad window does
    /// not block a run that skips rolling variance.
    pub fn validate(&self) -> SignalResult<()> {
        if self.enable_volatility {
            validate_window(self.rolling_window)?;
        }
        if self.enable_spectral {
            validate_positive(self.sampling_interval, "sampling_interval")?;
        }
        if self.enable_fractal && self.max_hurst_lag <= 2 {
            return Err(SignalAnalysisError::InvalidParameter {
                parameter: "max_hurst_lag".to_string(),
                value: self.max_hurst_lag as f64,
                constraint: "an integer > 2".to_string(),
            });
        }
        Ok(())
    }
}
