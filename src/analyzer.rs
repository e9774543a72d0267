//! # Signal Analyzer
//!
//! [`SignalAnalyzer`] runs every enabled analysis on one [`TimeSeries`] and
//! collects a result-or-error per analysis. A failing analysis never stops
//! the others: the report simply carries its error.
//!
//! ## Usage Example
//!
//! ```rust
//! use fractal_signals::{AnalysisConfig, SignalAnalyzer, TimeSeries};
//!
//! let prices: Vec<f64> = (0..256).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
//! let series = TimeSeries::from_values(&prices).unwrap();
//!
//! let report = SignalAnalyzer::new(AnalysisConfig::default()).analyze(&series);
//! assert!(report.failures().is_empty());
//! println!("{}", report);
//! ```
//!
//! With the `parallel` feature the analyses run on the rayon pool; every
//! analysis is a pure function of the series, so results are identical.

use crate::config::AnalysisConfig;
use crate::errors::{SignalAnalysisError, SignalResult};
use crate::fractal::{FractalAnalyzer, HurstEstimate};
use crate::spectral::{SpectralAnalyzer, Spectrum};
use crate::time_series::TimeSeries;
use crate::trend::{fit_linear_trend, LinearTrend};
use crate::volatility::{rolling_variance, RollingVarianceSeries};

/// Display name of the spectral analysis
pub const SPECTRAL_ANALYSIS: &str = "Spectral analysis";
/// Display name of the rolling variance
pub const VOLATILITY_ANALYSIS: &str = "Rolling variance";
/// Display name of the Hurst estimation
pub const FRACTAL_ANALYSIS: &str = "Hurst estimation";
/// Display name of the trend fit
pub const TREND_ANALYSIS: &str = "Trend fit";

/// Outcome of one analysis run. `None` marks a disabled analysis.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Number of observations analyzed
    pub observations: usize,
    /// Amplitude spectrum
    pub spectrum: Option<SignalResult<Spectrum>>,
    /// Rolling variance
    pub rolling_variance: Option<SignalResult<RollingVarianceSeries>>,
    /// Hurst exponent
    pub hurst: Option<SignalResult<HurstEstimate>>,
    /// Linear trend
    pub trend: Option<SignalResult<LinearTrend>>,
}

impl AnalysisReport {
    /// Failed analyses with their errors, in report order.
    pub fn failures(&self) -> Vec<(&'static str, &SignalAnalysisError)> {
        fn failed<'a, T>(
            name: &'static str,
            entry: &'a Option<SignalResult<T>>,
        ) -> Option<(&'static str, &'a SignalAnalysisError)> {
            match entry {
                Some(Err(e)) => Some((name, e)),
                _ => None,
            }
        }

        [
            failed(SPECTRAL_ANALYSIS, &self.spectrum),
            failed(VOLATILITY_ANALYSIS, &self.rolling_variance),
            failed(FRACTAL_ANALYSIS, &self.hurst),
            failed(TREND_ANALYSIS, &self.trend),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Runs the configured analyses on a series.
#[derive(Debug, Clone, Default)]
pub struct SignalAnalyzer {
    config: AnalysisConfig,
}

impl SignalAnalyzer {
    /// Create an analyzer.
    ///
    /// Parameters are checked when each analysis runs, so an invalid value
    /// only fails its own analysis. Call [`AnalysisConfig::validate`] first
    /// to fail fast instead.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every enabled analysis on `series`.
    pub fn analyze(&self, series: &TimeSeries) -> AnalysisReport {
        log::debug!("analyzing series of {} observations", series.len());

        let (spectrum, rolling_variance, hurst, trend) = self.run_all(series);

        let report = AnalysisReport {
            observations: series.len(),
            spectrum,
            rolling_variance,
            hurst,
            trend,
        };

        for (name, error) in report.failures() {
            log::warn!("{} failed: {}", name, error);
        }
        report
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all(&self, series: &TimeSeries) -> AnalysisOutcomes {
        (
            self.run_spectral(series),
            self.run_volatility(series),
            self.run_fractal(series),
            self.run_trend(series),
        )
    }

    #[cfg(feature = "parallel")]
    fn run_all(&self, series: &TimeSeries) -> AnalysisOutcomes {
        let ((spectrum, rolling), (hurst, trend)) = rayon::join(
            || rayon::join(|| self.run_spectral(series), || self.run_volatility(series)),
            || rayon::join(|| self.run_fractal(series), || self.run_trend(series)),
        );
        (spectrum, rolling, hurst, trend)
    }

    fn run_spectral(&self, series: &TimeSeries) -> Option<SignalResult<Spectrum>> {
        self.config.enable_spectral.then(|| {
            SpectralAnalyzer::with_sampling_interval(self.config.sampling_interval)
                .and_then(|analyzer| analyzer.transform(series))
        })
    }

    fn run_volatility(&self, series: &TimeSeries) -> Option<SignalResult<RollingVarianceSeries>> {
        self.config
            .enable_volatility
            .then(|| rolling_variance(series, self.config.rolling_window))
    }

    fn run_fractal(&self, series: &TimeSeries) -> Option<SignalResult<HurstEstimate>> {
        self.config.enable_fractal.then(|| {
            FractalAnalyzer::with_max_lag(self.config.max_hurst_lag)
                .and_then(|analyzer| analyzer.estimate(series))
        })
    }

    fn run_trend(&self, series: &TimeSeries) -> Option<SignalResult<LinearTrend>> {
        self.config.enable_trend.then(|| fit_linear_trend(series))
    }
}

type AnalysisOutcomes = (
    Option<SignalResult<Spectrum>>,
    Option<SignalResult<RollingVarianceSeries>>,
    Option<SignalResult<HurstEstimate>>,
    Option<SignalResult<LinearTrend>>,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> TimeSeries {
        let values: Vec<f64> = (0..n)
            .map(|i| 50.0 + (i as f64 * 0.21).sin() * 2.0 + (i % 5) as f64 * 0.1)
            .collect();
        TimeSeries::from_values(&values).unwrap()
    }

    #[test]
    fn test_all_analyses_succeed() {
        let report = SignalAnalyzer::default().analyze(&series(300));
        assert_eq!(report.observations, 300);
        assert!(report.failures().is_empty());
        assert_eq!(report.spectrum.unwrap().unwrap().len(), 149);
        assert_eq!(report.rolling_variance.unwrap().unwrap().len(), 300);
        assert!(report.hurst.unwrap().unwrap().exponent.is_finite());
        assert!(report.trend.unwrap().is_ok());
    }

    #[test]
    fn test_invalid_window_fails_only_volatility() {
        let config = AnalysisConfig::default().with_rolling_window(1);
        let report = SignalAnalyzer::new(config).analyze(&series(120));

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, VOLATILITY_ANALYSIS);
        assert!(matches!(failures[0].1, SignalAnalysisError::InvalidParameter { .. }));

        assert!(report.spectrum.unwrap().is_ok());
        assert!(report.hurst.unwrap().is_ok());
    }

    #[test]
    fn test_short_series_fails_hurst_but_not_spectrum() {
        let report = SignalAnalyzer::default().analyze(&series(3));
        assert!(report.spectrum.as_ref().unwrap().is_ok());
        assert!(report.rolling_variance.as_ref().unwrap().is_ok());
        assert!(matches!(
            report.hurst,
            Some(Err(SignalAnalysisError::InsufficientData { .. }))
        ));
        let names: Vec<_> = report.failures().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec![FRACTAL_ANALYSIS]);
    }

    #[test]
    fn test_disabled_analyses_are_skipped() {
        let report = SignalAnalyzer::new(AnalysisConfig::core()).analyze(&series(50));
        assert!(report.trend.is_none());
        assert!(report.spectrum.is_some());
    }
}
