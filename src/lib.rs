//! # Fractal Signals
//!
//! Spectral, volatility and fractal analysis of a single numeric time series.
//!
//! The crate answers three questions about a series:
//!
//! - **Which cycles dominate?** An amplitude spectrum over the positive
//!   frequency bins of the mean-removed series.
//! - **How does volatility evolve?** A trailing-window sample variance,
//!   undefined until the first window fills.
//! - **Is the series persistent?** A Hurst exponent estimated from the
//!   scaling of lagged-difference dispersion, classified as mean-reverting,
//!   random walk or trending.
//!
//! A linear trend fit, CSV loading and export, synthetic generators and
//! request building for external data providers round out the toolkit.
//!
//! ## Quick Start
//!
//! ```rust
//! use fractal_signals::{generate_random_walk, AnalysisConfig, SignalAnalyzer, TimeSeries};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let prices = generate_random_walk(500, Some(42));
//!     let series = TimeSeries::from_values(&prices)?;
//!
//!     let report = SignalAnalyzer::new(AnalysisConfig::default()).analyze(&series);
//!     if let Some(Ok(hurst)) = &report.hurst {
//!         println!("H = {:.3} ({})", hurst.exponent, hurst.regime);
//!     }
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! ## Hurst Convention
//!
//! The reported exponent is twice the slope of `ln(tau)` against `ln(lag)`,
//! where `tau` is the population standard deviation of lag differences. For
//! a Brownian path that slope is about 0.5, so the exponent lands near 1.0;
//! see [`fractal`] for details.
//!
//! ## Features
//!
//! - `serde`: serialization of configuration and result types
//! - `parallel`: run the independent analyses on the rayon pool
//! - `fetch`: blocking HTTP retrieval for [`DataOrchestrator`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod errors;
pub mod fft_ops;
pub mod math_utils;
pub mod time_series;

// Analyses
pub mod fractal;
pub mod spectral;
pub mod trend;
pub mod volatility;

// Orchestration and I/O
pub mod analyzer;
pub mod config;
pub mod data_sources;
pub mod generators;
pub mod loader;
pub mod report;

pub use analyzer::{
    AnalysisReport, SignalAnalyzer, FRACTAL_ANALYSIS, SPECTRAL_ANALYSIS, TREND_ANALYSIS,
    VOLATILITY_ANALYSIS,
};
pub use config::AnalysisConfig;
pub use data_sources::{ApiCredentials, DataOrchestrator, DataRequest, SourceKind};
pub use errors::{SignalAnalysisError, SignalResult};
pub use fractal::{
    estimate_hurst, FractalAnalyzer, HurstEstimate, HurstRegime, LagDispersion,
    DEFAULT_MAX_LAG, MIN_HURST_POINTS,
};
pub use generators::{generate_periodic_series, generate_random_walk, generate_white_noise};
pub use loader::{load_csv, load_csv_from_reader};
pub use report::{write_rolling_variance_csv, write_spectrum_csv};
pub use spectral::{SpectralAnalyzer, SpectralPoint, Spectrum};
pub use time_series::TimeSeries;
pub use trend::{fit_linear_trend, LinearTrend};
pub use volatility::{
    rolling_variance, RollingVarianceSeries, VolatilityAnalyzer, DEFAULT_ROLLING_WINDOW,
};
