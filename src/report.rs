//! Text and CSV output of analysis results.
//!
//! Plotting is left to the consumer: the spectrum and rolling variance are
//! exported as CSV, and the scalar results print as plain text.

use crate::analyzer::{
    AnalysisReport, FRACTAL_ANALYSIS, SPECTRAL_ANALYSIS, TREND_ANALYSIS, VOLATILITY_ANALYSIS,
};
use crate::errors::{SignalAnalysisError, SignalResult};
use crate::fractal::HurstEstimate;
use crate::spectral::Spectrum;
use crate::trend::LinearTrend;
use crate::volatility::RollingVarianceSeries;
use csv::Writer;
use std::fmt;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl fmt::Display for HurstEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimated Hurst Exponent: {:.4}", self.exponent)?;
        write!(f, "Indication: {}", self.regime.indication())
    }
}

impl fmt::Display for LinearTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slope: {:.6}", self.slope)?;
        writeln!(f, "Intercept: {:.6}", self.intercept)?;
        write!(
            f,
            "Predicted value for observation {}: {:.6}",
            self.observations + 1,
            self.forecast_next()
        )
    }
}

fn write_section<T>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    entry: &Option<SignalResult<T>>,
    body: impl FnOnce(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    match entry {
        None => Ok(()),
        Some(Err(e)) => writeln!(f, "{} failed: {}", name, e),
        Some(Ok(value)) => {
            writeln!(f, "{}", name)?;
            body(f, value)?;
            writeln!(f)
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Observations: {}", self.observations)?;

        write_section(f, SPECTRAL_ANALYSIS, &self.spectrum, |f, spectrum| {
            write!(f, "Frequency bins: {}", spectrum.len())?;
            if let Some(peak) = spectrum.dominant() {
                write!(
                    f,
                    "\nDominant frequency: {:.6} (period {:.2}), amplitude {:.4}",
                    peak.frequency,
                    1.0 / peak.frequency,
                    peak.amplitude
                )?;
            }
            Ok(())
        })?;

        write_section(f, VOLATILITY_ANALYSIS, &self.rolling_variance, |f, rolling| {
            write!(
                f,
                "Window: {}, defined entries: {}",
                rolling.window(),
                rolling.defined().count()
            )?;
            if let Some((ts, variance)) = rolling.peak() {
                write!(f, "\nPeak variance: {:.6} at {}", variance, ts.format(TIMESTAMP_FORMAT))?;
            }
            Ok(())
        })?;

        write_section(f, FRACTAL_ANALYSIS, &self.hurst, |f, hurst| write!(f, "{}", hurst))?;
        write_section(f, TREND_ANALYSIS, &self.trend, |f, trend| write!(f, "{}", trend))
    }
}

/// Writes `frequency,amplitude` rows.
pub fn write_spectrum_csv<W: Write>(spectrum: &Spectrum, writer: W) -> SignalResult<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["frequency", "amplitude"]).map_err(csv_error)?;
    for point in spectrum.iter() {
        csv.write_record([point.frequency.to_string(), point.amplitude.to_string()])
            .map_err(csv_error)?;
    }
    csv.flush()
        .map_err(|e| SignalAnalysisError::io("flush spectrum CSV", e))
}

/// Writes `timestamp,variance` rows; undefined entries get an empty cell.
pub fn write_rolling_variance_csv<W: Write>(
    rolling: &RollingVarianceSeries,
    writer: W,
) -> SignalResult<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["timestamp", "variance"]).map_err(csv_error)?;
    for (ts, variance) in rolling.iter() {
        csv.write_record([
            ts.format(TIMESTAMP_FORMAT).to_string(),
            variance.map(|v| v.to_string()).unwrap_or_default(),
        ])
        .map_err(csv_error)?;
    }
    csv.flush()
        .map_err(|e| SignalAnalysisError::io("flush rolling variance CSV", e))
}

fn csv_error(err: csv::Error) -> SignalAnalysisError {
    SignalAnalysisError::Io {
        operation: format!("write CSV: {}", err),
        source: None,
    }
}
