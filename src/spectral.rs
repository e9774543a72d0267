//! Amplitude spectrum of a price series.
//!
//! The series is mean-centered, transformed with a forward DFT, and only the
//! strictly positive frequency bins are kept. Samples are assumed to be evenly
//! spaced: calendar gaps between timestamps (weekends, holidays) are ignored
//! and each index step counts as one sampling interval.

use crate::errors::{validate_data_length, validate_positive, SignalAnalysisError, SignalResult};
use crate::fft_ops::{forward_fft, positive_frequency_bins, remove_mean};
use crate::time_series::TimeSeries;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum series length for a spectrum
pub const MIN_SPECTRAL_POINTS: usize = 2;

/// One bin of an amplitude spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralPoint {
    /// Cycles per sampling interval, always > 0
    pub frequency: f64,
    /// Magnitude of the DFT coefficient, always >= 0
    pub amplitude: f64,
}

/// Amplitude spectrum ordered by ascending frequency.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spectrum {
    points: Vec<SpectralPoint>,
}

impl Spectrum {
    /// Spectral bins in ascending frequency order.
    pub fn points(&self) -> &[SpectralPoint] {
        &self.points
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the input was too short to yield a positive-frequency bin.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the bins.
    pub fn iter(&self) -> impl Iterator<Item = &SpectralPoint> {
        self.points.iter()
    }

    /// Frequencies of all bins.
    pub fn frequencies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.frequency).collect()
    }

    /// Amplitudes of all bins.
    pub fn amplitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.amplitude).collect()
    }

    /// Bin with the largest amplitude. On ties the lowest frequency wins.
    pub fn dominant(&self) -> Option<SpectralPoint> {
        self.points.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.amplitude >= p.amplitude => Some(b),
            _ => Some(p),
        })
    }

    /// Period (in sampling intervals) of the dominant bin.
    pub fn dominant_period(&self) -> Option<f64> {
        self.dominant().map(|p| 1.0 / p.frequency)
    }
}

/// Computes amplitude spectra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralAnalyzer {
    sampling_interval: f64,
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralAnalyzer {
    /// Analyzer with a unit sampling interval (one cycle per index step).
    pub fn new() -> Self {
        Self {
            sampling_interval: 1.0,
        }
    }

    /// Analyzer with a custom spacing between samples.
    pub fn with_sampling_interval(sampling_interval: f64) -> SignalResult<Self> {
        validate_positive(sampling_interval, "sampling_interval")?;
        Ok(Self { sampling_interval })
    }

    /// Spacing between samples used to label frequencies.
    pub fn sampling_interval(&self) -> f64 {
        self.sampling_interval
    }

    /// Amplitude spectrum of the mean-centered series.
    ///
    /// Returns `(n - 1) / 2` bins for an input of length `n`.
    ///
    /// # Errors
    /// - `InsufficientData` for fewer than 2 points
    /// - `FftError` for series longer than [`MAX_FFT_SIZE`](crate::fft_ops::MAX_FFT_SIZE)
    /// - `NumericalError` when values are so large that centering or the
    ///   transform overflows
    ///
    /// # Example
    /// ```rust
    /// use fractal_signals::{SpectralAnalyzer, TimeSeries};
    ///
    /// let series = TimeSeries::from_values(&[10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0]).unwrap();
    /// let spectrum = SpectralAnalyzer::new().transform(&series).unwrap();
    /// assert_eq!(spectrum.len(), 3);
    /// ```
    pub fn transform(&self, series: &TimeSeries) -> SignalResult<Spectrum> {
        let values = series.values();
        validate_data_length(values, MIN_SPECTRAL_POINTS, "spectral analysis")?;

        let centered = remove_mean(values);
        if !centered.iter().all(|x| x.is_finite()) {
            return Err(overflow());
        }

        let coefficients = forward_fft(&centered)?;
        let bins = positive_frequency_bins(values.len(), self.sampling_interval);
        let points: Vec<SpectralPoint> = bins
            .into_iter()
            .map(|(k, frequency)| SpectralPoint {
                frequency,
                amplitude: coefficients[k].norm(),
            })
            .collect();

        if !points.iter().all(|p| p.amplitude.is_finite()) {
            return Err(overflow());
        }
        Ok(Spectrum { points })
    }
}

fn overflow() -> SignalAnalysisError {
    SignalAnalysisError::NumericalError {
        reason: "spectrum overflowed: values too large for f64".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SignalAnalysisError;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    fn series(values: &[f64]) -> TimeSeries {
        TimeSeries::from_values(values).unwrap()
    }

    #[test]
    fn test_spectrum_length_matches_positive_bins() {
        let analyzer = SpectralAnalyzer::new();
        for n in 2..40 {
            let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin() + i as f64).collect();
            let spectrum = analyzer.transform(&series(&values)).unwrap();
            assert_eq!(spectrum.len(), (n - 1) / 2, "length mismatch for n = {}", n);

            let freqs = spectrum.frequencies();
            assert!(freqs.iter().all(|&f| f > 0.0));
            assert!(freqs.windows(2).all(|w| w[1] > w[0]));
            assert!(spectrum.amplitudes().iter().all(|&a| a >= 0.0));
        }
    }

    #[test]
    fn test_two_points_gives_empty_spectrum() {
        let spectrum = SpectralAnalyzer::new().transform(&series(&[1.0, 2.0])).unwrap();
        assert!(spectrum.is_empty());
        assert_eq!(spectrum.dominant(), None);
        assert_eq!(spectrum.dominant_period(), None);
    }

    #[test]
    fn test_insufficient_data() {
        let result = SpectralAnalyzer::new().transform(&series(&[5.0]));
        match result {
            Err(SignalAnalysisError::InsufficientData { required, actual, .. }) => {
                assert_eq!(required, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_pure_tone_peaks_at_its_frequency() {
        // 64 samples with a period of 8 samples: energy sits in bin 8
        let n = 64;
        let values: Vec<f64> = (0..n)
            .map(|i| 100.0 + 3.0 * (2.0 * PI * i as f64 / 8.0).sin())
            .collect();
        let spectrum = SpectralAnalyzer::new().transform(&series(&values)).unwrap();

        let peak = spectrum.dominant().unwrap();
        assert_approx_eq!(peak.frequency, 0.125, 1e-12);
        // |X_k| = A * n / 2 for a sine exactly on a bin
        assert_approx_eq!(peak.amplitude, 3.0 * n as f64 / 2.0, 1e-8);
        assert_approx_eq!(spectrum.dominant_period().unwrap(), 8.0, 1e-9);
    }

    #[test]
    fn test_constant_series_has_zero_amplitude() {
        let spectrum = SpectralAnalyzer::new()
            .transform(&series(&[7.0; 9]))
            .unwrap();
        assert_eq!(spectrum.len(), 4);
        for p in spectrum.iter() {
            assert_approx_eq!(p.amplitude, 0.0, 1e-12);
        }
    }

    #[test]
    fn test_sampling_interval_scales_frequencies() {
        let values: Vec<f64> = (0..10).map(|i| (i as f64).cos()).collect();
        let unit = SpectralAnalyzer::new().transform(&series(&values)).unwrap();
        let half = SpectralAnalyzer::with_sampling_interval(0.5)
            .unwrap()
            .transform(&series(&values))
            .unwrap();

        for (a, b) in unit.iter().zip(half.iter()) {
            assert_approx_eq!(b.frequency, 2.0 * a.frequency, 1e-12);
            assert_eq!(a.amplitude, b.amplitude);
        }

        assert!(SpectralAnalyzer::with_sampling_interval(0.0).is_err());
        assert!(SpectralAnalyzer::with_sampling_interval(-1.0).is_err());
    }

    #[test]
    fn test_huge_values() {
        // Plain summation overflows here; the mean does not
        let spectrum = SpectralAnalyzer::new()
            .transform(&series(&[1e308, 1e308, 1e308]))
            .unwrap();
        assert_eq!(spectrum.len(), 1);
        assert!(spectrum.amplitudes()[0] < 1e300);

        // Centered values exceed f64::MAX
        let alternating = [1.7e308, -1.7e308, 1.7e308, -1.7e308, 1.7e308];
        assert!(matches!(
            SpectralAnalyzer::new().transform(&series(&alternating)),
            Err(SignalAnalysisError::NumericalError { .. })
        ));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let values: Vec<f64> = (0..33).map(|i| ((i * 7919) % 13) as f64).collect();
        let s = series(&values);
        let analyzer = SpectralAnalyzer::new();
        assert_eq!(analyzer.transform(&s).unwrap(), analyzer.transform(&s).unwrap());
    }
}
