//! FFT operations for spectral analysis.
//!
//! Forward transforms run through `rustfft` with planners kept in a small LRU
//! cache, so repeated analyses of equally sized series skip planning.

use crate::errors::{validate_all_finite, SignalAnalysisError, SignalResult};
use crate::math_utils::mean;
use lru::LruCache;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock, Mutex};

/// Planner cache capacity
const MAX_CACHE_ENTRIES: usize = 64;
/// Largest transform accepted (2^24 points)
pub const MAX_FFT_SIZE: usize = 1 << 24;

type FftPlanCache = LruCache<usize, Arc<dyn Fft<f64>>>;

static FFT_CACHE: LazyLock<Mutex<FftPlanCache>> = LazyLock::new(|| {
    Mutex::new(LruCache::new(
        NonZeroUsize::new(MAX_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN),
    ))
});

/// Subtracts the arithmetic mean from every value.
///
/// Removes the zero-frequency component so oscillations dominate the spectrum.
pub fn remove_mean(data: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let m = mean(data);
    data.iter().map(|&x| x - m).collect()
}

/// Get a forward FFT plan for `size`, planning it on a cache miss.
pub fn get_cached_fft_forward(size: usize) -> SignalResult<Arc<dyn Fft<f64>>> {
    if size == 0 || size > MAX_FFT_SIZE {
        return Err(SignalAnalysisError::FftError { size });
    }

    // A poisoned lock still holds valid plans
    let mut cache = FFT_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(plan) = cache.get(&size) {
        return Ok(Arc::clone(plan));
    }

    log::debug!("planning forward FFT of size {}", size);
    let plan = FftPlanner::new().plan_fft_forward(size);
    cache.put(size, Arc::clone(&plan));
    Ok(plan)
}

/// Discrete Fourier transform of a real sequence.
///
/// Returns all `n` complex coefficients in standard order (zero bin first,
/// negative frequencies in the upper half). Coefficients are unnormalized.
pub fn forward_fft(data: &[f64]) -> SignalResult<Vec<Complex64>> {
    validate_all_finite(data, "FFT input")?;

    let fft = get_cached_fft_forward(data.len())?;
    let mut buffer: Vec<Complex64> = data.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft.process(&mut buffer);
    Ok(buffer)
}

/// Strictly positive frequency bins of an `n`-point transform.
///
/// Returns `(bin index, frequency)` pairs, frequency = `k / (n * sampling_interval)`,
/// for `k = 1..=(n - 1) / 2`. This is the positive half of the usual
/// `fftfreq` layout: the zero bin, the Nyquist bin of even lengths (which
/// carries a negative sign there) and the mirrored half are all excluded.
pub fn positive_frequency_bins(n: usize, sampling_interval: f64) -> Vec<(usize, f64)> {
    if n < 2 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * sampling_interval);
    (1..=(n - 1) / 2).map(|k| (k, k as f64 * scale)).collect()
}

/// Drop all cached plans.
pub fn clear_fft_cache() {
    FFT_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clear();
}

/// Number of plans currently cached.
pub fn fft_cache_len() -> usize {
    FFT_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_remove_mean_centers_data() {
        let centered = remove_mean(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(centered, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert!(remove_mean(&[]).is_empty());

        let centered = remove_mean(&[1e308, 1e308, -1e308, 5e307, 1e308]);
        assert!(centered.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_forward_fft_matches_direct_dft() {
        let data = vec![1.0, 2.0, 1.0, -1.0, -2.0, -1.0, 0.5];
        let n = data.len();
        let coefficients = forward_fft(&data).unwrap();

        for (k, c) in coefficients.iter().enumerate() {
            let mut re = 0.0;
            let mut im = 0.0;
            for (t, &x) in data.iter().enumerate() {
                let angle = -2.0 * PI * (k * t) as f64 / n as f64;
                re += x * angle.cos();
                im += x * angle.sin();
            }
            assert_approx_eq!(c.re, re, 1e-9);
            assert_approx_eq!(c.im, im, 1e-9);
        }
    }

    #[test]
    fn test_forward_fft_rejects_bad_input() {
        assert!(matches!(
            forward_fft(&[]),
            Err(SignalAnalysisError::FftError { size: 0 })
        ));
        assert!(forward_fft(&[1.0, f64::NAN]).is_err());
        assert!(matches!(
            get_cached_fft_forward(MAX_FFT_SIZE + 1),
            Err(SignalAnalysisError::FftError { .. })
        ));
    }

    #[test]
    fn test_positive_frequency_bins_layout() {
        let even = positive_frequency_bins(8, 1.0);
        assert_eq!(even.len(), 3);
        assert_eq!(even[0].0, 1);
        assert_approx_eq!(even[0].1, 0.125, 1e-15);
        assert_approx_eq!(even[2].1, 0.375, 1e-15);

        let odd = positive_frequency_bins(7, 1.0);
        assert_eq!(odd.len(), 3);
        assert_approx_eq!(odd[2].1, 3.0 / 7.0, 1e-15);

        let daily = positive_frequency_bins(4, 2.0);
        assert_eq!(daily.len(), 1);
        assert_approx_eq!(daily[0].1, 0.125, 1e-15);

        assert!(positive_frequency_bins(2, 1.0).is_empty());
        assert!(positive_frequency_bins(1, 1.0).is_empty());
    }

    #[test]
    fn test_plan_cache_reuses_plans() {
        let a = get_cached_fft_forward(97).unwrap();
        let b = get_cached_fft_forward(97).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(fft_cache_len() >= 1);
    }
}
