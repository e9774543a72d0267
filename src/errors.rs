//! Error types and validation functions for signal analysis.
//!
//! Every analyzer reports failure through [`SignalAnalysisError`]; the
//! validation helpers below are shared so that the same precondition always
//! produces the same error shape.

use std::sync::Arc;
use thiserror::Error;

/// Error types for loading, analyzing and fetching price series.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum SignalAnalysisError {
    /// Series too short for the requested analysis.
    #[error("Insufficient data for {analysis}: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Analysis that rejected the input
        analysis: String,
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Caller-supplied parameter violates a precondition.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Malformed or missing input fields.
    #[error("Data format error{}: {reason}", line_suffix(.line))]
    DataFormat {
        /// What was wrong with the input
        reason: String,
        /// 1-based line number in the source file, when known
        line: Option<usize>,
    },

    /// Numerical computation failed.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
    },

    /// FFT computation error for spectral analysis.
    #[error("FFT computation failed: input size {size} not supported")]
    FftError {
        /// Input size that caused the FFT failure
        size: usize,
    },

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is missing or inconsistent
        reason: String,
    },

    /// Remote request could not be completed.
    #[error("Request failed for {url}: {reason}")]
    RequestFailed {
        /// Requested URL
        url: String,
        /// Transport or decoding failure
        reason: String,
    },

    /// Remote endpoint answered with a non-success status.
    #[error("Failed to fetch data from {url}, status code: {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// I/O operation error.
    #[error("I/O operation failed: {operation}")]
    Io {
        /// I/O operation that failed
        operation: String,
        /// Underlying error if available
        #[source]
        source: Option<Arc<std::io::Error>>,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(" at line {}", l),
        None => String::new(),
    }
}

/// Result type for signal analysis operations.
pub type SignalResult<T> = Result<T, SignalAnalysisError>;

impl SignalAnalysisError {
    /// Wraps an I/O error with the operation that produced it.
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        SignalAnalysisError::Io {
            operation: operation.into(),
            source: Some(Arc::new(source)),
        }
    }
}

/// Validates that data has sufficient length for an analysis.
///
/// # Example
/// ```rust
/// use fractal_signals::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "spectral analysis").is_ok());
/// assert!(validate_data_length(&data, 4, "Hurst estimation").is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize, analysis: &str) -> SignalResult<()> {
    if data.len() < min_required {
        Err(SignalAnalysisError::InsufficientData {
            analysis: analysis.to_string(),
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, naming its index.
pub fn validate_all_finite(data: &[f64], name: &str) -> SignalResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(SignalAnalysisError::DataFormat {
            reason: format!("{} contains non-finite value at index {}: {}", name, i, value_desc),
            line: None,
        });
    }

    Ok(())
}

/// Validates a rolling-window length (must be at least 2).
///
/// Takes a signed value so that negative requests coming from user input are
/// reported instead of wrapping around.
pub fn validate_window(window: i64) -> SignalResult<usize> {
    if window < 2 {
        return Err(SignalAnalysisError::InvalidParameter {
            parameter: "window".to_string(),
            value: window as f64,
            constraint: "an integer >= 2".to_string(),
        });
    }
    usize::try_from(window).map_err(|_| SignalAnalysisError::InvalidParameter {
        parameter: "window".to_string(),
        value: window as f64,
        constraint: "must fit in usize".to_string(),
    })
}

/// Validates that a value is finite and strictly positive.
pub fn validate_positive(value: f64, name: &str) -> SignalResult<()> {
    if !value.is_finite() || value <= 0.0 {
        Err(SignalAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "a finite value > 0".to_string(),
        })
    } else {
        Ok(())
    }
}
