// src/validation/mod.rs

//! Normalization checks for amplitude vectors.

use crate::core::{HandoptError, NORM_TOLERANCE, ZERO_NORM};
use num_complex::Complex;

/// Sum of squared amplitude magnitudes.
pub fn norm_sqr(amplitudes: &[Complex<f64>]) -> f64 {
    amplitudes.iter().map(|c| c.norm_sqr()).sum()
}

/// Checks if the vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `amplitudes` - The amplitude vector to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `NORM_TOLERANCE`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(HandoptError::InvalidState)` otherwise, including for NaN amplitudes.
pub fn check_normalization(amplitudes: &[Complex<f64>], tolerance: Option<f64>) -> Result<(), HandoptError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = norm_sqr(amplitudes);
    // Negated comparison so NaN fails too
    if !((norm_sq - 1.0).abs() <= effective_tolerance) {
        Err(HandoptError::InvalidState {
            message: format!("State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})", norm_sq, effective_tolerance)
        })
    } else {
        Ok(())
    }
}

/// Rescales `amplitudes` in place to unit norm.
///
/// Fails for a zero (or non-finite) vector, which has no direction to keep.
pub fn normalize(amplitudes: &mut [Complex<f64>]) -> Result<(), HandoptError> {
    let norm = norm_sqr(amplitudes).sqrt();
    if !norm.is_finite() || norm < ZERO_NORM {
        return Err(HandoptError::InvalidState {
            message: format!("Cannot normalize a vector with norm {}", norm)
        });
    }
    for c in amplitudes.iter_mut() {
        *c /= norm;
    }
    Ok(())
}
