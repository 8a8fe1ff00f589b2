// src/core/state.rs

use super::error::HandoptError;
use crate::validation::{check_normalization, normalize};
use num_complex::Complex;
use std::fmt;

/// A pure single-qubit state: a unit-normalized complex amplitude pair `a|0> + b|1>`.
///
/// The only constructors validate (or establish) normalization, so every value
/// of this type satisfies `|a|² + |b|² = 1` within the norm tolerance. Output
/// states produced by an evaluator are never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct QubitState {
    amplitudes: [Complex<f64>; 2],
}

/// The state an evaluator hands back for one trial.
pub type QuantumOutputState = QubitState;

impl QubitState {
    /// Builds a state from amplitudes that must already be normalized.
    pub fn new(a: Complex<f64>, b: Complex<f64>) -> Result<Self, HandoptError> {
        let amplitudes = [a, b];
        check_normalization(&amplitudes, None)?;
        Ok(Self { amplitudes })
    }

    /// Builds a state by rescaling arbitrary (non-zero) amplitudes to unit norm.
    pub fn normalized(a: Complex<f64>, b: Complex<f64>) -> Result<Self, HandoptError> {
        let mut amplitudes = [a, b];
        normalize(&mut amplitudes)?;
        Ok(Self { amplitudes })
    }

    /// `|0>`, the north pole of the Bloch sphere.
    pub fn zero() -> Self {
        Self { amplitudes: [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)] }
    }

    /// `|1>`, the south pole of the Bloch sphere.
    pub fn one() -> Self {
        Self { amplitudes: [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)] }
    }

    pub fn amplitudes(&self) -> &[Complex<f64>; 2] {
        &self.amplitudes
    }

    /// Inner product `<self|other> = Σ conj(self_i) · other_i`.
    pub fn inner(&self, other: &QubitState) -> Complex<f64> {
        self.amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(u, v)| u.conj() * v)
            .sum()
    }

    /// Multiplies both amplitudes by `e^(iθ)`. Physically the same state.
    pub fn with_global_phase(&self, theta: f64) -> Self {
        let phase = Complex::from_polar(1.0, theta);
        Self { amplitudes: [self.amplitudes[0] * phase, self.amplitudes[1] * phase] }
    }

    /// Projects the state onto the Bloch sphere.
    pub fn bloch_vector(&self) -> BlochVector {
        let [a, b] = self.amplitudes;
        let coherence = a.conj() * b;
        BlochVector {
            x: 2.0 * coherence.re,
            y: 2.0 * coherence.im,
            z: a.norm_sqr() - b.norm_sqr(),
        }
    }
}

impl fmt::Display for QubitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.amplitudes;
        write!(f, "State[{:.4}, {:.4}]", a, b)
    }
}

/// The hidden state trials are scored against.
///
/// Set once at session start. `Debug` is redacted so the target can't leak
/// through log lines or error reports.
#[derive(Clone, Copy, PartialEq)]
pub struct TargetState(QubitState);

impl TargetState {
    pub fn new(state: QubitState) -> Self {
        Self(state)
    }

    pub fn state(&self) -> &QubitState {
        &self.0
    }
}

impl fmt::Debug for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TargetState(<hidden>)")
    }
}

/// Cartesian point on (or inside) the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochVector {
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl fmt::Display for BlochVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bloch({:+.4}, {:+.4}, {:+.4})", self.x, self.y, self.z)
    }
}
