// src/scoring/mod.rs

//! Discrepancy between a trial's output state and the hidden target.

use crate::core::{QuantumOutputState, QubitState};

/// Fidelity `|<output|target>|²` between two pure states.
pub fn fidelity(output: &QuantumOutputState, target: &QubitState) -> f64 {
    output.inner(target).norm_sqr()
}

/// Loss `1 - |<output|target>|²`.
///
/// `0` means the states are identical up to global phase, `1` means they are
/// orthogonal. Both inputs are unit-normalized by construction; the result is
/// clamped into `[0, 1]` to absorb rounding.
pub fn score(output: &QuantumOutputState, target: &QubitState) -> f64 {
    (1.0 - fidelity(output, target)).clamp(0.0, 1.0)
}
