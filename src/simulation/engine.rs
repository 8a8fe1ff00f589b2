// src/simulation/engine.rs
use crate::core::{HandoptError, QubitState};
use crate::operations::{Axis, Operation};
use crate::validation::check_normalization;
use num_complex::Complex;
use num_traits::Zero; // For Complex::zero()
use tracing::trace;

/// Evolves a single-qubit state vector through a sequence of rotations.
/// (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    /// Amplitudes for `|0>` and `|1>`.
    state_vector: [Complex<f64>; 2],
}

impl SimulationEngine {
    /// Initializes the engine in `|0>`.
    pub(crate) fn init() -> Self {
        Self {
            state_vector: [Complex::new(1.0, 0.0), Complex::zero()],
        }
    }

    #[cfg(test)] // Only compile this function when running tests
    pub(crate) fn set_state(&mut self, state: QubitState) {
        self.state_vector = *state.amplitudes();
    }

    /// Applies one rotation, its angle already resolved to `theta`.
    pub(crate) fn apply_operation(&mut self, op: &Operation, theta: f64) -> Result<(), HandoptError> {
        if !theta.is_finite() {
            return Err(HandoptError::evaluator(format!("Rotation angle {} is not finite", theta)));
        }
        match op {
            Operation::Rotation { axis, .. } => {
                trace!(%op, theta, "applying rotation");
                self.apply_gate(&rotation_matrix(*axis, theta));
            }
        }
        Ok(())
    }

    /// Applies a 2x2 matrix: `[psi_0', psi_1'] = matrix * [psi_0, psi_1]`.
    fn apply_gate(&mut self, matrix: &[[Complex<f64>; 2]; 2]) {
        let [psi_0, psi_1] = self.state_vector;
        self.state_vector = [
            matrix[0][0] * psi_0 + matrix[0][1] * psi_1,
            matrix[1][0] * psi_0 + matrix[1][1] * psi_1,
        ];
    }

    /// Consumes the engine, checking the final vector is still a unit state.
    pub(crate) fn into_state(self) -> Result<QubitState, HandoptError> {
        check_normalization(&self.state_vector, None)
            .map_err(|e| HandoptError::evaluator(format!("Simulation lost normalization: {}", e)))?;
        let [a, b] = self.state_vector;
        QubitState::new(a, b)
    }
}

/// Provides the 2x2 matrix of `exp(-i θ σ_axis / 2)`.
pub(crate) fn rotation_matrix(axis: Axis, theta: f64) -> [[Complex<f64>; 2]; 2] {
    let half = theta / 2.0;
    let (sin_h, cos_h) = half.sin_cos();
    let i = Complex::i();
    match axis {
        // Rx(θ) = [[cos, -i sin], [-i sin, cos]]
        Axis::X => [
            [Complex::new(cos_h, 0.0), -i * sin_h],
            [-i * sin_h, Complex::new(cos_h, 0.0)],
        ],
        // Ry(θ) = [[cos, -sin], [sin, cos]]
        Axis::Y => [
            [Complex::new(cos_h, 0.0), Complex::new(-sin_h, 0.0)],
            [Complex::new(sin_h, 0.0), Complex::new(cos_h, 0.0)],
        ],
        // Rz(θ) = diag(e^(-iθ/2), e^(iθ/2))
        Axis::Z => [
            [Complex::from_polar(1.0, -half), Complex::zero()],
            [Complex::zero(), Complex::from_polar(1.0, half)],
        ],
    }
}
