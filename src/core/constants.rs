//! Numeric constants shared by the simulator, validation and scoring.

/// Tolerances used when comparing amplitudes.
pub mod tolerances {
    /// Allowed deviation of `Σ|c_i|²` from 1.0 for a state to count as normalized.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Norm below which a vector cannot be rescaled to a unit state.
    pub const ZERO_NORM: f64 = 1e-12;
}
