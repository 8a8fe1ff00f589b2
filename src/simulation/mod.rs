// src/simulation/mod.rs

//! Simulates the execution of `handopt::circuits::Circuit` for a given
//! parameter vector, and exposes the black-box evaluator seam the session
//! loop talks to.

mod evaluator;
pub(crate) mod engine;

pub use evaluator::{CircuitEvaluator, FnEvaluator, StateEvaluator};

use crate::circuits::Circuit;
use crate::core::{HandoptError, QuantumOutputState};
use crate::operations::Operation;
use engine::SimulationEngine;
use tracing::debug;

/// Runs circuits against parameter values, the way a parameter resolver binds
/// symbols before simulation.
#[derive(Debug, Default)]
pub struct Simulator {}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `circuit` from `|0>` with every symbol bound from `params`.
    ///
    /// # Arguments
    /// * `circuit` - The `Circuit` definition to simulate.
    /// * `params` - One value per circuit parameter, in symbol order.
    ///
    /// # Returns
    /// * `Ok(QuantumOutputState)` holding the final normalized amplitudes.
    /// * `Err(HandoptError::EvaluatorFailure)` if the parameter count is wrong,
    ///   an angle is not finite, or the result is not normalized.
    pub fn run(&self, circuit: &Circuit, params: &[f64]) -> Result<QuantumOutputState, HandoptError> {
        let expected = circuit.parameter_count();
        if params.len() != expected {
            return Err(HandoptError::evaluator(format!(
                "Circuit expects {} parameters, got {}",
                expected,
                params.len()
            )));
        }

        let mut engine = SimulationEngine::init();
        for op in circuit.operations() {
            let theta = match op {
                Operation::Rotation { angle, .. } => angle
                    .resolve(params)
                    .ok_or_else(|| HandoptError::evaluator(format!("Unbound symbol in {}", op)))?,
            };
            engine.apply_operation(op, theta)?;
        }

        let state = engine.into_state()?;
        debug!(%state, "simulation finished");
        Ok(state)
    }
}
