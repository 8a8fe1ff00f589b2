// src/simulation/evaluator.rs

use super::Simulator;
use crate::circuits::Circuit;
use crate::core::{HandoptError, QuantumOutputState};
use std::fmt;

/// The black-box transformation a session optimizes against.
///
/// Implementations must be deterministic for a given parameter vector and must
/// return a unit-normalized state (guaranteed by `QuantumOutputState`'s
/// constructors). Any `Err` is fatal to the session.
pub trait StateEvaluator {
    /// Number of values `evaluate` expects.
    fn parameter_count(&self) -> usize;

    /// Maps parameter values to an output state.
    fn evaluate(&self, params: &[f64]) -> Result<QuantumOutputState, HandoptError>;
}

/// Evaluates a symbolic `Circuit` with the state-vector `Simulator`.
pub struct CircuitEvaluator {
    circuit: Circuit,
    simulator: Simulator,
}

impl CircuitEvaluator {
    pub fn new(circuit: Circuit) -> Self {
        Self { circuit, simulator: Simulator::new() }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }
}

impl StateEvaluator for CircuitEvaluator {
    fn parameter_count(&self) -> usize {
        self.circuit.parameter_count()
    }

    fn evaluate(&self, params: &[f64]) -> Result<QuantumOutputState, HandoptError> {
        self.simulator.run(&self.circuit, params)
    }
}

impl fmt::Debug for CircuitEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The circuit is the secret being optimized; only its arity is shown
        f.debug_struct("CircuitEvaluator")
            .field("parameters", &self.circuit.parameter_count())
            .finish_non_exhaustive()
    }
}

/// Adapts a closure into a `StateEvaluator`. Handy for deterministic stubs.
pub struct FnEvaluator<F> {
    parameter_count: usize,
    func: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(&[f64]) -> Result<QuantumOutputState, HandoptError>,
{
    pub fn new(parameter_count: usize, func: F) -> Self {
        Self { parameter_count, func }
    }
}

impl<F> StateEvaluator for FnEvaluator<F>
where
    F: Fn(&[f64]) -> Result<QuantumOutputState, HandoptError>,
{
    fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    fn evaluate(&self, params: &[f64]) -> Result<QuantumOutputState, HandoptError> {
        if params.len() != self.parameter_count {
            return Err(HandoptError::evaluator(format!(
                "Evaluator expects {} parameters, got {}",
                self.parameter_count,
                params.len()
            )));
        }
        (self.func)(params)
    }
}
