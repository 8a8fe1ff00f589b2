// src/lib.rs

//! `handopt` - hand-optimize a black-box quantum circuit
//!
//! A person proposes parameter values for a fixed single-qubit circuit they
//! cannot see, gets back the loss against a hidden target state, and watches
//! the trajectory of their guesses on a Bloch sphere colored by loss. The
//! person is the optimizer; the crate supplies the feedback loop.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod scoring;
pub mod color;
pub mod trial;
pub mod render;
pub mod session;
pub mod config;

// Re-export the most common types for easier top-level use
pub use crate::core::{BlochVector, HandoptError, QuantumOutputState, QubitState, TargetState};
pub use operations::{Angle, Axis, Operation};
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{CircuitEvaluator, FnEvaluator, Simulator, StateEvaluator};
pub use scoring::{fidelity, score};
pub use color::{Color, ColorMapper, Colormap};
pub use trial::{TrialCache, TrialRecord};
pub use render::{NullRenderer, RenderPoint, SvgBlochRenderer, TrajectoryRenderer};
pub use session::{
    ConsoleInput, ParameterSelection, ParameterSource, Session, SessionBuilder, SessionState,
    StepOutcome, TerminationReason,
};
pub use config::{Preset, SessionConfig};

// Example 1: Scoring a single guess against a hidden target
// The loss is one minus the fidelity, so hitting the target gives 0 and an
// orthogonal state gives 1.
/// ```
/// use handopt::{Angle, CircuitBuilder, CircuitEvaluator, HandoptError, Operation, QubitState, StateEvaluator, score};
/// use std::f64::consts::PI;
///
/// let evaluator = CircuitEvaluator::new(
///     CircuitBuilder::new().add_op(Operation::rx(Angle::Symbol(0))).build(),
/// );
/// let target = QubitState::zero();
///
/// let on_target = evaluator.evaluate(&[0.0])?;
/// assert!(score(&on_target, &target).abs() < 1e-12);
///
/// let flipped = evaluator.evaluate(&[PI])?;
/// assert!((score(&flipped, &target) - 1.0).abs() < 1e-12);
/// # Ok::<(), HandoptError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: A scripted session
// Feeds guesses from a buffer instead of stdin and runs until the budget is spent.
/// ```
/// use handopt::{
///     Angle, CircuitBuilder, CircuitEvaluator, ConsoleInput, HandoptError, Operation, QubitState,
///     SessionBuilder, TargetState, TerminationReason,
/// };
/// use std::io::{self, Cursor};
///
/// let circuit = CircuitBuilder::new().add_op(Operation::rx(Angle::Symbol(0))).build();
/// let mut session = SessionBuilder::new(
///     Box::new(CircuitEvaluator::new(circuit)),
///     TargetState::new(QubitState::zero()),
/// )
/// .budget(2)
/// .input(Box::new(ConsoleInput::new(Cursor::new(b"1.0\n0.0\n".to_vec()), io::sink())))
/// .output(Box::new(io::sink()))
/// .build()?;
///
/// assert_eq!(session.run()?, TerminationReason::BudgetExhausted);
/// assert_eq!(session.cache().len(), 2);
/// assert!(session.cache().all()[1].loss() < 1e-12);
/// # Ok::<(), HandoptError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
