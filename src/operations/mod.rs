// src/operations/mod.rs

//! Defines the single-qubit operations a session circuit is made of.
//!
//! Every operation is a rotation about one Bloch-sphere axis. Its angle is
//! either fixed when the circuit is built or bound to a free symbol that is
//! resolved from the parameter values of each trial.

use std::fmt;

/// Rotation axis on the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Rotation angle of an operation.
#[derive(Debug, Clone, Copy, PartialEq)] // f64 payload, no Eq
pub enum Angle {
    /// A constant angle in radians.
    Fixed(f64),
    /// A free symbol, resolved from the parameter vector at this (0-based) position.
    Symbol(usize),
}

impl Angle {
    /// Resolves the angle against the supplied parameter values.
    /// Returns `None` when a symbol has no bound value.
    pub fn resolve(&self, params: &[f64]) -> Option<f64> {
        match self {
            Angle::Fixed(theta) => Some(*theta),
            Angle::Symbol(index) => params.get(*index).copied(),
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Fixed(theta) => write!(f, "{:.4}", theta),
            // Symbols are shown 1-based, as the user is prompted for them
            Angle::Symbol(index) => write!(f, "x{}", index + 1),
        }
    }
}

/// Represents one gate in a session circuit.
///
/// Analogy: `Rx`, `Ry` and `Rz` gates acting on the circuit's single qubit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `R_axis(θ) = exp(-i θ σ_axis / 2)`.
    Rotation {
        /// The rotation axis.
        axis: Axis,
        /// Fixed or symbolic rotation angle.
        angle: Angle,
    },
}

impl Operation {
    /// Shorthand for an `Rx` rotation.
    pub fn rx(angle: Angle) -> Self {
        Operation::Rotation { axis: Axis::X, angle }
    }

    /// Shorthand for an `Ry` rotation.
    pub fn ry(angle: Angle) -> Self {
        Operation::Rotation { axis: Axis::Y, angle }
    }

    /// Shorthand for an `Rz` rotation.
    pub fn rz(angle: Angle) -> Self {
        Operation::Rotation { axis: Axis::Z, angle }
    }

    /// Returns the symbol index this operation reads, if any.
    pub fn symbol(&self) -> Option<usize> {
        match self {
            Operation::Rotation { angle: Angle::Symbol(index), .. } => Some(*index),
            Operation::Rotation { .. } => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Rotation { axis, angle } => write!(f, "R{}({})", axis, angle),
        }
    }
}
