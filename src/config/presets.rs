// src/config/presets.rs

//! Built-in exercises: a circuit, a hidden target and the session defaults
//! that go with them.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::color::Colormap;
use crate::core::{HandoptError, QubitState};
use crate::operations::{Angle, Operation};
use crate::session::ParameterSelection;
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

/// Names of the built-in exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// One `Rx(x1)` rotation, target `|0>`.
    #[default]
    SingleRx,
    /// `Rx(π/4) Ry(x1) Rx(x2) Rz(x3)` against a fixed off-axis target, with one decoy input.
    BlackBox,
}

/// Everything a preset contributes to a session.
#[derive(Debug, Clone)]
pub struct PresetSettings {
    pub circuit: Circuit,
    pub target: QubitState,
    pub budget: usize,
    pub colormap: Colormap,
    pub selection: ParameterSelection,
}

impl Preset {
    pub fn settings(&self) -> Result<PresetSettings, HandoptError> {
        match self {
            Preset::SingleRx => Ok(PresetSettings {
                circuit: CircuitBuilder::new().add_op(Operation::rx(Angle::Symbol(0))).build(),
                target: QubitState::zero(),
                budget: 30,
                colormap: Colormap::Coolwarm,
                selection: ParameterSelection::all(1),
            }),
            Preset::BlackBox => Ok(PresetSettings {
                circuit: CircuitBuilder::new()
                    .add_op(Operation::rx(Angle::Fixed(FRAC_PI_4)))
                    .add_op(Operation::ry(Angle::Symbol(0)))
                    .add_op(Operation::rx(Angle::Symbol(1)))
                    .add_op(Operation::rz(Angle::Symbol(2)))
                    .build(),
                target: QubitState::normalized(Complex::new(0.149, 0.238), Complex::new(-0.745, -0.607))?,
                budget: 3000,
                colormap: Colormap::Bwr,
                // Entered x3 is never forwarded
                selection: ParameterSelection::new(4, vec![0, 1, 3])?,
            }),
        }
    }
}
