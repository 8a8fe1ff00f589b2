// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

pub use error::HandoptError;
pub use state::{BlochVector, QuantumOutputState, QubitState, TargetState};

pub mod constants;
pub use constants::tolerances::{NORM_TOLERANCE, ZERO_NORM}; // Re-export
