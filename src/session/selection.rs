// src/session/selection.rs

use crate::core::HandoptError;

/// Which of the entered parameters are forwarded to the evaluator.
///
/// The user is asked for `entered` values; the evaluator receives only the
/// values at `forwarded` (0-based, strictly increasing). Values not forwarded
/// are decoys and are always disclosed in the session banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSelection {
    entered: usize,
    forwarded: Vec<usize>,
}

impl ParameterSelection {
    /// Forwards every one of `count` entered values.
    pub fn all(count: usize) -> Self {
        Self { entered: count, forwarded: (0..count).collect() }
    }

    /// Forwards the listed indices of `entered` values.
    pub fn new(entered: usize, forwarded: Vec<usize>) -> Result<Self, HandoptError> {
        if forwarded.is_empty() && entered > 0 {
            return Err(HandoptError::config(format!(
                "At least one of the {} entered parameters must be forwarded",
                entered
            )));
        }
        if forwarded.windows(2).any(|w| w[0] >= w[1]) {
            return Err(HandoptError::config(format!(
                "Forwarded parameter indices must be strictly increasing, got {:?}",
                forwarded
            )));
        }
        if let Some(&max) = forwarded.last() {
            if max >= entered {
                return Err(HandoptError::config(format!(
                    "Forwarded parameter index {} is out of range for {} entered parameters",
                    max, entered
                )));
            }
        }
        Ok(Self { entered, forwarded })
    }

    pub fn entered(&self) -> usize {
        self.entered
    }

    pub fn forwarded(&self) -> &[usize] {
        &self.forwarded
    }

    /// Indices of the entered values the evaluator never sees.
    pub fn ignored(&self) -> Vec<usize> {
        (0..self.entered).filter(|i| !self.forwarded.contains(i)).collect()
    }

    pub fn is_filtering(&self) -> bool {
        self.forwarded.len() < self.entered
    }

    /// Picks the forwarded values out of a full entered vector.
    pub fn apply(&self, entered: &[f64]) -> Result<Vec<f64>, HandoptError> {
        if entered.len() != self.entered {
            return Err(HandoptError::evaluator(format!(
                "Expected {} entered parameters, got {}",
                self.entered,
                entered.len()
            )));
        }
        Ok(self.forwarded.iter().map(|&i| entered[i]).collect())
    }

    /// Banner line describing the decoys, if there are any.
    pub fn disclosure(&self) -> Option<String> {
        if !self.is_filtering() {
            return None;
        }
        let names = |indices: &[usize]| {
            indices.iter().map(|i| format!("x{}", i + 1)).collect::<Vec<_>>().join(", ")
        };
        let ignored = self.ignored();
        Some(format!(
            "Note: only {} are passed to the circuit; {} {} no effect on the outcome.",
            names(&self.forwarded),
            names(&ignored),
            if ignored.len() == 1 { "has" } else { "have" }
        ))
    }
}
