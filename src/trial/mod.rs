// src/trial/mod.rs

//! Append-only record of completed trials.

use crate::color::Color;
use crate::core::QuantumOutputState;
use std::fmt;

/// One completed iteration of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    index: usize,
    parameters: Vec<f64>,
    output: QuantumOutputState,
    loss: f64,
    color: Color,
}

impl TrialRecord {
    /// 1-based position in the trajectory.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Every value the user entered for this trial, decoys included.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn output(&self) -> &QuantumOutputState {
        &self.output
    }

    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl fmt::Display for TrialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trial {}: loss={:.6} params=[", self.index, self.loss)?;
        for (i, p) in self.parameters.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { ", " } else { "" }, p)?;
        }
        write!(f, "] {} {}", self.output, self.color)
    }
}

/// Chronologically ordered, append-only log of `TrialRecord`s.
///
/// Records can't be removed or edited. The length always equals the number
/// of completed iterations.
#[derive(Debug, Clone, Default)]
pub struct TrialCache {
    records: Vec<TrialRecord>,
}

impl TrialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a completed trial, assigning it the next sequential index.
    pub fn append(
        &mut self,
        parameters: Vec<f64>,
        output: QuantumOutputState,
        loss: f64,
        color: Color,
    ) -> &TrialRecord {
        let index = self.current_iteration();
        self.records.push(TrialRecord { index, parameters, output, loss, color });
        &self.records[self.records.len() - 1]
    }

    /// Read-only view of all records, in append order.
    pub fn all(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Index the next appended record will get.
    pub fn current_iteration(&self) -> usize {
        self.records.len() + 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TrialRecord> {
        self.records.last()
    }

    /// Lowest-loss trial so far; the earliest wins ties.
    pub fn best(&self) -> Option<&TrialRecord> {
        self.records.iter().fold(None, |best: Option<&TrialRecord>, r| match best {
            Some(b) if b.loss <= r.loss => Some(b),
            _ => Some(r),
        })
    }
}
