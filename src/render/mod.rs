// src/render/mod.rs

//! Trajectory rendering seam plus the built-in backends.

mod svg;

pub use svg::SvgBlochRenderer;

use crate::color::Color;
use crate::core::{BlochVector, HandoptError};

/// One point of the trajectory as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPoint {
    pub bloch: BlochVector,
    pub color: Color,
}

/// Draws the whole trajectory from scratch on every call.
///
/// `points` is in trajectory order and `current` indexes the point belonging
/// to the trial in progress (always the last one when called by the session).
/// Errors are fatal to the session.
pub trait TrajectoryRenderer {
    fn render(&mut self, points: &[RenderPoint], current: usize) -> Result<(), HandoptError>;
}

/// Headless backend that draws nothing.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl TrajectoryRenderer for NullRenderer {
    fn render(&mut self, _points: &[RenderPoint], _current: usize) -> Result<(), HandoptError> {
        Ok(())
    }
}

impl<R: TrajectoryRenderer + ?Sized> TrajectoryRenderer for Box<R> {
    fn render(&mut self, points: &[RenderPoint], current: usize) -> Result<(), HandoptError> {
        (**self).render(points, current)
    }
}
