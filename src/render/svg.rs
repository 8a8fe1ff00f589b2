// src/render/svg.rs

use super::{RenderPoint, TrajectoryRenderer};
use crate::color::Color;
use crate::core::{BlochVector, HandoptError};
use crate::operations::Axis;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::Color as _;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Segments used to approximate great circles.
const CIRCLE_SEGMENTS: usize = 96;

/// Distance from the origin, in sphere radii, at which axis letters sit.
const LABEL_OFFSET: f64 = 1.15;

/// Axis letters as stroke polylines in a unit box centered on the origin, y up.
/// Drawn as paths so no font backend is needed.
fn axis_glyph(axis: Axis) -> &'static [&'static [(f64, f64)]] {
    match axis {
        Axis::X => &[&[(-0.5, -0.5), (0.5, 0.5)], &[(-0.5, 0.5), (0.5, -0.5)]],
        Axis::Y => &[&[(-0.5, 0.5), (0.0, 0.0)], &[(0.5, 0.5), (-0.25, -0.5)]],
        Axis::Z => &[&[(-0.5, 0.5), (0.5, 0.5), (-0.5, -0.5), (0.5, -0.5)]],
    }
}

/// Fixed oblique camera looking at the unit sphere.
#[derive(Debug, Clone, Copy)]
struct View {
    /// Screen-right unit vector.
    right: [f64; 3],
    /// Screen-up unit vector.
    up: [f64; 3],
    /// Unit vector pointing at the viewer.
    toward: [f64; 3],
}

impl View {
    fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        let (az, el) = (azimuth_deg.to_radians(), elevation_deg.to_radians());
        Self {
            right: [-az.sin(), az.cos(), 0.0],
            up: [-el.sin() * az.cos(), -el.sin() * az.sin(), el.cos()],
            toward: [el.cos() * az.cos(), el.cos() * az.sin(), el.sin()],
        }
    }

    fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// (screen x, screen y, depth) of a point, screen axes in sphere units.
    fn project(&self, p: [f64; 3]) -> (f64, f64, f64) {
        (Self::dot(p, self.right), Self::dot(p, self.up), Self::dot(p, self.toward))
    }
}

/// Writes the Bloch-sphere trajectory to an SVG file, redrawing it completely
/// on each call.
#[derive(Debug)]
pub struct SvgBlochRenderer {
    output: PathBuf,
    size: (u32, u32),
    view: View,
}

impl SvgBlochRenderer {
    /// Creates the renderer, making sure the output directory exists.
    pub fn new(output: impl Into<PathBuf>, size: (u32, u32)) -> Result<Self, HandoptError> {
        let output = output.into();
        if size.0 < 32 || size.1 < 32 {
            return Err(HandoptError::config(format!("SVG size {}x{} is too small", size.0, size.1)));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            output,
            size,
            view: View::new(-60.0, 30.0),
        })
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl TrajectoryRenderer for SvgBlochRenderer {
    fn render(&mut self, points: &[RenderPoint], current: usize) -> Result<(), HandoptError> {
        let root = SVGBackend::new(&self.output, self.size).into_drawing_area();
        draw_trajectory(&root, self.view, points, current)
            .map_err(|e| HandoptError::renderer(format!("render error: {e}")))?;
        root.present()
            .map_err(|e| HandoptError::renderer(format!("render error: {e}")))?;
        debug!(points = points.len(), path = %self.output.display(), "trajectory redrawn");
        Ok(())
    }
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn draw_trajectory<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    view: View,
    points: &[RenderPoint],
    current: usize,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (w, h) = root.dim_in_pixel();
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = 0.42 * w.min(h) as f64;
    let to_px = |p: [f64; 3]| {
        let (sx, sy, _) = view.project(p);
        ((cx + sx * radius).round() as i32, (cy - sy * radius).round() as i32)
    };

    // Sphere silhouette
    root.draw(&Circle::new(
        (cx.round() as i32, cy.round() as i32),
        radius.round() as u32,
        ShapeStyle::from(&BLACK.mix(0.5)).stroke_width(1),
    ))?;

    // Equator and the x-z meridian
    let great_circle = |f: &dyn Fn(f64) -> [f64; 3]| -> Vec<(i32, i32)> {
        (0..=CIRCLE_SEGMENTS)
            .map(|i| to_px(f(2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64)))
            .collect()
    };
    let guide = ShapeStyle::from(&BLACK.mix(0.2)).stroke_width(1);
    root.draw(&PathElement::new(great_circle(&|t: f64| [t.cos(), t.sin(), 0.0]), guide))?;
    root.draw(&PathElement::new(great_circle(&|t: f64| [t.sin(), 0.0, t.cos()]), guide))?;

    // Axes, each labeled past its positive end
    let glyph_size = (0.05 * radius).max(4.0);
    let label = ShapeStyle::from(&BLACK.mix(0.8)).stroke_width(2);
    for (axis, dir) in [
        (Axis::X, [1.0, 0.0, 0.0]),
        (Axis::Y, [0.0, 1.0, 0.0]),
        (Axis::Z, [0.0, 0.0, 1.0]),
    ] {
        let neg = [-dir[0], -dir[1], -dir[2]];
        root.draw(&PathElement::new(vec![to_px(neg), to_px(dir)], guide))?;

        let (lx, ly) = to_px([dir[0] * LABEL_OFFSET, dir[1] * LABEL_OFFSET, dir[2] * LABEL_OFFSET]);
        for stroke in axis_glyph(axis) {
            let path: Vec<(i32, i32)> = stroke
                .iter()
                .map(|&(gx, gy)| {
                    (lx + (gx * glyph_size).round() as i32, ly - (gy * glyph_size).round() as i32)
                })
                .collect();
            root.draw(&PathElement::new(path, label))?;
        }
    }

    // Prior trials first so the current one is drawn on top
    for (i, point) in points.iter().enumerate() {
        if i == current {
            continue;
        }
        let BlochVector { x, y, z } = point.bloch;
        let (_, _, depth) = view.project([x, y, z]);
        let alpha = if depth < 0.0 { 0.45 } else { 1.0 };
        root.draw(&Circle::new(to_px([x, y, z]), 5u32, to_rgb(point.color).mix(alpha).filled()))?;
    }

    if let Some(point) = points.get(current) {
        let BlochVector { x, y, z } = point.bloch;
        let tip = to_px([x, y, z]);
        let style = to_rgb(point.color);
        root.draw(&PathElement::new(vec![to_px([0.0, 0.0, 0.0]), tip], style.stroke_width(3)))?;
        root.draw(&Circle::new(tip, 8u32, style.filled()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_svg(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("handopt-{}-{}.svg", name, std::process::id()))
    }

    #[test]
    fn test_projection_of_north_pole_is_up() {
        let view = View::new(-60.0, 30.0);
        let (sx, sy, _) = view.project([0.0, 0.0, 1.0]);
        assert!(sx.abs() < 1e-12);
        assert!(sy > 0.0);
    }

    #[test]
    fn test_render_writes_svg_with_every_point() -> Result<(), HandoptError> {
        let path = temp_svg("render");
        let mut renderer = SvgBlochRenderer::new(&path, (320, 320))?;
        let points = vec![
            RenderPoint { bloch: BlochVector { x: 0.0, y: 0.0, z: 1.0 }, color: Color::new(0, 0, 255) },
            RenderPoint { bloch: BlochVector { x: 1.0, y: 0.0, z: 0.0 }, color: Color::new(255, 0, 0) },
            RenderPoint { bloch: BlochVector { x: 0.0, y: 0.0, z: -1.0 }, color: Color::EMPHASIS },
        ];
        renderer.render(&points, 2)?;

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        // Silhouette + two prior trials + current trial
        assert!(svg.matches("<circle").count() >= 4);
        // Guides, axes, five label strokes and the state vector
        assert!(svg.matches("<polyline").count() >= 11);
        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn test_every_axis_has_a_label() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let strokes = axis_glyph(axis);
            assert!(!strokes.is_empty(), "axis {}", axis);
            for stroke in strokes {
                assert!(stroke.len() >= 2);
                assert!(stroke.iter().all(|&(x, y)| x.abs() <= 0.5 && y.abs() <= 0.5));
            }
        }
    }

    #[test]
    fn test_axis_labels_sit_outside_the_sphere() {
        let view = View::new(-60.0, 30.0);
        for dir in [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            let (sx, sy, _) = view.project([dir[0] * LABEL_OFFSET, dir[1] * LABEL_OFFSET, 0.0]);
            let (ex, ey, _) = view.project(dir);
            assert!(sx.hypot(sy) > ex.hypot(ey));
        }
    }

    #[test]
    fn test_rejects_tiny_canvas() {
        assert!(matches!(
            SvgBlochRenderer::new(temp_svg("tiny"), (8, 8)),
            Err(HandoptError::Config { .. })
        ));
    }
}
