// src/color/mod.rs

//! Maps a loss value to a display color through a fixed diverging colormap.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of discrete levels each colormap is sampled into.
pub const COLORMAP_LEVELS: usize = 100;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Color used to single out the current trial in a redraw.
    pub const EMPHASIS: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn from_unit_rgb(rgb: [f64; 3]) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Diverging colormaps, low end blue and high end red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Colormap {
    /// Blue → white → red, piecewise linear.
    Bwr,
    /// Moreland's cool-warm: blue → light grey → red with perceptually smoother steps.
    #[default]
    Coolwarm,
}

impl Colormap {
    // (position, rgb) anchors; colors are linearly interpolated between them
    const BWR: [(f64, [f64; 3]); 3] = [
        (0.0, [0.0, 0.0, 1.0]),
        (0.5, [1.0, 1.0, 1.0]),
        (1.0, [1.0, 0.0, 0.0]),
    ];
    const COOLWARM: [(f64, [f64; 3]); 5] = [
        (0.0, [0.2298, 0.2987, 0.7537]),
        (0.25, [0.5543, 0.6901, 0.9955]),
        (0.5, [0.8654, 0.8654, 0.8654]),
        (0.75, [0.9567, 0.5980, 0.4773]),
        (1.0, [0.7057, 0.0156, 0.1502]),
    ];

    fn anchors(&self) -> &'static [(f64, [f64; 3])] {
        match self {
            Colormap::Bwr => &Self::BWR,
            Colormap::Coolwarm => &Self::COOLWARM,
        }
    }

    /// Continuous colormap value at `t ∈ [0, 1]`.
    fn sample(&self, t: f64) -> [f64; 3] {
        let anchors = self.anchors();
        let t = t.clamp(0.0, 1.0);
        for pair in anchors.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let w = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                return [
                    c0[0] + w * (c1[0] - c0[0]),
                    c0[1] + w * (c1[1] - c0[1]),
                    c0[2] + w * (c1[2] - c0[2]),
                ];
            }
        }
        anchors[anchors.len() - 1].1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Bwr => "bwr",
            Colormap::Coolwarm => "coolwarm",
        }
    }
}

/// Deterministic loss → color mapping for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMapper {
    colormap: Colormap,
    invert: bool,
}

impl ColorMapper {
    /// `invert = false` paints low loss blue; `true` paints low loss red.
    pub fn new(colormap: Colormap, invert: bool) -> Self {
        Self { colormap, invert }
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    /// Color for a loss value, quantized to `COLORMAP_LEVELS` levels.
    /// Out-of-range losses are clamped; NaN is treated as the worst loss.
    pub fn color_for(&self, loss: f64) -> Color {
        let loss = if loss.is_nan() { 1.0 } else { loss.clamp(0.0, 1.0) };
        let position = if self.invert { 1.0 - loss } else { loss };
        let level = ((position * COLORMAP_LEVELS as f64) as usize).min(COLORMAP_LEVELS - 1);
        let t = level as f64 / (COLORMAP_LEVELS - 1) as f64;
        Color::from_unit_rgb(self.colormap.sample(t))
    }

    /// Hue name painted on trials close to the target.
    pub fn improving_hue(&self) -> &'static str {
        if self.invert { "Red" } else { "Blue" }
    }

    /// Hue name painted on trials far from the target.
    pub fn worsening_hue(&self) -> &'static str {
        if self.invert { "Blue" } else { "Red" }
    }
}
