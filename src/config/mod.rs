// src/config/mod.rs

//! Session configuration, loaded from TOML and overridable from the command line.
//!
//! ```toml
//! preset = "black-box"
//! iterations = 50
//! colormap = "coolwarm"
//! invert_colors = false
//!
//! [target]
//! random = true
//! seed = 7
//!
//! [render]
//! kind = "svg"
//! output = "trajectory.svg"
//! width = 640
//! height = 640
//! ```

mod presets;

pub use presets::{Preset, PresetSettings};

use crate::color::{ColorMapper, Colormap};
use crate::core::{HandoptError, QubitState, TargetState};
use crate::render::{NullRenderer, SvgBlochRenderer, TrajectoryRenderer};
use crate::session::SessionBuilder;
use crate::simulation::CircuitEvaluator;
use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hidden target selection. Leaving it out uses the preset's target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Explicit amplitudes `[[re, im], [re, im]]`, rescaled to unit norm.
    pub amplitudes: Option<[[f64; 2]; 2]>,
    /// Draw a uniformly random pure state instead.
    pub random: bool,
    /// Seed for `random`; OS entropy when absent.
    pub seed: Option<u64>,
}

impl TargetConfig {
    /// Resolves to a concrete state, or `None` to keep the preset's.
    pub fn resolve(&self) -> Result<Option<QubitState>, HandoptError> {
        match (self.amplitudes, self.random) {
            (Some(_), true) => Err(HandoptError::config("target: set either `amplitudes` or `random`, not both")),
            (Some([[a_re, a_im], [b_re, b_im]]), false) => {
                QubitState::normalized(Complex::new(a_re, a_im), Complex::new(b_re, b_im))
                    .map(Some)
                    .map_err(|e| HandoptError::config(format!("target amplitudes: {}", e)))
            }
            (None, true) => random_state(self.seed).map(Some),
            (None, false) => Ok(None),
        }
    }
}

/// Uniformly distributed pure state (uniform over the Bloch sphere surface).
pub fn random_state(seed: Option<u64>) -> Result<QubitState, HandoptError> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let u: f64 = rng.random();
    let v: f64 = rng.random();
    // cos θ uniform in [-1, 1], φ uniform in [0, 2π)
    let theta = (1.0 - 2.0 * u).clamp(-1.0, 1.0).acos();
    let phi = 2.0 * PI * v;
    let a = Complex::new((theta / 2.0).cos(), 0.0);
    let b = Complex::from_polar((theta / 2.0).sin(), phi);
    QubitState::normalized(a, b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RenderKind {
    #[default]
    Svg,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub kind: RenderKind,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            kind: RenderKind::Svg,
            output: PathBuf::from("trajectory.svg"),
            width: 640,
            height: 640,
        }
    }
}

impl RenderConfig {
    pub fn build(&self) -> Result<Box<dyn TrajectoryRenderer>, HandoptError> {
        match self.kind {
            RenderKind::Svg => {
                let renderer = SvgBlochRenderer::new(&self.output, (self.width, self.height))?;
                info!(path = %self.output.display(), "drawing trajectory to SVG");
                Ok(Box::new(renderer))
            }
            RenderKind::None => Ok(Box::new(NullRenderer)),
        }
    }
}

/// Command-line values layered over a loaded `SessionConfig`.
///
/// `None` and `false` leave the configured value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub preset: Option<Preset>,
    pub iterations: Option<usize>,
    pub colormap: Option<Colormap>,
    pub invert_colors: bool,
    pub random_target: bool,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub no_render: bool,
}

/// Top-level session configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub preset: Preset,
    /// Iteration budget; the preset's when absent.
    pub iterations: Option<usize>,
    /// Colormap; the preset's when absent.
    pub colormap: Option<Colormap>,
    /// Paint low loss red instead of blue.
    pub invert_colors: bool,
    pub target: TargetConfig,
    pub render: RenderConfig,
}

impl SessionConfig {
    /// Parses a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, HandoptError> {
        toml::from_str(text).map_err(|e| HandoptError::config(format!("invalid config: {}", e)))
    }

    /// Loads from `path`, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, HandoptError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| HandoptError::config(format!("cannot read {}: {}", path.display(), e)))?;
                let config = Self::from_toml(&text)?;
                debug!(path = %path.display(), ?config, "configuration loaded");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides in place.
    ///
    /// Asking for a random target (or giving a seed) drops explicit
    /// amplitudes; a seed already in the file survives unless a new one is given.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(preset) = overrides.preset {
            self.preset = preset;
        }
        if let Some(iterations) = overrides.iterations {
            self.iterations = Some(iterations);
        }
        if let Some(colormap) = overrides.colormap {
            self.colormap = Some(colormap);
        }
        if overrides.invert_colors {
            self.invert_colors = true;
        }
        if overrides.random_target || overrides.seed.is_some() {
            self.target = TargetConfig {
                amplitudes: None,
                random: true,
                seed: overrides.seed.or(self.target.seed),
            };
        }
        if let Some(output) = &overrides.output {
            self.render.kind = RenderKind::Svg;
            self.render.output = output.clone();
        }
        if overrides.no_render {
            self.render.kind = RenderKind::None;
        }
        debug!(?overrides, "command-line overrides applied");
    }

    pub fn to_toml(&self) -> Result<String, HandoptError> {
        toml::to_string_pretty(self).map_err(|e| HandoptError::config(format!("cannot serialize config: {}", e)))
    }

    /// Resolves the preset and overrides into a session builder. Input and
    /// output are left for the caller to attach.
    pub fn session_builder(&self) -> Result<SessionBuilder, HandoptError> {
        let settings = self.preset.settings()?;
        let target = self.target.resolve()?.unwrap_or(settings.target);
        let colormap = self.colormap.unwrap_or(settings.colormap);
        let budget = self.iterations.unwrap_or(settings.budget);

        Ok(SessionBuilder::new(Box::new(CircuitEvaluator::new(settings.circuit)), TargetState::new(target))
            .budget(budget)
            .color_mapper(ColorMapper::new(colormap, self.invert_colors))
            .selection(settings.selection)
            .renderer(self.render.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() -> Result<(), HandoptError> {
        assert_eq!(SessionConfig::from_toml("")?, SessionConfig::default());
        Ok(())
    }

    #[test]
    fn test_parse_full_document() -> Result<(), HandoptError> {
        let config = SessionConfig::from_toml(
            r#"
            preset = "black-box"
            iterations = 12
            colormap = "bwr"
            invert_colors = true

            [target]
            amplitudes = [[0.0, 0.0], [1.0, 0.0]]

            [render]
            kind = "none"
            "#,
        )?;
        assert_eq!(config.preset, Preset::BlackBox);
        assert_eq!(config.iterations, Some(12));
        assert_eq!(config.colormap, Some(Colormap::Bwr));
        assert!(config.invert_colors);
        assert_eq!(config.render.kind, RenderKind::None);
        assert_eq!(config.target.resolve()?, Some(QubitState::one()));
        Ok(())
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            SessionConfig::from_toml("iteration = 3"),
            Err(HandoptError::Config { .. })
        ));
    }

    #[test]
    fn test_conflicting_target_is_rejected() {
        let target = TargetConfig { amplitudes: Some([[1.0, 0.0], [0.0, 0.0]]), random: true, seed: None };
        assert!(target.resolve().is_err());
        let zero = TargetConfig { amplitudes: Some([[0.0, 0.0], [0.0, 0.0]]), ..Default::default() };
        assert!(zero.resolve().is_err());
    }

    #[test]
    fn test_seeded_random_target_is_reproducible() -> Result<(), HandoptError> {
        assert_eq!(random_state(Some(42))?, random_state(Some(42))?);
        let v = random_state(Some(7))?.bloch_vector();
        assert!((v.norm() - 1.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_empty_overrides_change_nothing() -> Result<(), HandoptError> {
        let mut config = SessionConfig::from_toml("preset = \"black-box\"\niterations = 9")?;
        let before = config.clone();
        config.apply_overrides(&Overrides::default());
        assert_eq!(config, before);
        Ok(())
    }

    #[test]
    fn test_overrides_win_over_file() -> Result<(), HandoptError> {
        let mut config = SessionConfig::from_toml(
            r#"
            iterations = 9
            colormap = "bwr"

            [target]
            amplitudes = [[1.0, 0.0], [0.0, 0.0]]
            "#,
        )?;
        config.apply_overrides(&Overrides {
            preset: Some(Preset::BlackBox),
            iterations: Some(4),
            invert_colors: true,
            seed: Some(3),
            output: Some(PathBuf::from("runs/t.svg")),
            ..Default::default()
        });
        assert_eq!(config.preset, Preset::BlackBox);
        assert_eq!(config.iterations, Some(4));
        assert_eq!(config.colormap, Some(Colormap::Bwr));
        assert!(config.invert_colors);
        assert_eq!(config.target, TargetConfig { amplitudes: None, random: true, seed: Some(3) });
        assert_eq!(config.render.kind, RenderKind::Svg);
        assert_eq!(config.render.output, PathBuf::from("runs/t.svg"));
        Ok(())
    }

    #[test]
    fn test_random_target_flag_keeps_file_seed() -> Result<(), HandoptError> {
        let mut config = SessionConfig::from_toml("[target]\nrandom = true\nseed = 7")?;
        config.apply_overrides(&Overrides { random_target: true, ..Default::default() });
        assert_eq!(config.target.seed, Some(7));
        assert_eq!(config.target.resolve()?, Some(random_state(Some(7))?));
        Ok(())
    }

    #[test]
    fn test_no_render_beats_output() {
        let mut config = SessionConfig::default();
        config.apply_overrides(&Overrides {
            output: Some(PathBuf::from("x.svg")),
            no_render: true,
            ..Default::default()
        });
        assert_eq!(config.render.kind, RenderKind::None);
    }

    #[test]
    fn test_toml_round_trip_keeps_overrides() -> Result<(), HandoptError> {
        let config = SessionConfig { iterations: Some(5), invert_colors: true, ..Default::default() };
        assert_eq!(SessionConfig::from_toml(&config.to_toml()?)?, config);
        Ok(())
    }
}
