//! Configuration for glyphfall.
//!
//! Values are layered, highest priority first:
//!
//! 1. command line flags (applied by the binary onto a loaded [`Config`])
//! 2. the config file, `<config dir>/glyphfall/config.toml` by default
//! 3. built-in defaults
//!
//! Everything is kept as plain strings and numbers until [`Config::resolve`]
//! validates it into engine types, so a bad value is reported once, before
//! any animation starts.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use glyphfall_core::{Color, ColorMode, Easing, Gradient, GradientDirection};
use glyphfall_effects::{EffectKind, EffectSettings};
use glyphfall_engine::TerminalConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use error::{ConfigError, ConfigResult};

/// Highest accepted frame rate.
pub const MAX_FPS: u32 = 240;

/// Root of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Effect name, see [`EffectKind`].
    pub effect: String,
    pub fps: u32,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
    pub terminal: TerminalSection,
    pub gradient: GradientSection,
    pub motion: MotionSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            effect: EffectKind::default().name().to_string(),
            fps: 60,
            seed: None,
            terminal: TerminalSection::default(),
            gradient: GradientSection::default(),
            motion: MotionSection::default(),
        }
    }
}

/// `[terminal]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerminalSection {
    pub tab_width: usize,
    pub wrap_text: bool,
    /// `truecolor`, `xterm256` or `none`.
    pub color_mode: String,
    /// Cap on the rows of the inline viewport.
    pub max_height: Option<u16>,
}

impl Default for TerminalSection {
    fn default() -> Self {
        Self {
            tab_width: 4,
            wrap_text: false,
            color_mode: "truecolor".to_string(),
            max_height: None,
        }
    }
}

/// `[gradient]`: the colors the text settles into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradientSection {
    /// `#rrggbb`, `rrggbb` or an xterm-256 index.
    pub stops: Vec<String>,
    pub steps: Vec<usize>,
    /// `vertical`, `horizontal`, `diagonal` or `radial`.
    pub direction: String,
    pub looping: bool,
}

impl Default for GradientSection {
    fn default() -> Self {
        Self {
            stops: vec!["8A008A".into(), "00D1FF".into(), "FFFFFF".into()],
            steps: vec![12],
            direction: "vertical".to_string(),
            looping: false,
        }
    }
}

/// `[motion]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionSection {
    /// snake_case easing name such as `in_out_expo`.
    pub easing: String,
    /// Multiplier on every effect's base speed.
    pub speed: f64,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            easing: Easing::InOutExpo.name().to_string(),
            speed: 1.0,
        }
    }
}

/// Validated configuration, ready to drive a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub effect: EffectKind,
    pub settings: EffectSettings,
    /// Layout settings; the viewport is left for the caller to fill in.
    pub terminal: TerminalConfig,
    pub fps: u32,
    pub max_height: Option<u16>,
}

impl Config {
    /// `<config dir>/glyphfall/config.toml`, when a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "glyphfall").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) if !path.exists() => Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn read(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Validate every field into engine types.
    pub fn resolve(&self) -> ConfigResult<Resolved> {
        let effect: EffectKind = self.effect.parse()?;
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        if !(self.motion.speed.is_finite() && self.motion.speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(self.motion.speed));
        }

        let stops = self
            .gradient
            .stops
            .iter()
            .map(|stop| stop.parse::<Color>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ConfigError::invalid("gradient.stops", source))?;
        let final_gradient = Gradient::new(&stops, &self.gradient.steps, self.gradient.looping)
            .map_err(|source| ConfigError::invalid("gradient", source))?;
        let direction: GradientDirection = self
            .gradient
            .direction
            .parse()
            .map_err(|source| ConfigError::invalid("gradient.direction", source))?;
        let easing: Easing = self
            .motion
            .easing
            .parse()
            .map_err(|source| ConfigError::invalid("motion.easing", source))?;
        let color_mode: ColorMode = self
            .terminal
            .color_mode
            .parse()
            .map_err(|source| ConfigError::invalid("terminal.color_mode", source))?;

        Ok(Resolved {
            effect,
            settings: EffectSettings {
                final_gradient,
                gradient_direction: direction,
                easing,
                speed: self.motion.speed,
            },
            terminal: TerminalConfig {
                tab_width: self.terminal.tab_width,
                wrap_text: self.terminal.wrap_text,
                color_mode,
                seed: self.seed,
                ..TerminalConfig::default()
            },
            fps: self.fps,
            max_height: self.terminal.max_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use glyphfall_core::CoreError;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_resolve() {
        let resolved = Config::default().resolve().unwrap();
        assert_eq!(resolved.effect, EffectKind::Expand);
        assert_eq!(resolved.fps, 60);
        assert_eq!(resolved.settings.easing, Easing::InOutExpo);
        assert_eq!(resolved.settings.final_gradient.first(), Color::Rgb(0x8a, 0x00, 0x8a));
        assert_eq!(resolved.settings.final_gradient.last(), Color::Rgb(0xff, 0xff, 0xff));
        assert_eq!(resolved.terminal.color_mode, ColorMode::TrueColor);
    }

    #[test]
    fn partial_files_keep_other_defaults() {
        let file = write_config(
            r#"
effect = "rain"
seed = 9

[motion]
speed = 2.5
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.effect, "rain");
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.motion.speed, 2.5);
        assert_eq!(config.motion.easing, "in_out_expo");
        assert_eq!(config.terminal, TerminalSection::default());

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.effect, EffectKind::Rain);
        assert_eq!(resolved.terminal.seed, Some(9));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn malformed_toml_is_reported_with_its_path() {
        let file = write_config("fps = \"fast\"");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn bad_values_name_their_field() {
        let mut config = Config::default();
        config.gradient.stops = vec!["#12345".into()];
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Invalid {
                field: "gradient.stops",
                source: CoreError::InvalidColor(value),
            }) if value == "#12345"
        ));

        let mut config = Config::default();
        config.motion.easing = "wobbly".into();
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Invalid { field: "motion.easing", .. })
        ));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        let mut config = Config::default();
        config.fps = 0;
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidFps(0))));

        let mut config = Config::default();
        config.motion.speed = -1.0;
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidSpeed(speed)) if speed == -1.0));
    }

    #[test]
    fn unknown_effects_are_rejected() {
        let config = Config {
            effect: "fireworks".into(),
            ..Config::default()
        };
        assert!(matches!(config.resolve(), Err(ConfigError::UnknownEffect(_))));
    }
}
