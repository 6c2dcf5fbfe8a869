//! Effects for glyphfall.
//!
//! An effect is a choreography script: [`Effect::prepare`] builds paths,
//! scenes and event wiring for every character of a [`Terminal`], then
//! [`Effect::step`] releases characters and advances the terminal one frame
//! at a time until everything has settled.

mod chars;
mod effects;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use glyphfall_core::{Color, Coord, Easing, Gradient, GradientDirection};
use glyphfall_engine::{EngineResult, Terminal};
use thiserror::Error;

pub use effects::{Expand, Rain, Slide};

/// Whether an effect has frames left to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStatus {
    Running,
    Complete,
}

/// A choreography driving one [`Terminal`].
pub trait Effect {
    /// Wire up every character. Called once before the first step.
    fn prepare(&mut self, terminal: &mut Terminal) -> EngineResult<()>;

    /// Produce the next frame.
    fn step(&mut self, terminal: &mut Terminal) -> EngineResult<EffectStatus>;
}

/// Settings shared by every effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSettings {
    /// Colors the text settles into.
    pub final_gradient: Gradient,
    pub gradient_direction: GradientDirection,
    /// Easing for the main movement of effects that take one.
    pub easing: Easing,
    /// Multiplier applied to every effect's base movement speed.
    pub speed: f64,
}

impl EffectSettings {
    pub fn new(final_gradient: Gradient) -> Self {
        Self {
            final_gradient,
            gradient_direction: GradientDirection::default(),
            easing: Easing::InOutExpo,
            speed: 1.0,
        }
    }

    /// Final color of every cell of the terminal's output area.
    pub(crate) fn final_colors(&self, terminal: &Terminal) -> HashMap<Coord, Color> {
        let area = terminal.output_area();
        self.final_gradient.build_coordinate_color_mapping(
            area.top,
            area.bottom,
            area.left,
            area.right,
            self.gradient_direction,
        )
    }

    pub(crate) fn final_color(&self, colors: &HashMap<Coord, Color>, coord: Coord) -> Color {
        colors
            .get(&coord)
            .copied()
            .unwrap_or_else(|| self.final_gradient.last())
    }
}

/// Raised for effect names nobody implements.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown effect '{0}' (expected one of: expand, rain, slide)")]
pub struct UnknownEffect(pub String);

/// The effects available by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectKind {
    #[default]
    Expand,
    Rain,
    Slide,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Expand, EffectKind::Rain, EffectKind::Slide];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Expand => "expand",
            EffectKind::Rain => "rain",
            EffectKind::Slide => "slide",
        }
    }

    /// Instantiate the effect.
    pub fn build(self, settings: EffectSettings) -> Box<dyn Effect> {
        match self {
            EffectKind::Expand => Box::new(Expand::new(settings)),
            EffectKind::Rain => Box::new(Rain::new(settings)),
            EffectKind::Slide => Box::new(Slide::new(settings)),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.name().parse::<EffectKind>(), Ok(kind));
        }
        assert_eq!(" Rain ".parse::<EffectKind>(), Ok(EffectKind::Rain));
        assert_eq!(
            "fireworks".parse::<EffectKind>(),
            Err(UnknownEffect("fireworks".into()))
        );
    }

    #[test]
    fn unmapped_cells_fall_back_to_the_last_stop() {
        let gradient =
            Gradient::new(&[Color::Rgb(0, 0, 0), Color::Rgb(255, 0, 0)], &[4], false).unwrap();
        let settings = EffectSettings::new(gradient);
        let colors = HashMap::new();
        assert_eq!(
            settings.final_color(&colors, Coord::new(3, 3)),
            Color::Rgb(255, 0, 0)
        );
    }
}
