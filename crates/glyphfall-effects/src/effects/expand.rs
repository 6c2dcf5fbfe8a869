//! Characters burst out of the center of the output area.

use glyphfall_core::Gradient;
use glyphfall_engine::{CharacterId, EngineResult, SyncMetric, Terminal};
use tracing::debug;

use super::status;
use crate::{Effect, EffectSettings, EffectStatus};

const BASE_SPEED: f64 = 0.35;
const GRADIENT_STEPS: usize = 10;

/// Every character travels from the center to its home while its color
/// sweeps from the first final-gradient stop to its own final color.
#[derive(Debug)]
pub struct Expand {
    settings: EffectSettings,
}

impl Expand {
    pub fn new(settings: EffectSettings) -> Self {
        Self { settings }
    }
}

impl Effect for Expand {
    fn prepare(&mut self, terminal: &mut Terminal) -> EngineResult<()> {
        let center = terminal.output_area().center();
        let colors = self.settings.final_colors(terminal);
        let ids: Vec<CharacterId> = terminal.characters().iter().map(|c| c.id()).collect();

        for &id in &ids {
            let character = terminal.character_mut(id)?;
            let home = character.input_coord();
            let symbol = character.input_symbol();
            let final_color = self.settings.final_color(&colors, home);

            character.motion.set_coordinate(center);
            character
                .motion
                .new_path(BASE_SPEED * self.settings.speed, Some("expand"))?
                .set_ease(self.settings.easing)
                .new_waypoint(home, None, None)?;

            let gradient = Gradient::new(
                &[self.settings.final_gradient.first(), final_color],
                &[GRADIENT_STEPS],
                false,
            )?;
            character
                .animation
                .new_scene(Some("gradient"))?
                .set_sync(SyncMetric::Distance)
                .apply_gradient_to_symbols(&gradient, &[symbol], 1)?;

            character.activate_path("expand")?;
            character.activate_scene("gradient")?;
            terminal.set_visibility(id, true)?;
            terminal.activate_character(id)?;
        }
        debug!(characters = ids.len(), %center, "expand prepared");
        Ok(())
    }

    fn step(&mut self, terminal: &mut Terminal) -> EngineResult<EffectStatus> {
        terminal.tick()?;
        Ok(status(terminal, false))
    }
}
