//! Rain drops fall into place one row group at a time.

use std::ops::RangeInclusive;

use glyphfall_core::{Coord, Easing, Gradient};
use glyphfall_engine::{Action, CharacterId, EngineResult, Event, Grouping, Terminal};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::status;
use crate::chars::{RAIN_COLORS, RAIN_SYMBOLS};
use crate::{Effect, EffectSettings, EffectStatus};

const FALL_SPEED: RangeInclusive<f64> = 0.33..=0.57;
const RELEASED_PER_FRAME: RangeInclusive<usize> = 1..=3;
const FADE_STEPS: usize = 7;
const FADE_FRAME_TICKS: usize = 3;

/// Characters drop from the top row of their column, bottom rows first, and
/// fade from rain colors into the final gradient when they land.
#[derive(Debug)]
pub struct Rain {
    settings: EffectSettings,
    /// Row groups still to release, the next group last.
    pending: Vec<Vec<CharacterId>>,
}

impl Rain {
    pub fn new(settings: EffectSettings) -> Self {
        Self {
            settings,
            pending: Vec::new(),
        }
    }

    fn release(terminal: &mut Terminal, id: CharacterId) -> EngineResult<()> {
        terminal.set_visibility(id, true)?;
        terminal.character_mut(id)?.activate_path("fall")?;
        terminal.activate_character(id)
    }
}

impl Effect for Rain {
    fn prepare(&mut self, terminal: &mut Terminal) -> EngineResult<()> {
        let top = terminal.output_area().top;
        let colors = self.settings.final_colors(terminal);
        let mut groups = terminal.characters_grouped(Grouping::RowBottomToTop);

        for group in &mut groups {
            group.shuffle(terminal.rng());
            for &id in group.iter() {
                let rng = terminal.rng();
                let glyph = RAIN_SYMBOLS[rng.gen_range(0..RAIN_SYMBOLS.len())];
                let rain_color = RAIN_COLORS[rng.gen_range(0..RAIN_COLORS.len())];
                let speed = rng.gen_range(FALL_SPEED) * self.settings.speed;

                let character = terminal.character_mut(id)?;
                let home = character.input_coord();
                let symbol = character.input_symbol();
                let final_color = self.settings.final_color(&colors, home);

                character.motion.set_coordinate(Coord::new(home.column, top));
                character.animation.set_appearance(glyph, Some(rain_color));
                character
                    .motion
                    .new_path(speed, Some("fall"))?
                    .set_ease(Easing::InQuad)
                    .new_waypoint(home, None, None)?;

                let fade = Gradient::new(&[rain_color, final_color], &[FADE_STEPS], false)?;
                character
                    .animation
                    .new_scene(Some("fade"))?
                    .apply_gradient_to_symbols(&fade, &[symbol], FADE_FRAME_TICKS)?;
                character.event_handler.register_event(
                    Event::PathComplete,
                    "fall",
                    Action::ActivateScene("fade".into()),
                );
            }
        }

        groups.reverse();
        debug!(groups = groups.len(), "rain prepared");
        self.pending = groups;
        Ok(())
    }

    fn step(&mut self, terminal: &mut Terminal) -> EngineResult<EffectStatus> {
        if let Some(group) = self.pending.last_mut() {
            let count = terminal.rng().gen_range(RELEASED_PER_FRAME);
            for _ in 0..count {
                match group.pop() {
                    Some(id) => Self::release(terminal, id)?,
                    None => break,
                }
            }
            if group.is_empty() {
                self.pending.pop();
            }
        }
        terminal.tick()?;
        Ok(status(terminal, !self.pending.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing;

    #[test]
    fn bottom_row_falls_first() {
        let mut terminal = testing::terminal("ab\ncd");
        let mut effect = Rain::new(testing::settings());
        effect.prepare(&mut terminal).unwrap();
        assert!(terminal.characters().iter().all(|c| !c.is_visible()));

        effect.step(&mut terminal).unwrap();
        let bottom = terminal.characters().iter().map(|c| c.input_coord().row).max().unwrap();
        let released: Vec<_> = terminal.characters().iter().filter(|c| c.is_visible()).collect();
        assert!(!released.is_empty());
        assert!(released.iter().all(|c| c.input_coord().row == bottom));
    }

    #[test]
    fn drops_start_on_the_top_row_as_rain() {
        let mut terminal = testing::terminal("ab\ncd");
        Rain::new(testing::settings()).prepare(&mut terminal).unwrap();
        for character in terminal.characters() {
            assert_eq!(character.current_coord().row, 0);
            assert!(RAIN_SYMBOLS.contains(&character.symbol()));
        }
    }

    #[test]
    fn settles_into_the_final_gradient() {
        let settings = testing::settings();
        let mut terminal = testing::terminal("ab\ncd");
        let mut effect = Rain::new(settings.clone());
        testing::run(&mut effect, &mut terminal, 500);
        testing::assert_settled(&terminal, &settings);
    }
}
