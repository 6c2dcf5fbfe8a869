//! Rows slide in from alternating sides.

use glyphfall_core::{Coord, Easing, Gradient};
use glyphfall_engine::{Action, CharacterId, EngineResult, Event, Grouping, Terminal};
use tracing::debug;

use super::status;
use crate::{Effect, EffectSettings, EffectStatus};

const BASE_SPEED: f64 = 0.8;
const OVERSHOOT: i32 = 2;
/// Frames between the release of consecutive rows.
const ROW_GAP: usize = 3;
const GRADIENT_STEPS: usize = 8;

/// Even rows enter from the left, odd rows from the right. Each character
/// overshoots its home, settles back onto it, and brightens into its final
/// color on the way.
#[derive(Debug)]
pub struct Slide {
    settings: EffectSettings,
    /// `(release frame, row)` pairs, the next release last.
    schedule: Vec<(usize, Vec<CharacterId>)>,
    frame: usize,
}

impl Slide {
    pub fn new(settings: EffectSettings) -> Self {
        Self {
            settings,
            schedule: Vec::new(),
            frame: 0,
        }
    }
}

impl Effect for Slide {
    fn prepare(&mut self, terminal: &mut Terminal) -> EngineResult<()> {
        let area = terminal.output_area();
        let colors = self.settings.final_colors(terminal);
        let speed = BASE_SPEED * self.settings.speed;
        let rows = terminal.characters_grouped(Grouping::RowTopToBottom);

        self.schedule.clear();
        self.frame = 0;
        for (index, row) in rows.into_iter().enumerate() {
            let from_left = index % 2 == 0;
            let (start_column, direction) = if from_left {
                (area.left - 1, 1)
            } else {
                (area.right + 1, -1)
            };

            for &id in &row {
                let character = terminal.character_mut(id)?;
                let home = character.input_coord();
                let symbol = character.input_symbol();
                let final_color = self.settings.final_color(&colors, home);

                character.motion.set_coordinate(Coord::new(start_column, home.row));
                character
                    .motion
                    .new_path(speed, Some("overshoot"))?
                    .set_ease(self.settings.easing)
                    .new_waypoint(home.offset(OVERSHOOT * direction, 0), None, None)?;
                character
                    .motion
                    .new_path(speed / 4.0, Some("settle"))?
                    .set_ease(Easing::OutQuad)
                    .new_waypoint(home, None, None)?;
                character.chain_paths(&["overshoot", "settle"], false)?;

                let gradient = Gradient::new(
                    &[final_color.adjust_brightness(0.35), final_color],
                    &[GRADIENT_STEPS],
                    false,
                )?;
                character
                    .animation
                    .new_scene(Some("gradient"))?
                    .apply_gradient_to_symbols(&gradient, &[symbol], 2)?;
                character.event_handler.register_event(
                    Event::PathActivated,
                    "overshoot",
                    Action::ActivateScene("gradient".into()),
                );
            }
            self.schedule.push((index * ROW_GAP, row));
        }

        self.schedule.reverse();
        debug!(rows = self.schedule.len(), "slide prepared");
        Ok(())
    }

    fn step(&mut self, terminal: &mut Terminal) -> EngineResult<EffectStatus> {
        while self
            .schedule
            .last()
            .is_some_and(|(release, _)| *release <= self.frame)
        {
            let Some((_, row)) = self.schedule.pop() else {
                break;
            };
            for id in row {
                terminal.set_visibility(id, true)?;
                terminal.character_mut(id)?.activate_path("overshoot")?;
                terminal.activate_character(id)?;
            }
        }
        self.frame += 1;
        terminal.tick()?;
        Ok(status(terminal, !self.schedule.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing;

    #[test]
    fn rows_enter_from_alternating_sides() {
        let mut terminal = testing::terminal("ab\ncd");
        Slide::new(testing::settings()).prepare(&mut terminal).unwrap();
        let area = terminal.output_area();
        let rows = terminal.characters_grouped(Grouping::RowTopToBottom);
        for &id in &rows[0] {
            assert_eq!(terminal.character(id).unwrap().current_coord().column, area.left - 1);
        }
        for &id in &rows[1] {
            assert_eq!(terminal.character(id).unwrap().current_coord().column, area.right + 1);
        }
    }

    #[test]
    fn later_rows_wait_their_turn() {
        let mut terminal = testing::terminal("ab\ncd");
        let mut effect = Slide::new(testing::settings());
        effect.prepare(&mut terminal).unwrap();
        effect.step(&mut terminal).unwrap();
        let visible: Vec<char> = terminal
            .characters()
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| c.input_symbol())
            .collect();
        assert_eq!(visible, vec!['a', 'b']);
    }

    #[test]
    fn settles_into_the_final_gradient() {
        let settings = testing::settings();
        let mut terminal = testing::terminal("ab\ncd\nef");
        let mut effect = Slide::new(settings.clone());
        testing::run(&mut effect, &mut terminal, 500);
        testing::assert_settled(&terminal, &settings);
    }
}
