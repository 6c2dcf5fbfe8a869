//! Effect implementations.

mod expand;
mod rain;
mod slide;

pub use expand::Expand;
pub use rain::Rain;
pub use slide::Slide;

use glyphfall_engine::Terminal;

use crate::EffectStatus;

/// Complete once nothing is waiting to be released and every released
/// character has settled.
fn status(terminal: &Terminal, releases_pending: bool) -> EffectStatus {
    if releases_pending || !terminal.is_complete() {
        EffectStatus::Running
    } else {
        EffectStatus::Complete
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use glyphfall_core::{Color, Gradient};
    use glyphfall_engine::{Terminal, TerminalConfig};

    use crate::{Effect, EffectSettings, EffectStatus};

    pub fn settings() -> EffectSettings {
        let gradient = Gradient::new(
            &[Color::Rgb(0x8a, 0x00, 0x8a), Color::Rgb(0xff, 0xff, 0xff)],
            &[6],
            false,
        )
        .unwrap();
        EffectSettings::new(gradient)
    }

    pub fn terminal(text: &str) -> Terminal {
        Terminal::new(
            text,
            &TerminalConfig {
                viewport: Some((12, 5)),
                seed: Some(3),
                ..TerminalConfig::default()
            },
        )
        .unwrap()
    }

    /// Prepare and step `effect` until it completes, returning the frame count.
    pub fn run(effect: &mut dyn Effect, terminal: &mut Terminal, limit: usize) -> usize {
        effect.prepare(terminal).unwrap();
        for frame in 1..=limit {
            if effect.step(terminal).unwrap() == EffectStatus::Complete {
                return frame;
            }
        }
        panic!("effect still running after {limit} frames");
    }

    /// Every character is visible, home, and drawn in its final color.
    pub fn assert_settled(terminal: &Terminal, settings: &EffectSettings) {
        let colors = settings.final_colors(terminal);
        for character in terminal.characters() {
            assert!(character.is_visible(), "{} hidden", character.id());
            assert_eq!(character.current_coord(), character.input_coord());
            assert_eq!(character.symbol(), character.input_symbol());
            assert_eq!(
                character.visual().fg,
                Some(settings.final_color(&colors, character.input_coord())),
                "{} color",
                character.id()
            );
        }
    }
}
