//! Drawing a [`Terminal`] frame into a ratatui buffer.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::character::EffectCharacter;
use crate::terminal::Terminal;

/// Draws every visible character at its current coordinate, lowest layer
/// first. Output-area cell `(left, top)` maps onto the top-left of `area`;
/// anything falling outside `area` is clipped.
impl Widget for &Terminal {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut visible: Vec<&EffectCharacter> =
            self.characters().iter().filter(|c| c.is_visible()).collect();
        // Stable, so equal layers keep reading order.
        visible.sort_by_key(|c| c.layer);

        let origin = self.output_area();
        let cache = self.xterm_cache();
        let mode = self.color_mode();
        for character in visible {
            let coord = character.current_coord();
            let (Ok(dx), Ok(dy)) = (
                u16::try_from(coord.column - origin.left),
                u16::try_from(coord.row - origin.top),
            ) else {
                continue;
            };
            if dx >= area.width || dy >= area.height {
                continue;
            }
            let Some(cell) = buf.cell_mut((area.x + dx, area.y + dy)) else {
                continue;
            };

            let visual = character.visual();
            let mut style = Style::new().add_modifier(visual.modifiers);
            if let Some(fg) = visual.fg.and_then(|c| mode.resolve(c, cache)) {
                style = style.fg(fg);
            }
            if let Some(bg) = visual.bg.and_then(|c| mode.resolve(c, cache)) {
                style = style.bg(bg);
            }
            cell.set_char(visual.symbol).set_style(style);
        }
    }
}
