//! Timed visual sequences.

use glyphfall_core::{Color, Easing, Gradient};
use ratatui::style::Modifier;

use crate::error::{EngineError, EngineResult};

/// What a character looks like on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterVisual {
    pub symbol: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    /// Text attributes such as bold or dim.
    pub modifiers: Modifier,
}

impl CharacterVisual {
    /// A plain symbol with no colors or attributes.
    pub fn new(symbol: char) -> Self {
        Self {
            symbol,
            fg: None,
            bg: None,
            modifiers: Modifier::empty(),
        }
    }

    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifier) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A visual shown for a number of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    visual: CharacterVisual,
    duration: usize,
    ticks_elapsed: usize,
}

impl Frame {
    pub fn visual(&self) -> &CharacterVisual {
        &self.visual
    }

    /// Ticks this frame is shown for.
    pub fn duration(&self) -> usize {
        self.duration
    }

    /// Ticks already shown during the current play-through.
    pub fn ticks_elapsed(&self) -> usize {
        self.ticks_elapsed
    }
}

/// Drives frame selection from the active path instead of elapsed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMetric {
    /// Fraction of path steps taken.
    Step,
    /// Fraction of path distance covered.
    Distance,
}

/// An ordered list of frames owned by one [`Animation`](crate::Animation).
///
/// Frames before the cursor have been played; the frame under the cursor is
/// current. A looping scene moves the cursor back to the start once every
/// frame has played.
#[derive(Debug, Clone)]
pub struct Scene {
    id: String,
    frames: Vec<Frame>,
    cursor: usize,
    looping: bool,
    sync: Option<SyncMetric>,
    ease: Option<Easing>,
    easing_total_steps: usize,
    easing_current_step: usize,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            frames: Vec::new(),
            cursor: 0,
            looping: false,
            sync: None,
            ease: None,
            easing_total_steps: 0,
            easing_current_step: 0,
        }
    }

    pub fn set_looping(&mut self, looping: bool) -> &mut Self {
        self.looping = looping;
        self
    }

    /// Pick frames from the character's path progress.
    pub fn set_sync(&mut self, sync: SyncMetric) -> &mut Self {
        self.sync = Some(sync);
        self
    }

    /// Pick frames along an eased timeline spanning every frame's duration.
    pub fn set_ease(&mut self, ease: Easing) -> &mut Self {
        self.ease = Some(ease);
        self
    }

    /// Append a frame shown for `duration` ticks.
    pub fn add_frame(&mut self, visual: CharacterVisual, duration: usize) -> EngineResult<&mut Self> {
        if duration == 0 {
            return Err(EngineError::InvalidFrameDuration {
                scene_id: self.id.clone(),
            });
        }
        self.frames.push(Frame {
            visual,
            duration,
            ticks_elapsed: 0,
        });
        self.easing_total_steps += duration;
        Ok(self)
    }

    /// Append one frame per step of the longer of `symbols` and the gradient
    /// spectrum, stretching the shorter sequence across the longer.
    pub fn apply_gradient_to_symbols(
        &mut self,
        gradient: &Gradient,
        symbols: &[char],
        duration: usize,
    ) -> EngineResult<&mut Self> {
        if symbols.is_empty() {
            return Err(EngineError::EmptySymbols {
                scene_id: self.id.clone(),
            });
        }

        let spectrum = gradient.spectrum();
        let count = symbols.len().max(spectrum.len());
        for i in 0..count {
            let symbol = symbols[i * symbols.len() / count];
            let color = spectrum[i * spectrum.len() / count];
            self.add_frame(CharacterVisual::new(symbol).with_fg(color), duration)?;
        }
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn sync(&self) -> Option<SyncMetric> {
        self.sync
    }

    pub fn ease(&self) -> Option<Easing> {
        self.ease
    }

    /// Every frame in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frames not yet played, starting with the current one.
    pub fn pending_frames(&self) -> &[Frame] {
        &self.frames[self.cursor..]
    }

    /// Frames already played in this pass.
    pub fn played_frames(&self) -> &[Frame] {
        &self.frames[..self.cursor]
    }

    /// Whether every frame has been played.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.frames.len()
    }

    /// Reset and return the first frame's visual.
    pub(crate) fn activate(&mut self) -> EngineResult<CharacterVisual> {
        if self.frames.is_empty() {
            return Err(EngineError::EmptyScene {
                scene_id: self.id.clone(),
            });
        }
        self.reset();
        Ok(self.frames[0].visual.clone())
    }

    /// Return every frame to the pending pool.
    pub(crate) fn reset(&mut self) {
        for frame in &mut self.frames {
            frame.ticks_elapsed = 0;
        }
        self.cursor = 0;
        self.easing_current_step = 0;
    }

    /// Show the current frame for one tick, consuming it when its duration
    /// runs out.
    pub(crate) fn next_visual(&mut self) -> Option<CharacterVisual> {
        let frame = self.frames.get_mut(self.cursor)?;
        let visual = frame.visual.clone();
        frame.ticks_elapsed += 1;
        if frame.ticks_elapsed == frame.duration {
            frame.ticks_elapsed = 0;
            self.cursor += 1;
            if self.looping && self.cursor == self.frames.len() {
                self.cursor = 0;
            }
        }
        Some(visual)
    }

    /// Select a frame from the eased position on the scene timeline.
    pub(crate) fn eased_visual(&mut self, ease: Easing) -> Option<CharacterVisual> {
        if self.is_exhausted() || self.easing_total_steps == 0 {
            return None;
        }

        let total = self.easing_total_steps;
        let factor = ease.apply(self.easing_current_step as f64 / total as f64);
        let step = ((factor * (total - 1) as f64).round().max(0.0) as usize).min(total - 1);
        let visual = self.frame_at_step(step).visual.clone();

        self.easing_current_step += 1;
        if self.easing_current_step == total {
            self.easing_current_step = 0;
            if !self.looping {
                self.cursor = self.frames.len();
            }
        }
        Some(visual)
    }

    /// The frame at `progress` (0-1) through the frame list.
    pub(crate) fn synced_visual(&self, progress: f64) -> Option<CharacterVisual> {
        let last = self.frames.len().checked_sub(1)?;
        let index = ((last as f64 * progress).round().max(0.0) as usize).min(last);
        Some(self.frames[index].visual.clone())
    }

    /// Jump to the last frame; a non-looping scene is then exhausted.
    pub(crate) fn finish(&mut self) -> Option<CharacterVisual> {
        let visual = self.frames.last()?.visual.clone();
        if !self.looping {
            self.cursor = self.frames.len();
        }
        Some(visual)
    }

    fn frame_at_step(&self, step: usize) -> &Frame {
        let mut remaining = step;
        for frame in &self.frames {
            if remaining < frame.duration {
                return frame;
            }
            remaining -= frame.duration;
        }
        &self.frames[self.frames.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_of(frames: &[(char, usize)]) -> Scene {
        let mut scene = Scene::new("s");
        for &(symbol, duration) in frames {
            scene.add_frame(CharacterVisual::new(symbol), duration).unwrap();
        }
        scene
    }

    fn symbols_of(visuals: impl IntoIterator<Item = Option<CharacterVisual>>) -> String {
        visuals.into_iter().flatten().map(|visual| visual.symbol).collect()
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut scene = Scene::new("s");
        assert_eq!(
            scene.add_frame(CharacterVisual::new('x'), 0).unwrap_err(),
            EngineError::InvalidFrameDuration {
                scene_id: "s".into()
            }
        );
    }

    #[test]
    fn empty_scene_cannot_activate() {
        assert!(matches!(
            Scene::new("s").activate(),
            Err(EngineError::EmptyScene { .. })
        ));
    }

    #[test]
    fn frames_play_for_their_duration() {
        let mut scene = scene_of(&[('a', 2), ('b', 3)]);
        assert_eq!(scene.activate().unwrap().symbol, 'a');
        let shown = symbols_of((0..5).map(|_| scene.next_visual()));
        assert_eq!(shown, "aabbb");
        assert!(scene.is_exhausted());
        assert_eq!(scene.played_frames().len(), 2);
        assert!(scene.next_visual().is_none());
    }

    #[test]
    fn looping_scene_recycles_frames() {
        let mut scene = scene_of(&[('a', 1), ('b', 1)]);
        scene.set_looping(true);
        let shown = symbols_of((0..5).map(|_| scene.next_visual()));
        assert_eq!(shown, "ababa");
        assert!(!scene.is_exhausted());
    }

    #[test]
    fn reset_returns_played_frames() {
        let mut scene = scene_of(&[('a', 2), ('b', 1)]);
        scene.next_visual();
        scene.next_visual();
        scene.next_visual();
        scene.reset();
        assert_eq!(scene.pending_frames().len(), 2);
        assert!(scene.frames().iter().all(|frame| frame.ticks_elapsed() == 0));
    }

    #[test]
    fn eased_timeline_spans_every_tick() {
        let mut scene = scene_of(&[('a', 2), ('b', 2)]);
        let shown = symbols_of((0..4).map(|_| scene.eased_visual(Easing::Linear)));
        assert_eq!(shown, "aabb");
        assert!(scene.is_exhausted());

        let mut scene = scene_of(&[('a', 5), ('b', 5)]);
        let shown = symbols_of((0..10).map(|_| scene.eased_visual(Easing::InExpo)));
        assert!(shown.matches('a').count() > 5);
    }

    #[test]
    fn synced_visual_maps_progress() {
        let scene = scene_of(&[('a', 1), ('b', 1), ('c', 1), ('d', 1), ('e', 1)]);
        assert_eq!(scene.synced_visual(0.0).unwrap().symbol, 'a');
        assert_eq!(scene.synced_visual(0.5).unwrap().symbol, 'c');
        assert_eq!(scene.synced_visual(1.0).unwrap().symbol, 'e');
        assert_eq!(scene.synced_visual(7.0).unwrap().symbol, 'e');
    }

    #[test]
    fn gradient_frames_stretch_shorter_sequence() {
        let gradient = Gradient::new(
            &[Color::Rgb(0, 0, 0), Color::Rgb(255, 255, 255)],
            &[3],
            false,
        )
        .unwrap();
        let mut scene = Scene::new("g");
        scene.apply_gradient_to_symbols(&gradient, &['x', 'y'], 2).unwrap();

        let frames = scene.frames();
        assert_eq!(frames.len(), 4);
        let symbols: String = frames.iter().map(|frame| frame.visual().symbol).collect();
        assert_eq!(symbols, "xxyy");
        assert_eq!(frames[0].visual().fg, Some(Color::Rgb(0, 0, 0)));
        assert_eq!(frames[3].visual().fg, Some(Color::Rgb(255, 255, 255)));
        assert!(frames.iter().all(|frame| frame.duration() == 2));

        assert!(matches!(
            scene.apply_gradient_to_symbols(&gradient, &[], 1),
            Err(EngineError::EmptySymbols { .. })
        ));
    }
}
