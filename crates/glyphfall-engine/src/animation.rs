//! Character appearance driven by scenes.

use std::collections::HashMap;

use glyphfall_core::Color;
use tracing::trace;

use crate::error::{EngineError, EngineResult};
use crate::event::{Event, FiredEvents};
use crate::path::Path;
use crate::scene::{CharacterVisual, Scene, SyncMetric};

/// Owns a character's scenes and its current visual.
///
/// Scenes are created and filled here during effect setup. Activation and
/// deactivation go through [`EffectCharacter`](crate::EffectCharacter) so the
/// events they fire reach the character's event handler.
#[derive(Debug, Clone)]
pub struct Animation {
    scenes: HashMap<String, Scene>,
    active_scene: Option<String>,
    current_visual: CharacterVisual,
    input_symbol: char,
}

impl Animation {
    /// Create an animation showing `symbol` uncolored.
    pub fn new(symbol: char) -> Self {
        Self {
            scenes: HashMap::new(),
            active_scene: None,
            current_visual: CharacterVisual::new(symbol),
            input_symbol: symbol,
        }
    }

    /// Create an empty scene.
    ///
    /// Without an explicit id the scene is named after the smallest unused
    /// integer starting at the current scene count.
    pub fn new_scene(&mut self, scene_id: Option<&str>) -> EngineResult<&mut Scene> {
        let id = match scene_id {
            Some(id) if self.scenes.contains_key(id) => {
                return Err(EngineError::DuplicateSceneId {
                    scene_id: id.to_string(),
                });
            }
            Some(id) => id.to_string(),
            None => {
                let mut next = self.scenes.len();
                while self.scenes.contains_key(&next.to_string()) {
                    next += 1;
                }
                next.to_string()
            }
        };

        Ok(self
            .scenes
            .entry(id.clone())
            .or_insert_with(|| Scene::new(id)))
    }

    /// Look up a scene by id.
    pub fn query_scene(&self, scene_id: &str) -> EngineResult<&Scene> {
        self.scenes
            .get(scene_id)
            .ok_or_else(|| EngineError::SceneNotFound {
                scene_id: scene_id.to_string(),
            })
    }

    /// Look up a scene by id for further setup.
    pub fn query_scene_mut(&mut self, scene_id: &str) -> EngineResult<&mut Scene> {
        self.scenes
            .get_mut(scene_id)
            .ok_or_else(|| EngineError::SceneNotFound {
                scene_id: scene_id.to_string(),
            })
    }

    /// All scenes, in no particular order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// The scene currently playing, if any.
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active_scene
            .as_deref()
            .and_then(|scene_id| self.scenes.get(scene_id))
    }

    /// Whether the active scene has nothing left to play.
    ///
    /// A looping scene always reports complete so that characters holding
    /// one can be handed off, although it never fires `SceneComplete`.
    pub fn active_scene_is_complete(&self) -> bool {
        match self.active_scene() {
            None => true,
            Some(scene) => scene.is_looping() || scene.is_exhausted(),
        }
    }

    /// The visual to draw this tick.
    pub fn current_visual(&self) -> &CharacterVisual {
        &self.current_visual
    }

    /// Stamp a visual directly; the next scene activation overwrites it.
    pub fn set_appearance(&mut self, symbol: char, fg: Option<Color>) {
        self.current_visual = CharacterVisual {
            symbol,
            fg,
            ..CharacterVisual::new(symbol)
        };
    }

    /// Show the input symbol with no colors or attributes.
    pub fn reset_appearance(&mut self) {
        self.current_visual = CharacterVisual::new(self.input_symbol);
    }

    pub(crate) fn activate_scene(
        &mut self,
        scene_id: &str,
        fired: &mut FiredEvents,
    ) -> EngineResult<()> {
        let scene = self.query_scene_mut(scene_id)?;
        let visual = scene.activate()?;
        trace!(scene_id, frames = scene.frames().len(), "scene activated");

        self.current_visual = visual;
        self.active_scene = Some(scene_id.to_string());
        fired.push((Event::SceneActivated, scene_id.to_string()));
        Ok(())
    }

    /// Stop playing `scene_id` if it is active, discarding its progress.
    pub(crate) fn deactivate_scene(&mut self, scene_id: &str) -> EngineResult<()> {
        let scene = self.query_scene_mut(scene_id)?;
        scene.reset();
        if self.active_scene.as_deref() == Some(scene_id) {
            self.active_scene = None;
        }
        Ok(())
    }

    /// Advance the active scene by one tick.
    ///
    /// `active_path` is the owning character's path after this tick's motion
    /// update; synchronized scenes read their progress from it.
    pub(crate) fn tick(&mut self, active_path: Option<&Path>, fired: &mut FiredEvents) {
        let Some(scene) = self
            .active_scene
            .as_deref()
            .and_then(|scene_id| self.scenes.get_mut(scene_id))
        else {
            return;
        };

        let visual = match (scene.sync(), active_path) {
            (Some(metric), Some(path)) => scene.synced_visual(sync_progress(metric, path)),
            // Nothing left to follow: settle on the final frame.
            (Some(_), None) => scene.finish(),
            (None, _) => match scene.ease() {
                Some(ease) => scene.eased_visual(ease),
                None => scene.next_visual(),
            },
        };
        if let Some(visual) = visual {
            self.current_visual = visual;
        }

        if scene.is_exhausted() && !scene.is_looping() {
            scene.reset();
            fired.push((Event::SceneComplete, scene.id().to_string()));
            trace!(scene_id = scene.id(), "scene complete");
            self.active_scene = None;
        }
    }
}

/// Progress through `path` in `0.0..=1.0` as measured by `metric`.
fn sync_progress(metric: SyncMetric, path: &Path) -> f64 {
    match metric {
        SyncMetric::Step => {
            path.current_step().max(1) as f64 / path.max_steps().max(1) as f64
        }
        SyncMetric::Distance => {
            let total = path.total_distance().max(1.0);
            let remaining = (path.total_distance() - path.distance_travelled()).max(1.0);
            (total - remaining).max(1.0) / total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation_with(frames: &[(char, usize)], looping: bool) -> Animation {
        let mut animation = Animation::new('x');
        let scene = animation.new_scene(Some("s")).unwrap();
        scene.set_looping(looping);
        for &(symbol, duration) in frames {
            scene.add_frame(CharacterVisual::new(symbol), duration).unwrap();
        }
        animation
    }

    #[test]
    fn scene_ids_are_generated_and_unique() {
        let mut animation = Animation::new('x');
        assert_eq!(animation.new_scene(None).unwrap().id(), "0");
        assert_eq!(animation.new_scene(None).unwrap().id(), "1");
        assert!(matches!(
            animation.new_scene(Some("1")),
            Err(EngineError::DuplicateSceneId { .. })
        ));
        assert!(matches!(
            animation.query_scene("ghost"),
            Err(EngineError::SceneNotFound { .. })
        ));
    }

    #[test]
    fn activation_applies_first_frame_immediately() {
        let mut animation = animation_with(&[('a', 2), ('b', 3)], false);
        let mut fired = Vec::new();
        animation.activate_scene("s", &mut fired).unwrap();
        assert_eq!(animation.current_visual().symbol, 'a');
        assert_eq!(fired, vec![(Event::SceneActivated, "s".to_string())]);
    }

    #[test]
    fn completion_fires_once_and_resets_scene() {
        let mut animation = animation_with(&[('a', 2), ('b', 3)], false);
        let mut fired = Vec::new();
        animation.activate_scene("s", &mut fired).unwrap();
        fired.clear();

        let mut shown = String::new();
        for _ in 0..5 {
            animation.tick(None, &mut fired);
            shown.push(animation.current_visual().symbol);
        }
        assert_eq!(shown, "aabbb");
        assert_eq!(fired, vec![(Event::SceneComplete, "s".to_string())]);
        assert!(animation.active_scene().is_none());
        assert_eq!(animation.query_scene("s").unwrap().pending_frames().len(), 2);

        animation.tick(None, &mut fired);
        assert_eq!(fired.len(), 1);
        assert_eq!(animation.current_visual().symbol, 'b');
    }

    #[test]
    fn looping_scene_never_completes() {
        let mut animation = animation_with(&[('a', 1), ('b', 1)], true);
        let mut fired = Vec::new();
        animation.activate_scene("s", &mut fired).unwrap();
        fired.clear();
        for _ in 0..7 {
            animation.tick(None, &mut fired);
        }
        assert!(fired.is_empty());
        assert!(animation.active_scene_is_complete());
        assert_eq!(animation.active_scene().map(Scene::id), Some("s"));
    }

    #[test]
    fn synced_scene_without_path_jumps_to_final_frame() {
        let mut animation = animation_with(&[('a', 1), ('b', 1), ('c', 1)], false);
        animation
            .query_scene_mut("s")
            .unwrap()
            .set_sync(SyncMetric::Step);
        let mut fired = Vec::new();
        animation.activate_scene("s", &mut fired).unwrap();
        animation.tick(None, &mut fired);
        assert_eq!(animation.current_visual().symbol, 'c');
        assert_eq!(fired.last(), Some(&(Event::SceneComplete, "s".to_string())));
    }

    #[test]
    fn appearance_can_be_stamped_and_reset() {
        let mut animation = Animation::new('x');
        animation.set_appearance('#', Some(Color::Rgb(1, 2, 3)));
        assert_eq!(animation.current_visual().symbol, '#');
        assert_eq!(animation.current_visual().fg, Some(Color::Rgb(1, 2, 3)));
        animation.reset_appearance();
        assert_eq!(animation.current_visual(), &CharacterVisual::new('x'));
    }

    #[test]
    fn activating_empty_scene_fails() {
        let mut animation = Animation::new('x');
        animation.new_scene(Some("empty")).unwrap();
        let mut fired = Vec::new();
        assert!(matches!(
            animation.activate_scene("empty", &mut fired),
            Err(EngineError::EmptyScene { .. })
        ));
        assert!(fired.is_empty());
    }
}
