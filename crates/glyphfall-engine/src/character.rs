//! The unit of animation: one glyph of the input text.

use std::fmt;

use glyphfall_core::Coord;
use tracing::{debug, trace};

use crate::animation::Animation;
use crate::error::EngineResult;
use crate::event::{Action, Event, EventHandler, FiredEvents};
use crate::motion::Motion;
use crate::scene::CharacterVisual;

/// Stable index of a character within its [`Terminal`](crate::Terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterId(pub usize);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One non-space glyph of the input and everything that animates it.
#[derive(Debug, Clone)]
pub struct EffectCharacter {
    id: CharacterId,
    input_symbol: char,
    input_coord: Coord,
    is_visible: bool,
    /// Draw order; higher layers are drawn over lower ones.
    pub layer: i32,
    pub motion: Motion,
    pub animation: Animation,
    pub event_handler: EventHandler,
}

impl EffectCharacter {
    /// Create a hidden character resting on its input coordinate.
    pub fn new(id: CharacterId, symbol: char, input_coord: Coord) -> Self {
        Self {
            id,
            input_symbol: symbol,
            input_coord,
            is_visible: false,
            layer: 0,
            motion: Motion::new(input_coord),
            animation: Animation::new(symbol),
            event_handler: EventHandler::new(),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn input_symbol(&self) -> char {
        self.input_symbol
    }

    /// Where the character sits in the final text.
    pub fn input_coord(&self) -> Coord {
        self.input_coord
    }

    /// Where the character is drawn now.
    pub fn current_coord(&self) -> Coord {
        self.motion.current_coord()
    }

    /// The symbol drawn now.
    pub fn symbol(&self) -> char {
        self.animation.current_visual().symbol
    }

    pub fn visual(&self) -> &CharacterVisual {
        self.animation.current_visual()
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    /// Whether a path is being travelled or a scene still has frames to play.
    pub fn is_active(&self) -> bool {
        !self.motion.movement_is_complete() || !self.animation.active_scene_is_complete()
    }

    /// Start travelling a path from the current position.
    pub fn activate_path(&mut self, path_id: &str) -> EngineResult<()> {
        let mut fired = FiredEvents::new();
        if let Some(layer) = self.motion.activate_path(path_id, &mut fired)? {
            self.layer = layer;
        }
        self.dispatch(fired)
    }

    /// Stop travelling a path, leaving the character where it is.
    pub fn deactivate_path(&mut self, path_id: &str) -> EngineResult<()> {
        self.motion.deactivate_path(path_id)
    }

    /// Start playing a scene, applying its first frame at once.
    pub fn activate_scene(&mut self, scene_id: &str) -> EngineResult<()> {
        let mut fired = FiredEvents::new();
        self.animation.activate_scene(scene_id, &mut fired)?;
        self.dispatch(fired)
    }

    /// Stop playing a scene, keeping the current visual.
    pub fn deactivate_scene(&mut self, scene_id: &str) -> EngineResult<()> {
        self.animation.deactivate_scene(scene_id)
    }

    /// Activate each path when the previous one completes.
    ///
    /// With `looping` the first path follows the last, indefinitely. Every id
    /// must name an existing path.
    pub fn chain_paths(&mut self, path_ids: &[&str], looping: bool) -> EngineResult<()> {
        for path_id in path_ids {
            self.motion.query_path(path_id)?;
        }
        for pair in path_ids.windows(2) {
            self.event_handler.register_event(
                Event::PathComplete,
                pair[0],
                Action::ActivatePath(pair[1].to_string()),
            );
        }
        if let (true, Some(first), Some(last)) = (looping, path_ids.first(), path_ids.last()) {
            self.event_handler.register_event(
                Event::PathComplete,
                *last,
                Action::ActivatePath(first.to_string()),
            );
        }
        debug!(character = %self.id, paths = path_ids.len(), looping, "paths chained");
        Ok(())
    }

    /// Apply every action registered for `(event, subject_id)`, in order.
    ///
    /// Actions may fire further events, which are handled before this call
    /// returns. Unregistered pairs do nothing.
    pub fn handle_event(&mut self, event: Event, subject_id: &str) -> EngineResult<()> {
        let actions = self.event_handler.reactions(event, subject_id).to_vec();
        for action in actions {
            trace!(character = %self.id, ?event, subject_id, ?action, "handling event");
            self.apply_action(action)?;
        }
        Ok(())
    }

    /// Advance one tick: motion first, then animation.
    pub fn tick(&mut self) -> EngineResult<()> {
        let mut fired = FiredEvents::new();
        self.motion.tick(&mut fired);
        self.dispatch(fired)?;

        let mut fired = FiredEvents::new();
        self.animation.tick(self.motion.active_path(), &mut fired);
        self.dispatch(fired)
    }

    fn apply_action(&mut self, action: Action) -> EngineResult<()> {
        match action {
            Action::ActivatePath(path_id) => self.activate_path(&path_id)?,
            Action::DeactivatePath(path_id) => self.deactivate_path(&path_id)?,
            Action::ActivateScene(scene_id) => self.activate_scene(&scene_id)?,
            Action::DeactivateScene(scene_id) => self.deactivate_scene(&scene_id)?,
            Action::ResetAppearance => self.animation.reset_appearance(),
            Action::SetLayer(layer) => self.layer = layer,
            Action::SetCoordinate(coord) => self.motion.set_coordinate(coord),
            Action::Callback(callback) => callback.call(self),
        }
        Ok(())
    }

    fn dispatch(&mut self, fired: FiredEvents) -> EngineResult<()> {
        for (event, subject_id) in fired {
            self.handle_event(event, &subject_id)?;
        }
        Ok(())
    }
}

impl PartialEq for EffectCharacter {
    fn eq(&self, other: &Self) -> bool {
        self.input_coord == other.input_coord
    }
}

impl Eq for EffectCharacter {}
