//! Intra-character event registry.
//!
//! Motion and animation report what happened as `(Event, subject id)` pairs;
//! the owning [`EffectCharacter`] looks the pair up here and applies every
//! registered [`Action`] in registration order.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use glyphfall_core::Coord;

use crate::character::EffectCharacter;

/// Something that happened to a character's path or scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Travel towards a waypoint started. Subject: waypoint id.
    SegmentEntered,
    /// A waypoint was reached. Subject: waypoint id.
    WaypointReached,
    /// A path became active. Subject: path id.
    PathActivated,
    /// A path finished travelling and holding. Subject: path id.
    PathComplete,
    /// A path started its hold countdown. Subject: path id.
    PathHolding,
    /// A scene became active. Subject: scene id.
    SceneActivated,
    /// A non-looping scene played its last frame. Subject: scene id.
    SceneComplete,
}

/// A reaction applied to the character when an event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ActivatePath(String),
    DeactivatePath(String),
    ActivateScene(String),
    DeactivateScene(String),
    /// Restore the input symbol with no colors.
    ResetAppearance,
    SetLayer(i32),
    SetCoordinate(Coord),
    Callback(Callback),
}

/// A shared closure run against the character when its event fires.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&mut EffectCharacter)>);

impl Callback {
    /// Wrap a closure.
    pub fn new(f: impl Fn(&mut EffectCharacter) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, character: &mut EffectCharacter) {
        (self.0)(character)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Events fired during one engine call, in firing order.
pub(crate) type FiredEvents = Vec<(Event, String)>;

/// Registry mapping `(event, subject id)` to the actions it triggers.
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    registry: HashMap<Event, HashMap<String, Vec<Action>>>,
}

impl EventHandler {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `action` to the reactions for `(event, subject_id)`.
    pub fn register_event(&mut self, event: Event, subject_id: impl Into<String>, action: Action) {
        self.registry
            .entry(event)
            .or_default()
            .entry(subject_id.into())
            .or_default()
            .push(action);
    }

    /// The actions registered for `(event, subject_id)`, possibly none.
    pub fn reactions(&self, event: Event, subject_id: &str) -> &[Action] {
        self.registry
            .get(&event)
            .and_then(|subjects| subjects.get(subject_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of registered actions.
    pub fn len(&self) -> usize {
        self.registry
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reactions_keep_registration_order() {
        let mut handler = EventHandler::new();
        handler.register_event(Event::PathComplete, "0", Action::ActivateScene("a".into()));
        handler.register_event(Event::PathComplete, "0", Action::SetLayer(2));
        handler.register_event(Event::PathComplete, "1", Action::ResetAppearance);

        assert_eq!(
            handler.reactions(Event::PathComplete, "0"),
            &[Action::ActivateScene("a".into()), Action::SetLayer(2)]
        );
        assert_eq!(handler.len(), 3);
    }

    #[test]
    fn unregistered_pairs_have_no_reactions() {
        let mut handler = EventHandler::new();
        assert!(handler.is_empty());
        handler.register_event(Event::SceneComplete, "fade", Action::ResetAppearance);
        assert!(handler.reactions(Event::SceneActivated, "fade").is_empty());
        assert!(handler.reactions(Event::SceneComplete, "other").is_empty());
    }

    #[test]
    fn callbacks_compare_by_identity() {
        let callback = Callback::new(|_| {});
        assert_eq!(callback, callback.clone());
        assert_ne!(callback, Callback::new(|_| {}));
    }
}
