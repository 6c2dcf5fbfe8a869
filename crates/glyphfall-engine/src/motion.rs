//! Character movement along paths.

use std::collections::HashMap;

use glyphfall_core::Coord;
use tracing::trace;

use crate::error::{EngineError, EngineResult};
use crate::event::{Event, FiredEvents};
use crate::path::Path;

/// Owns a character's paths and its current position.
///
/// Paths are created and tuned here during effect setup. Activation and
/// deactivation go through [`EffectCharacter`](crate::EffectCharacter) so the
/// events they fire reach the character's event handler.
#[derive(Debug, Clone)]
pub struct Motion {
    paths: HashMap<String, Path>,
    active_path: Option<String>,
    current_coord: Coord,
    previous_coord: Coord,
}

impl Motion {
    /// Create a motion resting at `coord`.
    pub fn new(coord: Coord) -> Self {
        Self {
            paths: HashMap::new(),
            active_path: None,
            current_coord: coord,
            previous_coord: coord,
        }
    }

    /// Create a path travelling `speed` cells per tick.
    ///
    /// Without an explicit id the path is named after the smallest unused
    /// integer starting at the current path count.
    pub fn new_path(&mut self, speed: f64, path_id: Option<&str>) -> EngineResult<&mut Path> {
        let id = match path_id {
            Some(id) if self.paths.contains_key(id) => {
                return Err(EngineError::DuplicatePathId {
                    path_id: id.to_string(),
                });
            }
            Some(id) => id.to_string(),
            None => {
                let mut next = self.paths.len();
                while self.paths.contains_key(&next.to_string()) {
                    next += 1;
                }
                next.to_string()
            }
        };

        let path = Path::new(id.clone(), speed)?;
        Ok(self.paths.entry(id).or_insert(path))
    }

    /// Look up a path by id.
    pub fn query_path(&self, path_id: &str) -> EngineResult<&Path> {
        self.paths.get(path_id).ok_or_else(|| EngineError::PathNotFound {
            path_id: path_id.to_string(),
        })
    }

    /// Look up a path by id for further setup.
    pub fn query_path_mut(&mut self, path_id: &str) -> EngineResult<&mut Path> {
        self.paths
            .get_mut(path_id)
            .ok_or_else(|| EngineError::PathNotFound {
                path_id: path_id.to_string(),
            })
    }

    /// All paths, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.values()
    }

    /// The path currently being travelled, if any.
    pub fn active_path(&self) -> Option<&Path> {
        self.active_path
            .as_deref()
            .and_then(|path_id| self.paths.get(path_id))
    }

    pub fn current_coord(&self) -> Coord {
        self.current_coord
    }

    /// Position before the most recent tick.
    pub fn previous_coord(&self) -> Coord {
        self.previous_coord
    }

    /// Place the character without travelling.
    pub fn set_coordinate(&mut self, coord: Coord) {
        self.current_coord = coord;
    }

    /// Whether no path is active.
    pub fn movement_is_complete(&self) -> bool {
        self.active_path.is_none()
    }

    /// Activate a path from the current position. Returns the path's layer.
    pub(crate) fn activate_path(
        &mut self,
        path_id: &str,
        fired: &mut FiredEvents,
    ) -> EngineResult<Option<i32>> {
        let origin = self.current_coord;
        let path = self.query_path_mut(path_id)?;
        path.activate(origin)?;
        let layer = path.layer();
        trace!(path_id, steps = path.max_steps(), "path activated");

        self.active_path = Some(path_id.to_string());
        fired.push((Event::PathActivated, path_id.to_string()));
        Ok(layer)
    }

    /// Stop travelling `path_id` if it is active, discarding its progress.
    pub(crate) fn deactivate_path(&mut self, path_id: &str) -> EngineResult<()> {
        let path = self.query_path_mut(path_id)?;
        path.reset();
        if self.active_path.as_deref() == Some(path_id) {
            self.active_path = None;
        }
        Ok(())
    }

    /// Advance the active path by one tick.
    pub(crate) fn tick(&mut self, fired: &mut FiredEvents) {
        let Some(path) = self
            .active_path
            .as_deref()
            .and_then(|path_id| self.paths.get_mut(path_id))
        else {
            return;
        };

        self.previous_coord = self.current_coord;
        if let Some(coord) = path.step(fired) {
            self.current_coord = coord;
        }
        if !path.is_travel_complete() {
            return;
        }

        if path.hold_time_remaining() > 0 {
            if path.hold_time_remaining() == path.hold_time() {
                fired.push((Event::PathHolding, path.id().to_string()));
            }
            path.tick_hold();
            return;
        }

        if path.is_looping() {
            path.restart(self.current_coord);
            fired.push((Event::PathActivated, path.id().to_string()));
            return;
        }

        path.reset();
        fired.push((Event::PathComplete, path.id().to_string()));
        trace!(path_id = path.id(), "path complete");
        self.active_path = None;
    }
}
