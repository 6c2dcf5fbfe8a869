//! Error types for effect setup and choreography.
//!
//! Every variant signals a mistake in an effect's setup code rather than a
//! runtime condition; callers are expected to propagate them and abort.

use glyphfall_core::{Coord, CoreError};
use thiserror::Error;

/// Errors raised by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No path with this id is owned by the character.
    #[error("path '{path_id}' not found")]
    PathNotFound { path_id: String },

    /// No scene with this id is owned by the character.
    #[error("scene '{scene_id}' not found")]
    SceneNotFound { scene_id: String },

    /// A path was activated before any waypoint was added.
    #[error("path '{path_id}' has no waypoints")]
    EmptyPath { path_id: String },

    /// A scene was activated before any frame was added.
    #[error("scene '{scene_id}' has no frames")]
    EmptyScene { scene_id: String },

    /// Frames must be shown for at least one tick.
    #[error("frame duration in scene '{scene_id}' must be at least 1 tick")]
    InvalidFrameDuration { scene_id: String },

    /// Path speed must be a positive, finite number of cells per tick.
    #[error("path '{path_id}' has invalid speed {speed}")]
    InvalidSpeed { path_id: String, speed: f64 },

    /// A path id is already taken within the character.
    #[error("duplicate path id '{path_id}'")]
    DuplicatePathId { path_id: String },

    /// A scene id is already taken within the character.
    #[error("duplicate scene id '{scene_id}'")]
    DuplicateSceneId { scene_id: String },

    /// A waypoint id is already taken within the path.
    #[error("duplicate waypoint id '{waypoint_id}' in path '{path_id}'")]
    DuplicateWaypointId {
        path_id: String,
        waypoint_id: String,
    },

    /// Two characters were placed on the same input coordinate.
    #[error("two characters share the input coordinate {coord}")]
    DuplicateInputCoord { coord: Coord },

    /// The character id does not belong to this terminal.
    #[error("character {id} not found")]
    CharacterNotFound { id: usize },

    /// A gradient scene needs at least one symbol.
    #[error("scene '{scene_id}' needs at least one symbol to apply a gradient")]
    EmptySymbols { scene_id: String },

    /// A value failed core validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
