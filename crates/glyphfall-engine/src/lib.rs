//! The glyphfall animation kernel.
//!
//! Every glyph of the input text becomes an [`EffectCharacter`] owning a
//! [`Motion`] (where it is), an [`Animation`] (what it looks like) and an
//! [`EventHandler`] (how the two are chained together). Effects build paths,
//! scenes and event wiring during setup and then drive [`Terminal::tick`]
//! once per frame until every character is quiescent.
//!
//! Within a character, motion always advances before animation so scenes
//! synchronized to path progress never lag the position by a frame.

mod animation;
mod character;
mod error;
mod event;
mod motion;
mod path;
mod render;
mod scene;
mod terminal;

pub use animation::Animation;
pub use character::{CharacterId, EffectCharacter};
pub use error::{EngineError, EngineResult};
pub use event::{Action, Callback, Event, EventHandler};
pub use motion::Motion;
pub use path::{MAX_SEGMENT_STEPS, Path, Waypoint};
pub use scene::{CharacterVisual, Frame, Scene, SyncMetric};
pub use terminal::{CharacterSort, Grouping, OutputArea, Terminal, TerminalConfig};

pub use glyphfall_core as core;
