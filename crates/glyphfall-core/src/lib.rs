//! Core types for the glyphfall text animation engine.
//!
//! This crate holds the leaf building blocks shared by the engine and the
//! effects: terminal cell coordinates and geometry helpers, easing curves,
//! colors and gradients.

mod color;
mod coord;
mod easing;
mod error;
pub mod geometry;
mod gradient;

pub use color::{Color, ColorMode, XtermCache};
pub use coord::Coord;
pub use easing::Easing;
pub use error::{CoreError, CoreResult};
pub use gradient::{Gradient, GradientDirection};
