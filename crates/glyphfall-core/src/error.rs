//! Error types for core value parsing and construction.

use thiserror::Error;

/// Errors raised while building core values from user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The string is not a hex color or an xterm-256 index.
    #[error("invalid color '{0}': expected #rrggbb, rrggbb or an xterm index 0-255")]
    InvalidColor(String),

    /// The string does not name an easing function.
    #[error("unknown easing function '{0}'")]
    InvalidEasing(String),

    /// The string does not name a gradient direction.
    #[error("unknown gradient direction '{0}'")]
    InvalidDirection(String),

    /// The string does not name a color mode.
    #[error("unknown color mode '{0}'")]
    InvalidColorMode(String),

    /// A gradient needs at least one stop.
    #[error("a gradient needs at least one color stop")]
    EmptyGradient,

    /// Every gradient step count must be positive.
    #[error("gradient step counts must be greater than zero")]
    ZeroGradientSteps,
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
