//! Configuration errors.

use std::path::PathBuf;

use glyphfall_core::CoreError;
use glyphfall_effects::UnknownEffect;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value could not be converted into its engine type.
    #[error("invalid {field}: {source}")]
    Invalid {
        field: &'static str,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    UnknownEffect(#[from] UnknownEffect),

    #[error("fps must be between 1 and {max}, got {0}", max = crate::MAX_FPS)]
    InvalidFps(u32),

    #[error("speed must be a positive number, got {0}")]
    InvalidSpeed(f64),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, source: CoreError) -> Self {
        ConfigError::Invalid { field, source }
    }
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
