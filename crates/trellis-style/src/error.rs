//! Error types for the styling system.

use std::path::PathBuf;

/// Result type alias for style operations.
pub type StyleResult<T> = std::result::Result<T, StyleError>;

/// Errors that can occur while building or loading styles.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// The theme file is not valid TOML, or a value has the wrong shape.
    #[error("theme parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A style key or widget key did not name a URI.
    #[error("invalid style key '{key}'")]
    InvalidKey { key: String },

    /// Invalid property value.
    #[error("invalid value for property '{property}': {message}")]
    InvalidValue { property: String, message: String },

    /// File I/O error.
    #[error("failed to read theme '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StyleError {
    /// Create a value error.
    pub fn invalid_value(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
