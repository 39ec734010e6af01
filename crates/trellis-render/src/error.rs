//! Error types for the render crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during drawing operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Invalid surface dimensions (zero width or height).
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The raster backend could not allocate a surface.
    #[error("failed to allocate {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    /// A gradient could not be built (fewer than two stops, or degenerate).
    #[error("invalid gradient")]
    InvalidGradient,

    /// Failed to load an image from disk.
    #[error("failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to write an image to disk.
    #[error("failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
