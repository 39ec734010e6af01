//! Error types shared across Trellis crates.

use thiserror::Error;

use crate::urid::Urid;

/// Errors raised by the core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A URID has no registered URI.
    #[error("unknown urid {0}")]
    UnknownUrid(Urid),

    /// A geometry value was not finite.
    #[error("non-finite coordinate in {context}")]
    NonFiniteCoordinate {
        /// Where the value came from.
        context: &'static str,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
