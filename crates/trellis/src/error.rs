//! Error types for widget and window operations.

use trellis_core::CoreError;
use trellis_render::RenderError;
use trellis_style::StyleError;

use crate::widget::WidgetId;

/// Errors returned by widget tree and value operations.
///
/// Every fallible operation leaves the tree unchanged when it returns an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The id does not name a live widget.
    #[error("invalid widget {0:?}")]
    InvalidWidget(WidgetId),

    /// `child` is not a child of `parent`.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: WidgetId, child: WidgetId },

    /// The widget is already a child of that parent.
    #[error("{child:?} is already a child of {parent:?}")]
    AlreadyParented { parent: WidgetId, child: WidgetId },

    /// Adding would make a widget its own ancestor.
    #[error("adding {child:?} to {parent:?} would create a cycle")]
    CircularParentage { parent: WidgetId, child: WidgetId },

    /// The operation is not allowed on the root widget.
    #[error("operation not allowed on the root widget")]
    RootWidget,

    /// The stored value has another type than the one requested.
    #[error("value type mismatch: expected {expected}, got {got}")]
    ValueTypeMismatch {
        expected: &'static str,
        got: &'static str,
    },

    /// The widget carries no value.
    #[error("{0:?} carries no value")]
    NotValueable(WidgetId),

    /// A range with `min > max`, or a non-finite bound or step.
    #[error("invalid range")]
    InvalidRange,

    /// Zoom factors must be finite and positive.
    #[error("invalid zoom factor {0}")]
    InvalidZoom(f64),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Style(#[from] StyleError),
}

/// Result type for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
