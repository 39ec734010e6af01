//! Styling for Trellis widgets.
//!
//! Styles are URID-keyed property maps. A widget looks up what it needs at
//! draw time through [`Theme::resolve_as`]: its own local [`Style`] wins, then
//! the theme entry registered for the widget's URID, then the theme defaults.
//! A key missing everywhere leaves the widget to substitute its own default.
//!
//! ```
//! use trellis_core::urid;
//! use trellis_style::{keys, Border, Style, Theme};
//!
//! let theme = Theme::builtin();
//! let widget = urid("urn:example:knob");
//! let style = Style::new();
//! let border = theme.resolve_as::<Border>(&style, widget, keys::border());
//! assert!(border.is_some());
//! ```

mod error;
pub mod keys;
pub mod style;
pub mod theme;
pub mod value;

pub use error::{StyleError, StyleResult};
pub use style::Style;
pub use theme::Theme;
pub use value::{
    Border, ColorMap, Fill, Font, FontSlant, FontWeight, Line, Status, StyleProperty, StyleValue,
    TextAlign, TextVAlign,
};
