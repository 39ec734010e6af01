//! Offscreen raster backend for Trellis.
//!
//! Every widget draws into its own [`ImageSurface`]; the window composes those
//! surfaces and blits the result onto the host surface. Drawing goes through a
//! Cairo-style [`DrawContext`]:
//!
//! ```
//! use trellis_core::Point;
//! use trellis_render::{Color, DrawContext, ImageSurface, LinearGradient};
//!
//! let mut surface = ImageSurface::new(40, 20)?;
//! let mut cr = DrawContext::new(&mut surface);
//!
//! cr.rounded_rectangle(1.0, 1.0, 38.0, 18.0, 4.0);
//! cr.set_source_linear(
//!     LinearGradient::new(Point::new(0.0, 0.0), Point::new(0.0, 20.0))
//!         .with_stop(0.0, Color::WHITE)
//!         .with_stop(1.0, Color::GRAY),
//! );
//! cr.fill_preserve()?;
//! cr.set_source_color(Color::BLACK);
//! cr.set_line_width(1.0);
//! cr.stroke()?;
//! # Ok::<(), trellis_render::RenderError>(())
//! ```
//!
//! [`DamageTracker`] accumulates the regions that need recomposition.

pub mod context;
pub mod damage;
mod error;
pub mod paint;
pub mod surface;
pub mod types;

pub use context::DrawContext;
pub use damage::DamageTracker;
pub use error::{RenderError, RenderResult};
pub use paint::{ColorStop, LinearGradient, Source};
pub use surface::ImageSurface;
pub use types::Color;
