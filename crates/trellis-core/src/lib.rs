//! Core systems for Trellis.
//!
//! This crate provides the foundational pieces the rest of the toolkit is
//! built on:
//!
//! - **Geometry**: [`Point`] and [`Area`] with union, intersection and
//!   containment
//! - **URIDs**: interned URI identifiers used as style and identity keys
//! - **Logging**: `tracing` targets and tree-debug formatting
//!
//! The toolkit is single-threaded: widgets, events and redraws live on the UI
//! thread. Only the process-wide URID table is behind a lock.

mod error;
pub mod geometry;
pub mod logging;
pub mod urid;

pub use error::{CoreError, CoreResult};
pub use geometry::{Area, Coord, Point};
pub use logging::{format_tree, PerfSpan, TreeFormatOptions, TreeStyle};
pub use urid::{uri, urid, Urid, UridRegistry};
