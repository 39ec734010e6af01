//! The host window system seen from the toolkit.
//!
//! A [`HostView`] is the native view a [`Window`](crate::Window) renders
//! into. It delivers raw input as [`HostEvent`]s, owns the surface the
//! composed frame is blitted to, and schedules exposes on request.
//!
//! Two implementations ship with the crate:
//!
//! - [`HeadlessHost`]: no window system at all; events are pushed by hand
//!   and the output surface can be read back. Used by tests and offscreen
//!   rendering.
//! - [`winit_input`]: conversion of winit window events into
//!   [`HostEvent`]s for a winit-driven view.

mod headless;
pub mod winit_input;

use std::any::Any;
use std::time::Duration;

use serde::Deserialize;
use trellis_core::{Area, Point};
use trellis_render::{ImageSurface, RenderResult};

use crate::event::MouseButton;

pub use headless::HeadlessHost;

/// How the toolkit is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldType {
    /// A stand-alone program; the toolkit owns process-wide renderer state.
    #[default]
    Program,
    /// A module (plugin) inside a host application; shared state is left
    /// alone on teardown.
    Module,
}

/// Parameters for creating a host view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub title: String,
    /// Size in host pixels.
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Native parent window handle for embedded views.
    pub parent: Option<u64>,
    pub world_type: WorldType,
}

/// A raw input record. Positions and areas are in host pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    KeyPress { key: u32, position: Point },
    KeyRelease { key: u32, position: Point },
    /// Text input as a UTF-32 code point.
    Text { code: u32, position: Point },
    ButtonPress { button: MouseButton, position: Point },
    ButtonRelease { button: MouseButton, position: Point },
    Motion { position: Point },
    Scroll { position: Point, delta: Point },
    /// The view was resized or moved.
    Configure { area: Area },
    /// The host wants `area` repainted now.
    Expose { area: Area },
    Close,
}

/// The native view a window renders into.
pub trait HostView {
    /// Wait up to `timeout` for input and return what arrived.
    fn update(&mut self, timeout: Duration) -> Vec<HostEvent>;

    /// Ask the host to expose at least `area` (host pixels) soon.
    fn post_redisplay(&mut self, area: Area);

    /// The surface to draw the composed frame into, when one is available.
    fn surface_mut(&mut self) -> Option<&mut ImageSurface>;

    /// Resize the view and its surface.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    fn world_type(&self) -> WorldType;

    /// Tear the view down. Called once when the window is dropped.
    fn close(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
