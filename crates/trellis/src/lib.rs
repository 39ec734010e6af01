//! Trellis - a retained-mode widget toolkit core.
//!
//! A [`Window`] owns a tree of widgets, an event queue, the device grabs and
//! a compositor. Host input is translated into widget-addressed events,
//! dispatched in passes, and the damaged part of the tree is redrawn from
//! per-widget offscreen surfaces into the host's view.
//!
//! The crate is host-agnostic: any native view implementing [`HostView`]
//! can carry a window. [`HeadlessHost`] runs without a window system and is
//! what tests and offscreen rendering use.
//!
//! # Example
//!
//! ```
//! use trellis::{Capability, EventType, HeadlessHost, HostEvent, MouseButton, Window, WindowConfig, WidgetBuilder};
//! use trellis::{Area, Point};
//!
//! let mut window = Window::headless(WindowConfig::new("hello").with_size(120, 60)).unwrap();
//! let button = window.create(
//!     WidgetBuilder::new("ok")
//!         .with_area(Area::new(10.0, 10.0, 40.0, 20.0))
//!         .with_capabilities(Capability::CLICKABLE)
//!         .with_callback(EventType::BUTTON_CLICK, |window, _| window.quit()),
//! );
//! window.add(window.root(), button).unwrap();
//!
//! let host = window.host_as_mut::<HeadlessHost>().unwrap();
//! host.push_event(HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(20.0, 20.0) });
//! host.push_event(HostEvent::ButtonRelease { button: MouseButton::Left, position: Point::new(20.0, 20.0) });
//! window.step();
//! assert!(window.is_quit());
//! ```

pub mod capability;
mod error;
pub mod event;
pub mod grab;
pub mod host;
pub mod widget;
pub mod window;

pub use trellis_core::*;

pub use capability::value::{Numeric, RangeValidator, Validatable, ValueState, ValueTransfer};
pub use capability::{Capabilities, Capability};
pub use error::{WidgetError, WidgetResult};
pub use event::{
    Event, EventQueue, EventType, ExposeEvent, KeyEvent, MessageEvent, MouseButton, PointerEvent,
    PointerFocusEvent, ValueChangedEvent, WheelEvent, WidgetEvent,
};
pub use grab::{Device, DeviceGrab, DeviceGrabStack, DeviceState};
pub use host::{HeadlessHost, HostEvent, HostView, ViewConfig, WorldType};
pub use widget::{draw_frame, Behavior, Callback, DrawInfo, Widget, WidgetBuilder, WidgetId, WidgetTree};
pub use window::{Window, WindowConfig};

/// Offscreen surfaces, drawing and damage tracking.
pub mod render {
    pub use trellis_render::*;
}

/// Themes, styles and widget status.
pub mod style {
    pub use trellis_style::*;
}
