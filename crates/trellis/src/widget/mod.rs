//! Widget nodes.
//!
//! Widgets live in an arena owned by their [`Window`](crate::Window) and are
//! addressed by [`WidgetId`]. A [`Widget`] is plain data: geometry, layer,
//! visibility, style, capabilities, callbacks, an optional value and an
//! optional [`Behavior`] that supplies widget-specific drawing and input
//! handling. All mutation that affects the tree, the queue or the screen goes
//! through `Window` methods so the invariants between them hold.
//!
//! Widgets are built with a [`WidgetBuilder`] and start detached:
//!
//! ```
//! use trellis::{Capability, EventType, Window, WindowConfig, WidgetBuilder};
//! use trellis_core::Area;
//!
//! let mut window = Window::headless(WindowConfig::new("demo").with_size(200, 100)).unwrap();
//! let button = window.create(
//!     WidgetBuilder::new("ok")
//!         .with_area(Area::new(70.0, 40.0, 60.0, 20.0))
//!         .with_capabilities(Capability::CLICKABLE)
//!         .with_callback(EventType::BUTTON_CLICK, |_, _| {}),
//! );
//! window.add(window.root(), button).unwrap();
//! assert!(window.is_visible(button));
//! ```

pub mod behavior;
pub mod tree;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use trellis_core::{urid, Area, Point, Urid};
use trellis_render::ImageSurface;
use trellis_style::{Status, Style};

use crate::capability::value::{ValueModel, ValueState};
use crate::capability::{Capabilities, Capability};
use crate::event::{Event, EventType};
use crate::window::Window;

pub use behavior::{draw_frame, Behavior, DrawInfo};
pub use tree::WidgetTree;

slotmap::new_key_type! {
    /// Handle of a widget in its window's arena.
    pub struct WidgetId;
}

/// A per-event-type user callback.
pub type Callback = Box<dyn FnMut(&mut Window, &Event)>;

/// URI used for widgets built without one.
pub const DEFAULT_WIDGET_URI: &str = "urn:trellis:widget#widget";

/// Default pointer-focus activation time.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(200);

/// A node of the widget tree.
pub struct Widget {
    pub(crate) title: String,
    pub(crate) urid: Urid,
    /// Position relative to the parent, and extends.
    pub(crate) area: Area,
    pub(crate) layer: i32,
    pub(crate) visible: bool,
    pub(crate) parent: Option<WidgetId>,
    /// Children in insertion order.
    pub(crate) children: Vec<WidgetId>,
    /// Linked (transitively) under the root.
    pub(crate) attached: bool,
    pub(crate) surface: Option<ImageSurface>,
    pub(crate) schedule_draw: bool,
    pub(crate) passable: EventType,
    pub(crate) mergeable: Option<EventType>,
    pub(crate) capabilities: Capabilities,
    pub(crate) focus_delay: Option<Duration>,
    pub(crate) status: Status,
    pub(crate) style: Style,
    pub(crate) callbacks: HashMap<EventType, Callback>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) value: Option<Box<dyn ValueModel>>,
}

impl Widget {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The widget's style key.
    pub fn urid(&self) -> Urid {
        self.urid
    }

    /// Position relative to the parent.
    pub fn position(&self) -> Point {
        self.area.position()
    }

    pub fn extends(&self) -> Point {
        self.area.extends()
    }

    /// Area in the parent's coordinates.
    pub fn area(&self) -> Area {
        self.area
    }

    /// Area in the widget's own coordinates.
    pub fn local_area(&self) -> Area {
        Area::from_position(Point::ZERO, self.area.extends())
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// The widget's own visibility flag. See `Window::is_visible` for the
    /// effective visibility.
    pub fn is_shown(&self) -> bool {
        self.visible
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether the widget waits for a redraw of its surface.
    pub fn needs_redraw(&self) -> bool {
        self.schedule_draw
    }

    /// The widget's offscreen surface, once drawn.
    pub fn surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Whether `cap` is supported and enabled.
    pub fn has(&self, cap: Capability) -> bool {
        self.capabilities.has(cap)
    }

    /// Event types that pass through this widget during hit-testing.
    pub fn passable(&self) -> EventType {
        self.passable
    }

    /// Event types that may merge in the queue, if set per widget.
    pub fn mergeable(&self) -> Option<EventType> {
        self.mergeable
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn has_callback(&self, kind: EventType) -> bool {
        self.callbacks.contains_key(&kind)
    }

    /// The stored value, if it has type `T`.
    pub fn value<T: Clone + PartialEq + 'static>(&self) -> Option<&T> {
        self.value
            .as_deref()
            .and_then(|v| v.downcast_ref::<T>())
            .map(ValueState::value)
    }

    pub(crate) fn value_model(&self) -> Option<&dyn ValueModel> {
        self.value.as_deref()
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("title", &self.title)
            .field("urid", &self.urid)
            .field("area", &self.area)
            .field("layer", &self.layer)
            .field("visible", &self.visible)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("capabilities", &self.capabilities.active())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Widget`]s; pass it to `Window::create`.
pub struct WidgetBuilder {
    title: String,
    urid: Option<Urid>,
    area: Area,
    layer: i32,
    visible: bool,
    capabilities: Capability,
    passable: EventType,
    mergeable: Option<EventType>,
    focus_delay: Option<Duration>,
    style: Style,
    callbacks: HashMap<EventType, Callback>,
    behavior: Option<Box<dyn Behavior>>,
    value: Option<Box<dyn ValueModel>>,
}

impl WidgetBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            urid: None,
            area: Area::default(),
            layer: 0,
            visible: true,
            capabilities: Capability::empty(),
            passable: EventType::empty(),
            mergeable: None,
            focus_delay: None,
            style: Style::new(),
            callbacks: HashMap::new(),
            behavior: None,
            value: None,
        }
    }

    /// Style key, given as a URI.
    pub fn with_uri(mut self, uri: &str) -> Self {
        self.urid = Some(urid(uri));
        self
    }

    pub fn with_urid(mut self, id: Urid) -> Self {
        self.urid = Some(id);
        self
    }

    /// Position (relative to the parent) and extends.
    pub fn with_area(mut self, area: Area) -> Self {
        self.area = area;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Support and enable `caps`, in addition to any already set.
    pub fn with_capabilities(mut self, caps: Capability) -> Self {
        self.capabilities |= caps;
        self
    }

    /// Let events of `mask` pass to whatever lies beneath.
    pub fn with_passable(mut self, mask: EventType) -> Self {
        self.passable = mask;
        self
    }

    /// Override the window's default merge mask for this widget.
    pub fn with_mergeable(mut self, mask: EventType) -> Self {
        self.mergeable = Some(mask);
        self
    }

    /// Pointer-focus activation time.
    pub fn with_focus_delay(mut self, delay: Duration) -> Self {
        self.focus_delay = Some(delay);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Register a callback; a later registration for the same type wins.
    pub fn with_callback(
        mut self,
        kind: EventType,
        callback: impl FnMut(&mut Window, &Event) + 'static,
    ) -> Self {
        self.callbacks.insert(kind, Box::new(callback));
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Give the widget a value; implies [`Capability::VALUEABLE`].
    pub fn with_value<T: Clone + PartialEq + 'static>(mut self, value: T) -> Self {
        self.value = Some(Box::new(ValueState::new(value)));
        self.capabilities |= Capability::VALUEABLE;
        self
    }

    /// Give the widget a prepared value state (validator, transfer).
    pub fn with_value_state<T: Clone + PartialEq + 'static>(mut self, state: ValueState<T>) -> Self {
        self.capabilities |= Capability::VALUEABLE | state_capabilities(&state);
        self.value = Some(Box::new(state));
        self
    }

    pub(crate) fn build(self) -> Widget {
        Widget {
            title: self.title,
            urid: self.urid.unwrap_or_else(|| urid(DEFAULT_WIDGET_URI)),
            area: self.area,
            layer: self.layer,
            visible: self.visible,
            parent: None,
            children: Vec::new(),
            attached: false,
            surface: None,
            schedule_draw: true,
            passable: self.passable,
            mergeable: self.mergeable,
            capabilities: Capabilities::new(self.capabilities),
            focus_delay: self.focus_delay,
            status: Status::Normal,
            style: self.style,
            callbacks: self.callbacks,
            behavior: self.behavior,
            value: self.value,
        }
    }
}

impl fmt::Debug for WidgetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBuilder")
            .field("title", &self.title)
            .field("area", &self.area)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// Value-related capabilities implied by `model`.
pub(crate) fn state_capabilities(model: &dyn ValueModel) -> Capability {
    let mut caps = Capability::empty();
    caps.set(Capability::VALIDATABLE, model.is_validated());
    caps.set(Capability::VALUE_TRANSFERABLE, model.has_transfer());
    caps
}
