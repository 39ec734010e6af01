//! The root window.
//!
//! A [`Window`] owns everything that belongs to one toolkit view: the widget
//! arena, the event queue, the device grabs, the pointer-focus state, the
//! compositor and the [`HostView`] it renders into.
//!
//! Input flows in one direction:
//!
//! 1. The host delivers raw [`HostEvent`]s; [`Window::translate`] targets them
//!    at widgets and enqueues toolkit events.
//! 2. [`Window::handle_events`] drains the queue, runs capability handlers
//!    and user callbacks, and runs the focus timer.
//! 3. Expose requests accumulate damage and ask the host for a repaint; the
//!    host's expose triggers the redraw pass, which composes the widget
//!    surfaces and blits them onto the host surface.
//!
//! [`Window::run`] loops over these steps until the window is closed.
//! Embedded views call [`Window::step`] (or the three steps individually)
//! from the host's own loop instead.

mod config;
mod dispatch;
mod focus;
mod redraw;
mod translate;
mod tree;
mod values;

use std::any::Any;
use std::time::Instant;

use trellis_core::logging::targets;
use trellis_core::{Area, Point, TreeFormatOptions};
use trellis_style::{keys, Theme};

use crate::capability::Capability;
use crate::error::WidgetResult;
use crate::event::{Event, EventQueue};
use crate::grab::DeviceGrabStack;
use crate::host::{HeadlessHost, HostView};
use crate::widget::{Widget, WidgetBuilder, WidgetId, WidgetTree};

pub use config::{WindowConfig, DEFAULT_UPDATE_TIMEOUT};

use redraw::Compositor;

/// The root of a widget tree and the owner of its event machinery.
pub struct Window {
    tree: WidgetTree,
    queue: EventQueue,
    grabs: DeviceGrabStack,
    /// The widget holding pointer focus.
    focused: Option<WidgetId>,
    /// Last pointer position in root coordinates.
    pointer: Point,
    compositor: Compositor,
    theme: Theme,
    zoom: f64,
    host: Box<dyn HostView>,
    config: WindowConfig,
    quit: bool,
}

impl Window {
    /// Create a window rendering into `host`.
    pub fn new(config: WindowConfig, host: Box<dyn HostView>) -> Self {
        let root = WidgetBuilder::new(config.title())
            .with_uri(keys::WINDOW_URI)
            .with_area(Area::new(
                0.0,
                0.0,
                f64::from(config.width()),
                f64::from(config.height()),
            ))
            .with_capabilities(Capability::CLOSEABLE)
            .build();
        let viewport = root.local_area();
        let tree = WidgetTree::new(root);

        tracing::debug!(
            target: targets::TREE,
            title = config.title(),
            width = config.width(),
            height = config.height(),
            world = ?host.world_type(),
            "window created"
        );

        Self {
            tree,
            queue: EventQueue::new(),
            grabs: DeviceGrabStack::new(),
            focused: None,
            pointer: Point::ZERO,
            compositor: Compositor::new(viewport),
            theme: Theme::builtin(),
            zoom: config.zoom(),
            host,
            config,
            quit: false,
        }
    }

    /// Create a window on a [`HeadlessHost`].
    pub fn headless(config: WindowConfig) -> WidgetResult<Self> {
        let host = HeadlessHost::new(&config.view_config())?;
        Ok(Self::new(config, Box::new(host)))
    }

    /// The root widget.
    pub fn root(&self) -> WidgetId {
        self.tree.root()
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.tree.get(id)
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Pending events, oldest first.
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn grabs(&self) -> &DeviceGrabStack {
        &self.grabs
    }

    /// The widget currently holding pointer focus.
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn host(&self) -> &dyn HostView {
        self.host.as_ref()
    }

    /// The host, if it has type `H`.
    pub fn host_as<H: HostView + 'static>(&self) -> Option<&H> {
        self.host.as_any().downcast_ref()
    }

    pub fn host_as_mut<H: HostView + 'static>(&mut self) -> Option<&mut H> {
        self.host.as_any_mut().downcast_mut()
    }

    /// Whether a close request on the root ended the main loop.
    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// End [`run`](Self::run) after the current iteration.
    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// Move a built widget into the arena. It stays detached until added
    /// to a parent.
    pub fn create(&mut self, builder: WidgetBuilder) -> WidgetId {
        let widget = builder.build();
        let title = widget.title.clone();
        let id = self.tree.insert(widget);
        tracing::trace!(target: targets::TREE, ?id, %title, "widget created");
        id
    }

    /// Enqueue `event` with the target's merge mask.
    ///
    /// Events for widgets that no longer exist are dropped. Returns `true`
    /// when the event was merged into a pending one.
    pub fn add_event(&mut self, event: Event) -> bool {
        let Some(widget) = self.tree.get(event.widget()) else {
            tracing::trace!(target: targets::QUEUE, kind = ?event.event_type(), "dropped event for dead widget");
            return false;
        };
        if event.request_widget().is_some_and(|r| !self.tree.contains(r)) {
            tracing::trace!(target: targets::QUEUE, kind = ?event.event_type(), "dropped event for dead request widget");
            return false;
        }
        let mask = widget.mergeable.unwrap_or(self.config.merge_mask());
        self.queue.add(event, mask)
    }

    /// Request a repaint of the whole widget.
    pub fn post_redisplay(&mut self, id: WidgetId) {
        let Some(widget) = self.tree.get(id) else {
            return;
        };
        let local = widget.local_area();
        self.post_redisplay_area(id, local);
    }

    /// Request a repaint of `area` (in `id`'s coordinates).
    ///
    /// Enqueues an expose request on the root covering the area in root
    /// coordinates, clipped by the widget's ancestors. Detached widgets are
    /// not on screen and post nothing.
    pub fn post_redisplay_area(&mut self, id: WidgetId, area: Area) {
        if !self.tree.get(id).is_some_and(|w| w.attached) {
            return;
        }
        let absolute = area
            .moved(self.tree.absolute_position(id))
            .intersection(&self.tree.visible_area(id));
        if absolute.is_empty() {
            return;
        }
        let root = self.tree.root();
        self.add_event(Event::expose_request(root, id, absolute));
    }

    /// Mark the widget for redraw and request a repaint.
    pub fn update(&mut self, id: WidgetId) {
        if let Some(widget) = self.tree.get_mut(id) {
            widget.schedule_draw = true;
        }
        self.post_redisplay(id);
    }

    /// Ask `handle` to close on behalf of `request`. A close request on the
    /// root naming the root ends the main loop; naming another widget
    /// releases that widget.
    pub fn post_close_request(&mut self, handle: WidgetId, request: WidgetId) {
        self.add_event(Event::close_request(handle, request));
    }

    /// Send a named message with an arbitrary payload to `id`.
    pub fn post_message(&mut self, id: WidgetId, name: impl Into<String>, payload: impl Any) {
        self.add_event(Event::message(id, name, Box::new(payload)));
    }

    /// Render the widget tree for debugging.
    pub fn debug_tree(&self) -> String {
        self.tree.format(self.tree.root(), &TreeFormatOptions::default())
    }

    /// Process host input until the window is closed.
    pub fn run(&mut self) {
        tracing::debug!(target: targets::HOST, "entering main loop");
        while !self.quit {
            self.step();
        }
        tracing::debug!(target: targets::HOST, "main loop finished");
    }

    /// One main-loop iteration: poll the host, translate, dispatch.
    pub fn step(&mut self) {
        self.step_at(Instant::now());
    }

    /// [`step`](Self::step) with an explicit clock reading.
    pub fn step_at(&mut self, now: Instant) {
        let events = self.host.update(self.config.update_timeout());
        for event in events {
            self.translate_at(event, now);
        }
        self.handle_events_at(now);
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.queue.clear();
        self.host.close();
        tracing::debug!(target: targets::HOST, world = ?self.host.world_type(), "window closed");
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.config.title())
            .field("widgets", &self.tree.len())
            .field("queued", &self.queue.len())
            .field("zoom", &self.zoom)
            .finish_non_exhaustive()
    }
}
