//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use trellis::{Behavior, Event, EventType, PointerEvent, Window, WindowConfig, WidgetBuilder, WidgetId};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A headless window with the initial host expose already handled.
pub fn window(width: u32, height: u32) -> Window {
    init_tracing();
    let mut window =
        Window::headless(WindowConfig::new("test").with_size(width, height)).expect("headless window");
    window.step();
    window
}

/// Run main-loop iterations until exposes bounced through the host have
/// been redrawn.
pub fn settle(window: &mut Window) {
    for _ in 0..8 {
        window.step();
    }
}

/// Records every handler invocation as `(widget, event type)`.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<(WidgetId, EventType)>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that records the events it receives.
    pub fn callback(&self) -> impl FnMut(&mut Window, &Event) + 'static {
        let log = self.0.clone();
        move |_, event| log.borrow_mut().push((event.widget(), event.event_type()))
    }

    /// Register the recording callback on `id` for every type in `kinds`.
    pub fn watch(&self, window: &mut Window, id: WidgetId, kinds: EventType) {
        for kind in kinds.iter() {
            window.set_callback(id, kind, self.callback()).expect("live widget");
        }
    }

    pub fn events(&self) -> Vec<(WidgetId, EventType)> {
        self.0.borrow().clone()
    }

    pub fn kinds_for(&self, id: WidgetId) -> Vec<EventType> {
        self.0.borrow().iter().filter(|(w, _)| *w == id).map(|(_, k)| *k).collect()
    }

    pub fn count(&self, kind: EventType) -> usize {
        self.0.borrow().iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A push button that toggles a `bool` value on click.
pub struct Toggle;

impl Behavior for Toggle {
    fn on_button_clicked(&mut self, window: &mut Window, id: WidgetId, _event: &PointerEvent) {
        let on = window.value::<bool>(id).unwrap_or(false);
        let _ = window.set_value(id, !on);
    }
}

pub fn toggle(title: &str) -> WidgetBuilder {
    WidgetBuilder::new(title)
        .with_capabilities(trellis::Capability::CLICKABLE)
        .with_value(false)
        .with_behavior(Toggle)
}

/// A horizontal slider: dragging across the full width spans the unit
/// interval.
pub struct Slider;

impl Behavior for Slider {
    fn on_pointer_dragged(&mut self, window: &mut Window, id: WidgetId, event: &PointerEvent) {
        let Some(width) = window.widget(id).map(|w| w.extends().x) else {
            return;
        };
        if width <= 0.0 {
            return;
        }
        let Ok(current) = window.value::<f64>(id) else {
            return;
        };
        let _ = window.set_value(id, current + event.delta.x / width);
    }
}

pub fn slider(title: &str, value: f64) -> WidgetBuilder {
    WidgetBuilder::new(title)
        .with_capabilities(trellis::Capability::DRAGGABLE)
        .with_value(value)
        .with_behavior(Slider)
}
