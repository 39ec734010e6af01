//! Pointer-focus timing.
//!
//! While the pointer hovers a pointer-focusable widget, the dispatcher keeps
//! a `Mouse(NoButton)` grab on it, stamped with the time the hover started.
//! After each pass the focus timer checks that grab: once the widget's
//! activation time has elapsed, it emits a focus-in. Any pointer activity
//! afterwards emits the matching focus-out. At most one widget is focused.

use std::time::Instant;

use trellis_core::logging::targets;

use super::Window;
use crate::capability::Capability;
use crate::event::{Event, EventType};
use crate::grab::Device;

impl Window {
    /// Emit a focus-out for the focused widget, if any.
    pub(crate) fn unfocus(&mut self) {
        let Some(id) = self.focused.take() else {
            return;
        };
        if !self.tree.contains(id) {
            return;
        }
        let local = self.map_to_local(id, self.pointer);
        tracing::trace!(target: targets::FOCUS, ?id, "focus out");
        self.add_event(Event::focus(id, EventType::POINTER_FOCUS_OUT, local));
    }

    pub(crate) fn focus_pass(&mut self, now: Instant) {
        if self.focused.is_some() {
            return;
        }
        let Some(grab) = self.grabs.get(Device::NO_BUTTON) else {
            return;
        };
        let (id, state) = (grab.widget, grab.state);
        let Some(widget) = self.tree.get(id) else {
            return;
        };
        if !widget.has(Capability::POINTER_FOCUSABLE) || !self.tree.is_visible(id) {
            return;
        }

        let delay = widget.focus_delay.unwrap_or(self.config.focus_activation());
        let elapsed = now.saturating_duration_since(state.since);
        let active = match &widget.behavior {
            Some(behavior) => behavior.is_focus_active(elapsed, delay),
            None => elapsed >= delay,
        };
        if !active {
            return;
        }

        tracing::trace!(target: targets::FOCUS, ?id, ?elapsed, "focus in");
        self.focused = Some(id);
        self.add_event(Event::focus(id, EventType::POINTER_FOCUS_IN, state.origin));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use trellis_core::{Area, Point};

    use super::*;
    use crate::host::HostEvent;
    use crate::widget::WidgetBuilder;
    use crate::window::WindowConfig;

    fn focus_events(w: &Window) -> Vec<EventType> {
        w.queue()
            .iter()
            .map(Event::event_type)
            .filter(|k| EventType::POINTER_FOCUS_EVENTS.contains(*k))
            .collect()
    }

    #[test]
    fn test_focus_after_activation_time() {
        let mut w = Window::headless(
            WindowConfig::new("focus").with_focus_activation(Duration::from_millis(100)),
        )
        .unwrap();
        let id = w.create(
            WidgetBuilder::new("tip")
                .with_area(Area::new(0.0, 0.0, 50.0, 50.0))
                .with_capabilities(Capability::POINTER_FOCUSABLE),
        );
        let root = w.root();
        w.add(root, id).unwrap();

        let t0 = Instant::now();
        w.translate_at(HostEvent::Motion { position: Point::new(10.0, 10.0) }, t0);
        w.handle_events_at(t0);
        assert_eq!(w.grabs().get(Device::NO_BUTTON).map(|g| g.widget), Some(id));
        assert!(focus_events(&w).is_empty());

        w.handle_events_at(t0 + Duration::from_millis(150));
        assert_eq!(w.focused(), Some(id));
        assert_eq!(focus_events(&w), vec![EventType::POINTER_FOCUS_IN]);

        w.handle_events_at(t0 + Duration::from_millis(300));
        assert!(focus_events(&w).is_empty());
    }
}
