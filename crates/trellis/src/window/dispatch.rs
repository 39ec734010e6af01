//! The dispatcher.
//!
//! [`Window::handle_events`] drains the events that were queued before the
//! pass started. Events queued by handlers wait for the next pass. After the
//! queue, the focus timer runs.

use std::time::Instant;

use trellis_core::logging::targets;
use trellis_core::{Area, PerfSpan};

use super::Window;
use crate::capability::Capability;
use crate::event::{Event, EventType, ExposeEvent, PointerEvent};
use crate::grab::{Device, DeviceState};
use crate::widget::{Behavior, WidgetId};

impl Window {
    /// Run one dispatch pass.
    pub fn handle_events(&mut self) {
        self.handle_events_at(Instant::now());
    }

    /// [`handle_events`](Self::handle_events) with an explicit clock
    /// reading for focus timing.
    pub fn handle_events_at(&mut self, now: Instant) {
        let _span = PerfSpan::new("dispatch");
        self.queue.begin_pass();
        let mut dispatched = 0usize;
        while let Some(event) = self.queue.pop_pass() {
            self.dispatch(event, now);
            dispatched += 1;
        }
        self.queue.end_pass();
        if dispatched > 0 {
            tracing::trace!(target: targets::DISPATCH, dispatched, pending = self.queue.len(), "pass done");
        }
        self.focus_pass(now);
    }

    fn dispatch(&mut self, event: Event, now: Instant) {
        let id = event.widget();
        if !self.tree.contains(id) {
            tracing::trace!(target: targets::DISPATCH, ?id, "event for dead widget");
            return;
        }
        let kind = event.event_type();
        tracing::trace!(target: targets::DISPATCH, ?id, ?kind, "dispatch");

        match kind {
            EventType::CONFIGURE_REQUEST => {
                if let Event::Expose(e) = &event {
                    self.on_configure(e);
                }
                self.run_handler(id, &event);
            }
            EventType::EXPOSE_REQUEST => {
                if let Event::Expose(e) = &event {
                    self.on_expose(e);
                }
                self.run_handler(id, &event);
            }
            EventType::CLOSE_REQUEST => {
                self.run_handler(id, &event);
                if let Event::Widget(e) = &event {
                    self.on_close(e.widget, e.request_widget);
                }
            }
            EventType::KEY_PRESS | EventType::KEY_RELEASE => {
                self.grabs.remove_device(Device::NO_BUTTON);
                self.unfocus();
                self.run_handler(id, &event);
            }
            EventType::POINTER_MOTION => {
                self.unfocus();
                self.grabs.remove_device(Device::NO_BUTTON);
                if let Event::Pointer(e) = &event {
                    self.track_hover(e, now);
                }
                self.run_handler(id, &event);
            }
            EventType::BUTTON_PRESS
            | EventType::BUTTON_RELEASE
            | EventType::BUTTON_CLICK
            | EventType::POINTER_DRAG
            | EventType::WHEEL_SCROLL => {
                self.unfocus();
                self.grabs.remove_device(Device::NO_BUTTON);
                self.run_handler(id, &event);
            }
            _ => self.run_handler(id, &event),
        }
    }

    /// The root follows host resizes; other widgets move and resize.
    fn on_configure(&mut self, event: &ExposeEvent) {
        let id = event.widget;
        let result = if id == self.tree.root() {
            self.resize(id, event.area.extends()).map(|()| {
                self.compositor.invalidate_all();
            })
        } else {
            self.move_to(id, event.area.position())
                .and_then(|()| self.resize(id, event.area.extends()))
        };
        if let Err(err) = result {
            tracing::warn!(target: targets::DISPATCH, ?id, %err, "configure failed");
        }
    }

    /// Host exposes repaint now. Toolkit exposes accumulate damage and ask
    /// the host for a repaint, which comes back as a host expose.
    fn on_expose(&mut self, event: &ExposeEvent) {
        if event.widget != self.tree.root() {
            let absolute = event.area.moved(self.tree.absolute_position(event.widget));
            self.damage(absolute);
            return;
        }
        if event.from_host {
            self.compositor.add_damage(event.area);
            self.redraw();
        } else {
            self.damage(event.area);
        }
    }

    fn damage(&mut self, area: Area) {
        if area.is_empty() {
            return;
        }
        self.compositor.add_damage(area);
        self.host.post_redisplay(area.scaled(self.zoom));
    }

    /// A close request on the root naming the root ends the main loop. A
    /// request naming another widget releases that widget.
    fn on_close(&mut self, handle: WidgetId, request: WidgetId) {
        if handle != self.tree.root() {
            return;
        }
        if request == handle {
            tracing::debug!(target: targets::DISPATCH, "close requested");
            self.quit = true;
            return;
        }
        if let Some(parent) = self.tree.get(request).and_then(|w| w.parent) {
            if let Err(err) = self.release(parent, request) {
                tracing::warn!(target: targets::DISPATCH, ?request, %err, "close failed");
            }
        }
    }

    /// Start focus timing on the pointer-focusable widget under the
    /// pointer. The passable mask does not apply to focus tracking.
    fn track_hover(&mut self, event: &PointerEvent, now: Instant) {
        let position = self.tree.absolute_position(event.widget) + event.position;
        let hovered = self
            .tree
            .widget_at(position, &|w| w.has(Capability::POINTER_FOCUSABLE), None);
        if let Some(hovered) = hovered {
            let origin = self.map_to_local(hovered, position);
            self.grabs
                .add(hovered, Device::NO_BUTTON, DeviceState::new(position, origin, now));
        }
    }

    /// Run the behavior hook, then the user callback, for `event` on `id`.
    ///
    /// Both are taken out of the widget while they run so they may borrow
    /// the window mutably; they are put back afterwards unless the handler
    /// installed a replacement or the widget was destroyed.
    pub(crate) fn run_handler(&mut self, id: WidgetId, event: &Event) {
        let kind = event.event_type();
        if let Some(cap) = Capability::for_event(kind) {
            if !self.tree.get(id).is_some_and(|w| w.has(cap)) {
                return;
            }
        }

        if let Some(mut behavior) = self.tree.get_mut(id).and_then(|w| w.behavior.take()) {
            call_behavior(behavior.as_mut(), self, id, event);
            if let Some(w) = self.tree.get_mut(id) {
                if w.behavior.is_none() {
                    w.behavior = Some(behavior);
                }
            }
        }

        if let Some(mut callback) = self.tree.get_mut(id).and_then(|w| w.callbacks.remove(&kind)) {
            callback(self, event);
            if let Some(w) = self.tree.get_mut(id) {
                w.callbacks.entry(kind).or_insert(callback);
            }
        }
    }
}

fn call_behavior(behavior: &mut dyn Behavior, window: &mut Window, id: WidgetId, event: &Event) {
    match event {
        Event::Widget(e) if e.kind == EventType::CLOSE_REQUEST => {
            behavior.on_close_request(window, id, e)
        }
        Event::Pointer(e) => match e.kind {
            EventType::BUTTON_PRESS => behavior.on_button_pressed(window, id, e),
            EventType::BUTTON_RELEASE => behavior.on_button_released(window, id, e),
            EventType::BUTTON_CLICK => behavior.on_button_clicked(window, id, e),
            EventType::POINTER_DRAG => behavior.on_pointer_dragged(window, id, e),
            EventType::POINTER_MOTION => behavior.on_pointer_motion(window, id, e),
            _ => {}
        },
        Event::Wheel(e) => behavior.on_wheel_scrolled(window, id, e),
        Event::Key(e) if e.kind == EventType::KEY_PRESS => behavior.on_key_pressed(window, id, e),
        Event::Key(e) => behavior.on_key_released(window, id, e),
        Event::Focus(e) if e.kind == EventType::POINTER_FOCUS_IN => behavior.on_focus_in(window, id, e),
        Event::Focus(e) => behavior.on_focus_out(window, id, e),
        Event::ValueChanged(e) => behavior.on_value_changed(window, id, e),
        Event::Message(e) => behavior.on_message(window, id, e),
        Event::Widget(_) | Event::Expose(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use trellis_core::Point;

    use super::*;
    use crate::event::MouseButton;
    use crate::host::HostEvent;
    use crate::widget::WidgetBuilder;
    use crate::window::WindowConfig;

    fn window() -> Window {
        let mut w = Window::headless(WindowConfig::new("t").with_size(100, 100)).unwrap();
        w.handle_events();
        w
    }

    #[test]
    fn test_handler_needs_capability() {
        let mut w = window();
        let hits = Rc::new(RefCell::new(0));
        let counter = hits.clone();
        let id = w.create(
            WidgetBuilder::new("w")
                .with_area(Area::new(0.0, 0.0, 10.0, 10.0))
                .with_callback(EventType::MESSAGE, move |_, _| *counter.borrow_mut() += 1),
        );
        let root = w.root();
        w.add(root, id).unwrap();

        w.post_message(id, "ping", ());
        w.handle_events();
        assert_eq!(*hits.borrow(), 0);

        w.support_capability(id, Capability::MESSAGABLE).unwrap();
        w.post_message(id, "ping", ());
        w.handle_events();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_events_from_handlers_wait_for_next_pass() {
        let mut w = window();
        let log = Rc::new(RefCell::new(Vec::new()));
        let seen = log.clone();
        let id = w.create(
            WidgetBuilder::new("w")
                .with_capabilities(Capability::MESSAGABLE)
                .with_callback(EventType::MESSAGE, move |win, e| {
                    if let Event::Message(m) = e {
                        seen.borrow_mut().push(m.name.clone());
                        if m.name == "first" {
                            win.post_message(m.widget, "second", ());
                        }
                    }
                }),
        );
        let root = w.root();
        w.add(root, id).unwrap();

        w.post_message(id, "first", ());
        w.handle_events();
        assert_eq!(*log.borrow(), vec!["first".to_owned()]);
        w.handle_events();
        assert_eq!(*log.borrow(), vec!["first".to_owned(), "second".to_owned()]);
    }

    #[test]
    fn test_callback_may_replace_itself() {
        let mut w = window();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = log.clone();
        let id = w.create(WidgetBuilder::new("w").with_capabilities(Capability::MESSAGABLE));
        let root = w.root();
        w.add(root, id).unwrap();
        w.set_callback(id, EventType::MESSAGE, move |win, e| {
            first.borrow_mut().push(1);
            let second = first.clone();
            win.set_callback(e.widget(), EventType::MESSAGE, move |_, _| second.borrow_mut().push(2))
                .unwrap();
        })
        .unwrap();

        w.post_message(id, "a", ());
        w.handle_events();
        w.post_message(id, "b", ());
        w.handle_events();
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_close_on_root_quits() {
        let mut w = window();
        w.translate(HostEvent::Close);
        w.handle_events();
        assert!(w.is_quit());
    }

    #[test]
    fn test_close_request_releases_widget() {
        let mut w = window();
        let id = w.create(WidgetBuilder::new("dialog").with_area(Area::new(0.0, 0.0, 10.0, 10.0)));
        let root = w.root();
        w.add(root, id).unwrap();
        w.post_close_request(root, id);
        w.handle_events();
        assert!(!w.is_quit());
        assert_eq!(w.widget(id).and_then(|x| x.parent()), None);
    }

    #[test]
    fn test_toolkit_expose_asks_host_for_repaint() {
        let mut w = window();
        let id = w.create(WidgetBuilder::new("w").with_area(Area::new(10.0, 10.0, 20.0, 20.0)));
        let root = w.root();
        w.add(root, id).unwrap();
        w.set_zoom(2.0).unwrap();
        let host = w.host_as_mut::<crate::host::HeadlessHost>().unwrap();
        host.clear_redisplay_requests();
        w.post_redisplay(id);
        w.handle_events();
        let host = w.host_as::<crate::host::HeadlessHost>().unwrap();
        assert!(host
            .redisplay_requests()
            .contains(&Area::new(20.0, 20.0, 40.0, 40.0)));
    }

    #[test]
    fn test_drag_needs_draggable() {
        let mut w = window();
        let drags = Rc::new(RefCell::new(0));
        let counter = drags.clone();
        let id = w.create(
            WidgetBuilder::new("w")
                .with_area(Area::new(0.0, 0.0, 50.0, 50.0))
                .with_capabilities(Capability::CLICKABLE)
                .with_callback(EventType::POINTER_DRAG, move |_, _| *counter.borrow_mut() += 1),
        );
        let root = w.root();
        w.add(root, id).unwrap();
        w.translate(HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(5.0, 5.0) });
        w.translate(HostEvent::Motion { position: Point::new(8.0, 5.0) });
        w.handle_events();
        assert_eq!(*drags.borrow(), 0);
    }
}
