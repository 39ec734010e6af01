//! Host event translation.
//!
//! Raw host input is in host pixels and has no target. The translator
//! divides by the zoom factor, picks the target widget (hit-test or grab)
//! and enqueues toolkit events with widget-local positions.

use std::time::Instant;

use trellis_core::logging::targets;
use trellis_core::Point;

use super::Window;
use crate::capability::Capability;
use crate::event::{keys, Event, EventType, ExposeEvent, MouseButton};
use crate::grab::{Device, DeviceState};
use crate::host::HostEvent;
use crate::widget::WidgetId;

impl Window {
    /// Translate one raw host event into queued toolkit events.
    pub fn translate(&mut self, event: HostEvent) {
        self.translate_at(event, Instant::now());
    }

    /// [`translate`](Self::translate) with an explicit clock reading, used
    /// as the start time of new grabs.
    pub fn translate_at(&mut self, event: HostEvent, now: Instant) {
        tracing::trace!(target: targets::HOST, ?event, "host event");
        let zoom = self.zoom;
        match event {
            HostEvent::KeyPress { key, position } => {
                // Printable keys arrive again through the text path.
                if !keys::is_printable(key) {
                    self.key_event(EventType::KEY_PRESS, key, position / zoom);
                }
            }
            HostEvent::KeyRelease { key, position } => {
                self.key_event(EventType::KEY_RELEASE, key, position / zoom);
            }
            HostEvent::Text { code, position } => {
                self.key_event(EventType::KEY_PRESS, code, position / zoom);
            }
            HostEvent::ButtonPress { button, position } => {
                self.button_press(button, position / zoom, now);
            }
            HostEvent::ButtonRelease { button, position } => {
                self.button_release(button, position / zoom);
            }
            HostEvent::Motion { position } => self.motion(position / zoom),
            HostEvent::Scroll { position, delta } => self.scroll(position / zoom, delta),
            HostEvent::Configure { area } => {
                let root = self.tree.root();
                let area = area.scaled(1.0 / zoom);
                self.add_event(Event::configure_request(root, area));
            }
            HostEvent::Expose { area } => {
                let root = self.tree.root();
                self.add_event(Event::Expose(ExposeEvent {
                    widget: root,
                    kind: EventType::EXPOSE_REQUEST,
                    request_widget: root,
                    area: area.scaled(1.0 / zoom),
                    from_host: true,
                }));
            }
            HostEvent::Close => {
                let root = self.tree.root();
                self.post_close_request(root, root);
            }
        }
    }

    /// Key events go to the holder of the key's grab, or nowhere.
    fn key_event(&mut self, kind: EventType, key: u32, position: Point) {
        let Some(holder) = self.grabs.get(Device::Keyboard(key)).map(|g| g.widget) else {
            tracing::trace!(target: targets::HOST, key, "key without grab");
            return;
        };
        let local = self.map_to_local(holder, position);
        self.add_event(Event::key(holder, kind, local, key));
    }

    fn button_press(&mut self, button: MouseButton, position: Point, now: Instant) {
        self.pointer = position;
        let target = self.tree.widget_at(
            position,
            &|w| w.has(Capability::CLICKABLE) || w.has(Capability::DRAGGABLE),
            Some(EventType::BUTTON_PRESS),
        );
        let Some(target) = target else {
            return;
        };
        let local = self.map_to_local(target, position);
        self.grabs
            .add(target, Device::Mouse(button), DeviceState::new(position, local, now));
        self.add_event(Event::pointer(
            target,
            EventType::BUTTON_PRESS,
            local,
            local,
            Point::ZERO,
            button,
        ));
    }

    /// The release goes to the widget that received the press. A click
    /// follows when the pointer did not drag and is still over that widget.
    fn button_release(&mut self, button: MouseButton, position: Point) {
        self.pointer = position;
        let Some(grab) = self.grabs.remove_device(Device::Mouse(button)) else {
            return;
        };
        let holder = grab.widget;
        if !self.tree.contains(holder) {
            return;
        }
        let local = self.map_to_local(holder, position);
        let delta = position - grab.state.position;
        self.add_event(Event::pointer(
            holder,
            EventType::BUTTON_RELEASE,
            local,
            grab.state.origin,
            delta,
            button,
        ));

        let under = self.tree.widget_at(
            position,
            &|w| w.has(Capability::CLICKABLE) || w.has(Capability::DRAGGABLE),
            Some(EventType::BUTTON_PRESS),
        );
        if !grab.state.dragged && under == Some(holder) {
            self.add_event(Event::pointer(
                holder,
                EventType::BUTTON_CLICK,
                local,
                grab.state.origin,
                delta,
                button,
            ));
        }
    }

    /// With buttons held, every held button drags its holder; otherwise
    /// the topmost pointable widget gets a motion event.
    fn motion(&mut self, position: Point) {
        let delta = position - self.pointer;
        self.pointer = position;

        let held = self.grabs.held_buttons();
        if !held.is_empty() {
            for button in held {
                let Some(grab) = self.grabs.get_mut(Device::Mouse(button)) else {
                    continue;
                };
                if delta != Point::ZERO {
                    grab.state.dragged = true;
                }
                let (holder, origin) = (grab.widget, grab.state.origin);
                let local = self.map_to_local(holder, position);
                self.add_event(Event::pointer(
                    holder,
                    EventType::POINTER_DRAG,
                    local,
                    origin,
                    delta,
                    button,
                ));
            }
            return;
        }

        let target = self
            .tree
            .widget_at(position, &|w| w.has(Capability::POINTABLE), Some(EventType::POINTER_MOTION))
            .unwrap_or(self.tree.root());
        self.pointer_motion(target, position, delta);
    }

    fn pointer_motion(&mut self, target: WidgetId, position: Point, delta: Point) {
        let local = self.map_to_local(target, position);
        self.add_event(Event::pointer(
            target,
            EventType::POINTER_MOTION,
            local,
            local,
            delta,
            MouseButton::NoButton,
        ));
    }

    fn scroll(&mut self, position: Point, delta: Point) {
        self.pointer = position;
        let Some(target) = self.tree.widget_at(
            position,
            &|w| w.has(Capability::SCROLLABLE),
            Some(EventType::WHEEL_SCROLL),
        ) else {
            return;
        };
        let local = self.map_to_local(target, position);
        self.add_event(Event::wheel(target, local, delta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::Area;

    use crate::widget::WidgetBuilder;
    use crate::window::WindowConfig;

    fn setup(caps: Capability) -> (Window, WidgetId) {
        let mut w = Window::headless(WindowConfig::new("t").with_size(200, 100)).unwrap();
        let id = w.create(
            WidgetBuilder::new("target")
                .with_area(Area::new(50.0, 20.0, 40.0, 20.0))
                .with_capabilities(caps),
        );
        let root = w.root();
        w.add(root, id).unwrap();
        w.queue.clear();
        (w, id)
    }

    fn kinds(w: &Window) -> Vec<(WidgetId, EventType)> {
        w.queue().iter().map(|e| (e.widget(), e.event_type())).collect()
    }

    #[test]
    fn test_press_targets_clickable_in_local_coordinates() {
        let (mut w, id) = setup(Capability::CLICKABLE);
        w.translate(HostEvent::ButtonPress {
            button: MouseButton::Left,
            position: Point::new(60.0, 30.0),
        });
        match w.queue().iter().next() {
            Some(Event::Pointer(p)) => {
                assert_eq!(p.widget, id);
                assert_eq!(p.position, Point::new(10.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(w.grabs().get(Device::Mouse(MouseButton::Left)).map(|g| g.widget), Some(id));
    }

    #[test]
    fn test_release_outside_skips_click() {
        let (mut w, id) = setup(Capability::CLICKABLE);
        w.translate(HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(60.0, 30.0) });
        w.translate(HostEvent::ButtonRelease { button: MouseButton::Left, position: Point::new(150.0, 80.0) });
        assert_eq!(kinds(&w), vec![(id, EventType::BUTTON_PRESS), (id, EventType::BUTTON_RELEASE)]);
        assert!(w.grabs().is_empty());
    }

    #[test]
    fn test_drag_suppresses_click() {
        let (mut w, id) = setup(Capability::CLICKABLE | Capability::DRAGGABLE);
        w.translate(HostEvent::ButtonPress { button: MouseButton::Left, position: Point::new(60.0, 30.0) });
        w.translate(HostEvent::Motion { position: Point::new(65.0, 30.0) });
        w.translate(HostEvent::ButtonRelease { button: MouseButton::Left, position: Point::new(65.0, 30.0) });
        assert_eq!(
            kinds(&w),
            vec![
                (id, EventType::BUTTON_PRESS),
                (id, EventType::POINTER_DRAG),
                (id, EventType::BUTTON_RELEASE)
            ]
        );
    }

    #[test]
    fn test_zoom_divides_positions() {
        let (mut w, id) = setup(Capability::SCROLLABLE);
        w.set_zoom(2.0).unwrap();
        w.queue.clear();
        w.translate(HostEvent::Scroll { position: Point::new(120.0, 60.0), delta: Point::new(0.0, 1.0) });
        match w.queue().iter().next() {
            Some(Event::Wheel(e)) => {
                assert_eq!(e.widget, id);
                assert_eq!(e.position, Point::new(10.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_keys_need_a_grab() {
        let (mut w, id) = setup(Capability::KEY_PRESSABLE);
        w.translate(HostEvent::KeyPress { key: keys::F1, position: Point::ZERO });
        assert!(w.queue().is_empty());

        w.grab_keyboard(id, keys::ANY).unwrap();
        w.translate(HostEvent::KeyPress { key: 'a' as u32, position: Point::ZERO });
        w.translate(HostEvent::Text { code: 'a' as u32, position: Point::ZERO });
        w.translate(HostEvent::KeyPress { key: keys::F1, position: Point::ZERO });
        let received: Vec<u32> = w
            .queue()
            .iter()
            .filter_map(|e| match e {
                Event::Key(k) => Some(k.key),
                _ => None,
            })
            .collect();
        assert_eq!(received, vec!['a' as u32, keys::F1]);
    }

    #[test]
    fn test_motion_without_pointable_goes_to_root() {
        let (mut w, _) = setup(Capability::CLICKABLE);
        w.translate(HostEvent::Motion { position: Point::new(60.0, 30.0) });
        assert_eq!(kinds(&w), vec![(w.root(), EventType::POINTER_MOTION)]);
    }

    #[test]
    fn test_close_targets_root() {
        let (mut w, _) = setup(Capability::empty());
        w.translate(HostEvent::Close);
        assert_eq!(kinds(&w), vec![(w.root(), EventType::CLOSE_REQUEST)]);
    }
}
