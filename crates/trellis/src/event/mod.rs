//! Event taxonomy.
//!
//! Every event targets one widget and carries a single [`EventType`] bit. The
//! dispatcher distinguishes events only by that type; the payload structs
//! below group the types that share fields.
//!
//! Positions are in the target widget's local coordinates.

pub mod keys;
mod queue;

use std::any::Any;
use std::fmt;

use bitflags::bitflags;
use trellis_core::{Area, Point};

use crate::widget::WidgetId;

pub use queue::EventQueue;

bitflags! {
    /// Event type bits.
    ///
    /// Also used as masks: per-widget callbacks, merge permission and the
    /// event-passable flag are all keyed by these bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EventType: u32 {
        const CONFIGURE_REQUEST = 1 << 0;
        const EXPOSE_REQUEST = 1 << 1;
        const CLOSE_REQUEST = 1 << 2;
        const KEY_PRESS = 1 << 3;
        const KEY_RELEASE = 1 << 4;
        const BUTTON_PRESS = 1 << 5;
        const BUTTON_RELEASE = 1 << 6;
        const BUTTON_CLICK = 1 << 7;
        const POINTER_MOTION = 1 << 8;
        const POINTER_DRAG = 1 << 9;
        const WHEEL_SCROLL = 1 << 10;
        const VALUE_CHANGED = 1 << 11;
        const POINTER_FOCUS_IN = 1 << 12;
        const POINTER_FOCUS_OUT = 1 << 13;
        const MESSAGE = 1 << 14;

        const KEY_EVENTS = Self::KEY_PRESS.bits() | Self::KEY_RELEASE.bits();
        const BUTTON_EVENTS = Self::BUTTON_PRESS.bits()
            | Self::BUTTON_RELEASE.bits()
            | Self::BUTTON_CLICK.bits();
        const POINTER_FOCUS_EVENTS = Self::POINTER_FOCUS_IN.bits() | Self::POINTER_FOCUS_OUT.bits();
        /// Types that may merge by default.
        const MERGEABLE = Self::CONFIGURE_REQUEST.bits()
            | Self::EXPOSE_REQUEST.bits()
            | Self::POINTER_MOTION.bits()
            | Self::POINTER_DRAG.bits()
            | Self::WHEEL_SCROLL.bits()
            | Self::VALUE_CHANGED.bits();
    }
}

impl EventType {
    /// Whether this type can ever merge.
    pub fn is_mergeable(self) -> bool {
        Self::MERGEABLE.contains(self) && self.bits().count_ones() == 1
    }
}

/// A mouse button. `NoButton` stands for the pointer itself (hovering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    NoButton,
    Left,
    Middle,
    Right,
    Other(u16),
}

/// A request naming both a target and the widget that raised it.
///
/// Used for close requests.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
    pub widget: WidgetId,
    pub kind: EventType,
    pub request_widget: WidgetId,
}

/// Expose and configure requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposeEvent {
    pub widget: WidgetId,
    pub kind: EventType,
    pub request_widget: WidgetId,
    /// Area in the target's local coordinates.
    pub area: Area,
    /// Set when the host asked for the repaint.
    pub from_host: bool,
}

/// Button, click, motion and drag events.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub widget: WidgetId,
    pub kind: EventType,
    pub position: Point,
    /// Press position for drags, the position itself otherwise.
    pub origin: Point,
    pub delta: Point,
    pub button: MouseButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelEvent {
    pub widget: WidgetId,
    pub position: Point,
    pub delta: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub widget: WidgetId,
    pub kind: EventType,
    pub position: Point,
    /// UTF-32 code point or a special key code from [`keys`].
    pub key: u32,
}

impl KeyEvent {
    /// The key as a character, when it is one.
    pub fn char(&self) -> Option<char> {
        if keys::is_special(self.key) {
            None
        } else {
            char::from_u32(self.key)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerFocusEvent {
    pub widget: WidgetId,
    pub kind: EventType,
    pub position: Point,
}

/// A widget's value changed. The value type is erased.
pub struct ValueChangedEvent {
    pub widget: WidgetId,
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl ValueChangedEvent {
    pub fn new<T: Any>(widget: WidgetId, value: T) -> Self {
        Self {
            widget,
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The new value, if it has type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ValueChangedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueChangedEvent")
            .field("widget", &self.widget)
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A named message with an arbitrary payload.
pub struct MessageEvent {
    pub widget: WidgetId,
    pub name: String,
    payload: Box<dyn Any>,
}

impl MessageEvent {
    pub fn new(widget: WidgetId, name: impl Into<String>, payload: Box<dyn Any>) -> Self {
        Self {
            widget,
            name: name.into(),
            payload,
        }
    }

    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref()
    }
}

impl fmt::Debug for MessageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageEvent")
            .field("widget", &self.widget)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Any event the queue can hold.
#[derive(Debug)]
pub enum Event {
    Widget(WidgetEvent),
    Expose(ExposeEvent),
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    Focus(PointerFocusEvent),
    ValueChanged(ValueChangedEvent),
    Message(MessageEvent),
}

impl Event {
    pub fn close_request(widget: WidgetId, request_widget: WidgetId) -> Self {
        Event::Widget(WidgetEvent {
            widget,
            kind: EventType::CLOSE_REQUEST,
            request_widget,
        })
    }

    pub fn expose_request(widget: WidgetId, request_widget: WidgetId, area: Area) -> Self {
        Event::Expose(ExposeEvent {
            widget,
            kind: EventType::EXPOSE_REQUEST,
            request_widget,
            area,
            from_host: false,
        })
    }

    pub fn configure_request(widget: WidgetId, area: Area) -> Self {
        Event::Expose(ExposeEvent {
            widget,
            kind: EventType::CONFIGURE_REQUEST,
            request_widget: widget,
            area,
            from_host: false,
        })
    }

    pub fn pointer(
        widget: WidgetId,
        kind: EventType,
        position: Point,
        origin: Point,
        delta: Point,
        button: MouseButton,
    ) -> Self {
        Event::Pointer(PointerEvent {
            widget,
            kind,
            position,
            origin,
            delta,
            button,
        })
    }

    pub fn wheel(widget: WidgetId, position: Point, delta: Point) -> Self {
        Event::Wheel(WheelEvent {
            widget,
            position,
            delta,
        })
    }

    pub fn key(widget: WidgetId, kind: EventType, position: Point, key: u32) -> Self {
        Event::Key(KeyEvent {
            widget,
            kind,
            position,
            key,
        })
    }

    pub fn focus(widget: WidgetId, kind: EventType, position: Point) -> Self {
        Event::Focus(PointerFocusEvent {
            widget,
            kind,
            position,
        })
    }

    pub fn value_changed<T: Any>(widget: WidgetId, value: T) -> Self {
        Event::ValueChanged(ValueChangedEvent::new(widget, value))
    }

    pub fn message(widget: WidgetId, name: impl Into<String>, payload: Box<dyn Any>) -> Self {
        Event::Message(MessageEvent::new(widget, name, payload))
    }

    /// The target widget.
    pub fn widget(&self) -> WidgetId {
        match self {
            Event::Widget(e) => e.widget,
            Event::Expose(e) => e.widget,
            Event::Pointer(e) => e.widget,
            Event::Wheel(e) => e.widget,
            Event::Key(e) => e.widget,
            Event::Focus(e) => e.widget,
            Event::ValueChanged(e) => e.widget,
            Event::Message(e) => e.widget,
        }
    }

    /// The widget that raised a close, expose or configure request.
    pub fn request_widget(&self) -> Option<WidgetId> {
        match self {
            Event::Widget(e) => Some(e.request_widget),
            Event::Expose(e) => Some(e.request_widget),
            _ => None,
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Event::Widget(e) => e.kind,
            Event::Expose(e) => e.kind,
            Event::Pointer(e) => e.kind,
            Event::Wheel(_) => EventType::WHEEL_SCROLL,
            Event::Key(e) => e.kind,
            Event::Focus(e) => e.kind,
            Event::ValueChanged(_) => EventType::VALUE_CHANGED,
            Event::Message(_) => EventType::MESSAGE,
        }
    }

    /// Whether the event targets `widget` or names it as request widget.
    pub fn involves(&self, widget: WidgetId) -> bool {
        self.widget() == widget || self.request_widget() == Some(widget)
    }

    /// Fold `newer` into this event.
    ///
    /// Both events must target the same widget with the same type. Returns
    /// `newer` unchanged when the pair cannot merge.
    pub(crate) fn merge(&mut self, newer: Event) -> Result<(), Event> {
        if self.widget() != newer.widget() || self.event_type() != newer.event_type() {
            return Err(newer);
        }
        match (self, newer) {
            (Event::Expose(old), Event::Expose(new)) if old.kind == EventType::CONFIGURE_REQUEST => {
                old.area = new.area;
                Ok(())
            }
            (Event::Expose(old), Event::Expose(new))
                if old.request_widget == new.request_widget && old.from_host == new.from_host =>
            {
                old.area = old.area.union(&new.area);
                Ok(())
            }
            (Event::Pointer(old), Event::Pointer(new)) if old.kind == EventType::POINTER_MOTION => {
                old.position = new.position;
                old.origin = new.origin;
                old.delta += new.delta;
                Ok(())
            }
            (Event::Pointer(old), Event::Pointer(new))
                if old.kind == EventType::POINTER_DRAG
                    && old.button == new.button
                    && old.origin == new.origin =>
            {
                old.position = new.position;
                old.delta += new.delta;
                Ok(())
            }
            (Event::Wheel(old), Event::Wheel(new)) if old.position == new.position => {
                old.delta += new.delta;
                Ok(())
            }
            (Event::ValueChanged(old), Event::ValueChanged(new)) => {
                *old = new;
                Ok(())
            }
            (_, newer) => Err(newer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids() -> (WidgetId, WidgetId) {
        let mut map = SlotMap::<WidgetId, ()>::with_key();
        (map.insert(()), map.insert(()))
    }

    #[test]
    fn test_expose_union() {
        let (w, _) = ids();
        let mut e = Event::expose_request(w, w, Area::new(0.0, 0.0, 10.0, 10.0));
        assert!(e.merge(Event::expose_request(w, w, Area::new(5.0, 5.0, 10.0, 10.0))).is_ok());
        match e {
            Event::Expose(x) => assert_eq!(x.area, Area::new(0.0, 0.0, 15.0, 15.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_expose_needs_same_request_widget() {
        let (w, other) = ids();
        let mut e = Event::expose_request(w, w, Area::new(0.0, 0.0, 1.0, 1.0));
        assert!(e.merge(Event::expose_request(w, other, Area::new(0.0, 0.0, 1.0, 1.0))).is_err());
    }

    #[test]
    fn test_configure_replaces() {
        let (w, _) = ids();
        let mut e = Event::configure_request(w, Area::new(0.0, 0.0, 10.0, 10.0));
        e.merge(Event::configure_request(w, Area::new(0.0, 0.0, 30.0, 20.0))).unwrap();
        match e {
            Event::Expose(x) => assert_eq!(x.area, Area::new(0.0, 0.0, 30.0, 20.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_drag_merge_requires_same_origin() {
        let (w, _) = ids();
        let drag = |origin: Point, delta: f64| {
            Event::pointer(
                w,
                EventType::POINTER_DRAG,
                Point::new(delta, 0.0),
                origin,
                Point::new(delta, 0.0),
                MouseButton::Left,
            )
        };
        let mut e = drag(Point::ZERO, 1.0);
        assert!(e.merge(drag(Point::ZERO, 2.0)).is_ok());
        assert!(e.merge(drag(Point::new(1.0, 1.0), 2.0)).is_err());
        match e {
            Event::Pointer(p) => assert_eq!(p.delta, Point::new(3.0, 0.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_wheel_merge_requires_same_position() {
        let (w, _) = ids();
        let mut e = Event::wheel(w, Point::new(1.0, 1.0), Point::new(0.0, 1.0));
        assert!(e.merge(Event::wheel(w, Point::new(1.0, 1.0), Point::new(0.0, 2.0))).is_ok());
        assert!(e.merge(Event::wheel(w, Point::new(2.0, 1.0), Point::new(0.0, 2.0))).is_err());
    }

    #[test]
    fn test_click_never_merges() {
        let (w, _) = ids();
        let click = || {
            Event::pointer(w, EventType::BUTTON_CLICK, Point::ZERO, Point::ZERO, Point::ZERO, MouseButton::Left)
        };
        let mut e = click();
        assert!(e.merge(click()).is_err());
    }

    #[test]
    fn test_value_changed_replaces() {
        let (w, _) = ids();
        let mut e = Event::value_changed(w, 0.25_f64);
        e.merge(Event::value_changed(w, 0.5_f64)).unwrap();
        match e {
            Event::ValueChanged(v) => assert_eq!(v.value::<f64>(), Some(&0.5)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_mergeable_bits() {
        assert!(EventType::EXPOSE_REQUEST.is_mergeable());
        assert!(!EventType::BUTTON_CLICK.is_mergeable());
        assert!(!EventType::MERGEABLE.is_mergeable());
    }
}
