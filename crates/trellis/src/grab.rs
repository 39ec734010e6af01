//! Device grabs.
//!
//! A grab binds a device to the widget that receives its events until the
//! grab is released: a pressed mouse button sticks to the widget it was
//! pressed on, a key goes to the widget holding its keyboard grab, and the
//! button-less pointer (`Mouse(NoButton)`) tracks the widget the cursor
//! hovers for focus timing.
//!
//! Each device has its own LIFO; the most recent grab is the active one.

use std::time::Instant;

use trellis_core::logging::targets;
use trellis_core::Point;

use crate::event::keys;
use crate::event::MouseButton;
use crate::widget::WidgetId;

/// An input device a widget can grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// A key code, or [`keys::ANY`] for every key.
    Keyboard(u32),
    Mouse(MouseButton),
}

impl Device {
    /// The hover tracker.
    pub const NO_BUTTON: Device = Device::Mouse(MouseButton::NoButton);

    /// Whether a grab on `self` receives events of `device`.
    fn receives(self, device: Device) -> bool {
        match (self, device) {
            (Device::Keyboard(held), Device::Keyboard(key)) => held == key || held == keys::ANY,
            (a, b) => a == b,
        }
    }
}

/// Device-specific state recorded with a grab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceState {
    /// Pointer position in root coordinates when the grab started.
    pub position: Point,
    /// Same position in the grabbing widget's local coordinates.
    pub origin: Point,
    pub since: Instant,
    /// Set once the pointer moved while a button grab was held.
    pub dragged: bool,
}

impl DeviceState {
    pub fn new(position: Point, origin: Point, since: Instant) -> Self {
        Self {
            position,
            origin,
            since,
            dragged: false,
        }
    }
}

/// One entry of the grab stack.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceGrab {
    pub widget: WidgetId,
    pub device: Device,
    pub state: DeviceState,
}

/// All grabs of a window, newest last.
#[derive(Debug, Default)]
pub struct DeviceGrabStack {
    grabs: Vec<DeviceGrab>,
}

impl DeviceGrabStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a grab; it becomes the active grab for its device.
    pub fn add(&mut self, widget: WidgetId, device: Device, state: DeviceState) {
        tracing::trace!(target: targets::GRAB, ?widget, ?device, "grab");
        self.grabs.push(DeviceGrab {
            widget,
            device,
            state,
        });
    }

    /// The active grab receiving `device`.
    pub fn get(&self, device: Device) -> Option<&DeviceGrab> {
        self.grabs.iter().rev().find(|g| g.device.receives(device))
    }

    pub fn get_mut(&mut self, device: Device) -> Option<&mut DeviceGrab> {
        self.grabs.iter_mut().rev().find(|g| g.device.receives(device))
    }

    /// Pop the active grab of exactly `device`.
    pub fn remove_device(&mut self, device: Device) -> Option<DeviceGrab> {
        let idx = self.grabs.iter().rposition(|g| g.device == device)?;
        let grab = self.grabs.remove(idx);
        tracing::trace!(target: targets::GRAB, widget = ?grab.widget, ?device, "released grab");
        Some(grab)
    }

    /// Remove every grab `widget` holds on `device`.
    pub fn remove(&mut self, widget: WidgetId, device: Device) -> usize {
        self.remove_where(|g| g.widget == widget && g.device == device)
    }

    /// Remove every grab `widget` holds.
    pub fn remove_widget(&mut self, widget: WidgetId) -> usize {
        self.remove_where(|g| g.widget == widget)
    }

    pub fn remove_where(&mut self, mut pred: impl FnMut(&DeviceGrab) -> bool) -> usize {
        let before = self.grabs.len();
        self.grabs.retain(|g| !pred(g));
        before - self.grabs.len()
    }

    /// Whether `widget` holds any grab.
    pub fn holds(&self, widget: WidgetId) -> bool {
        self.grabs.iter().any(|g| g.widget == widget)
    }

    /// Mouse buttons (not the hover tracker) with an active grab, oldest
    /// first.
    pub fn held_buttons(&self) -> Vec<MouseButton> {
        let mut buttons = Vec::new();
        for grab in &self.grabs {
            if let Device::Mouse(button) = grab.device {
                if button != MouseButton::NoButton && !buttons.contains(&button) {
                    buttons.push(button);
                }
            }
        }
        buttons
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceGrab> {
        self.grabs.iter()
    }

    pub fn len(&self) -> usize {
        self.grabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grabs.is_empty()
    }
}
