//! Widget capabilities.
//!
//! A capability is an opt-in behavior (clicking, dragging, carrying a
//! value...). A widget declares the capabilities it supports and can enable
//! or disable each one at runtime. The dispatcher only runs a capability's
//! handler when the widget both supports and enables it.

pub mod value;

use bitflags::bitflags;

use crate::event::EventType;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capability: u32 {
        const CLICKABLE = 1 << 0;
        const DRAGGABLE = 1 << 1;
        const SCROLLABLE = 1 << 2;
        const POINTABLE = 1 << 3;
        const KEY_PRESSABLE = 1 << 4;
        const CLOSEABLE = 1 << 5;
        const VALUEABLE = 1 << 6;
        const TOGGLEABLE = 1 << 7;
        const POINTER_FOCUSABLE = 1 << 8;
        const VALIDATABLE = 1 << 9;
        const VALUE_TRANSFERABLE = 1 << 10;
        const MESSAGABLE = 1 << 11;
    }
}

impl Capability {
    /// The capability whose handler receives events of `kind`.
    ///
    /// Configure and expose requests are handled by every widget and map to
    /// no capability.
    pub fn for_event(kind: EventType) -> Option<Capability> {
        let cap = if EventType::BUTTON_EVENTS.contains(kind) {
            Capability::CLICKABLE
        } else if EventType::KEY_EVENTS.contains(kind) {
            Capability::KEY_PRESSABLE
        } else if EventType::POINTER_FOCUS_EVENTS.contains(kind) {
            Capability::POINTER_FOCUSABLE
        } else if kind == EventType::POINTER_DRAG {
            Capability::DRAGGABLE
        } else if kind == EventType::POINTER_MOTION {
            Capability::POINTABLE
        } else if kind == EventType::WHEEL_SCROLL {
            Capability::SCROLLABLE
        } else if kind == EventType::VALUE_CHANGED {
            Capability::VALUEABLE
        } else if kind == EventType::CLOSE_REQUEST {
            Capability::CLOSEABLE
        } else if kind == EventType::MESSAGE {
            Capability::MESSAGABLE
        } else {
            return None;
        };
        Some(cap)
    }
}

/// Supported and enabled capabilities of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    supported: Capability,
    enabled: Capability,
}

impl Capabilities {
    /// Support and enable `caps`.
    pub fn new(caps: Capability) -> Self {
        Self {
            supported: caps,
            enabled: caps,
        }
    }

    /// Whether `cap` is supported and enabled.
    pub fn has(&self, cap: Capability) -> bool {
        (self.supported & self.enabled).contains(cap)
    }

    pub fn supports(&self, cap: Capability) -> bool {
        self.supported.contains(cap)
    }

    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.enabled.contains(cap)
    }

    /// Add support for `cap` and enable it.
    pub fn support(&mut self, cap: Capability) {
        self.supported |= cap;
        self.enabled |= cap;
    }

    /// Drop support for `cap`.
    pub fn withdraw(&mut self, cap: Capability) {
        self.supported.remove(cap);
        self.enabled.remove(cap);
    }

    /// Toggle the enable flag; has no effect on unsupported capabilities.
    pub fn set_enabled(&mut self, cap: Capability, enabled: bool) {
        self.enabled.set(cap & self.supported, enabled);
    }

    pub fn supported(&self) -> Capability {
        self.supported
    }

    /// Supported and enabled capabilities.
    pub fn active(&self) -> Capability {
        self.supported & self.enabled
    }
}
