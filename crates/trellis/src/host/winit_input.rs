//! winit input conversion.
//!
//! Translates winit [`WindowEvent`]s into [`HostEvent`]s so a view driven
//! by a winit event loop can feed `Window::translate`. Positions stay in
//! physical pixels; the window divides by its zoom factor.
//!
//! ```ignore
//! let mut input = WinitInput::new();
//! for host_event in input.convert(&window_event) {
//!     window.translate(host_event);
//! }
//! ```

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, KeyLocation, NamedKey};

use trellis_core::{Area, Point};

use super::HostEvent;
use crate::event::{keys, MouseButton};

/// Pixels per wheel step for pixel-precise scroll devices.
pub const PIXELS_PER_WHEEL_STEP: f64 = 20.0;

/// Converts a winit mouse button to a toolkit [`MouseButton`].
pub fn from_winit_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(4),
        WinitMouseButton::Forward => MouseButton::Other(5),
        WinitMouseButton::Other(n) => MouseButton::Other(n),
    }
}

/// Converts a winit logical key to a key code: a UTF-32 code point, or a
/// code from the special range for keys without a character.
pub fn from_winit_key(key: &Key, location: KeyLocation) -> Option<u32> {
    match key {
        Key::Named(named) => from_winit_named_key(*named, location),
        Key::Character(text) => text.chars().next().map(u32::from),
        Key::Unidentified(_) | Key::Dead(_) => None,
    }
}

fn from_winit_named_key(key: NamedKey, location: KeyLocation) -> Option<u32> {
    let right = location == KeyLocation::Right;
    let code = match key {
        NamedKey::Backspace => keys::BACKSPACE,
        NamedKey::Tab => keys::TAB,
        NamedKey::Enter => keys::ENTER,
        NamedKey::Escape => keys::ESCAPE,
        NamedKey::Delete => keys::DELETE,
        NamedKey::Space => keys::SPACE,

        NamedKey::ArrowLeft => keys::LEFT,
        NamedKey::ArrowUp => keys::UP,
        NamedKey::ArrowRight => keys::RIGHT,
        NamedKey::ArrowDown => keys::DOWN,
        NamedKey::PageUp => keys::PAGE_UP,
        NamedKey::PageDown => keys::PAGE_DOWN,
        NamedKey::Home => keys::HOME,
        NamedKey::End => keys::END,
        NamedKey::Insert => keys::INSERT,

        NamedKey::Shift if right => keys::SHIFT_R,
        NamedKey::Shift => keys::SHIFT_L,
        NamedKey::Control if right => keys::CTRL_R,
        NamedKey::Control => keys::CTRL_L,
        NamedKey::Alt if right => keys::ALT_R,
        NamedKey::Alt => keys::ALT_L,
        NamedKey::Super if right => keys::SUPER_R,
        NamedKey::Super => keys::SUPER_L,
        NamedKey::ContextMenu => keys::MENU,

        NamedKey::CapsLock => keys::CAPS_LOCK,
        NamedKey::ScrollLock => keys::SCROLL_LOCK,
        NamedKey::NumLock => keys::NUM_LOCK,
        NamedKey::PrintScreen => keys::PRINT_SCREEN,
        NamedKey::Pause => keys::PAUSE,

        NamedKey::F1 => keys::F1,
        NamedKey::F2 => keys::F2,
        NamedKey::F3 => keys::F3,
        NamedKey::F4 => keys::F4,
        NamedKey::F5 => keys::F5,
        NamedKey::F6 => keys::F6,
        NamedKey::F7 => keys::F7,
        NamedKey::F8 => keys::F8,
        NamedKey::F9 => keys::F9,
        NamedKey::F10 => keys::F10,
        NamedKey::F11 => keys::F11,
        NamedKey::F12 => keys::F12,

        _ => return None,
    };
    Some(code)
}

/// Stateful converter; tracks the cursor and the view size, which winit
/// only reports on change.
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    cursor: Point,
    size: Point,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cursor position in physical pixels.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Convert one window event. Events without a toolkit counterpart
    /// yield nothing.
    pub fn convert(&mut self, event: &WindowEvent) -> Vec<HostEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => vec![self.cursor_moved(*position)],
            WindowEvent::MouseInput { state, button, .. } => vec![self.mouse_input(*state, *button)],
            WindowEvent::MouseWheel { delta, .. } => vec![self.mouse_wheel(*delta)],
            WindowEvent::KeyboardInput { event, .. } => self.keyboard_input(event),
            WindowEvent::Resized(size) => vec![self.resized(*size)],
            WindowEvent::RedrawRequested => vec![HostEvent::Expose {
                area: Area::from_position(Point::ZERO, self.size),
            }],
            WindowEvent::CloseRequested => vec![HostEvent::Close],
            _ => Vec::new(),
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> HostEvent {
        self.cursor = Point::new(position.x, position.y);
        HostEvent::Motion { position: self.cursor }
    }

    pub fn mouse_input(&mut self, state: ElementState, button: WinitMouseButton) -> HostEvent {
        let button = from_winit_mouse_button(button);
        match state {
            ElementState::Pressed => HostEvent::ButtonPress {
                button,
                position: self.cursor,
            },
            ElementState::Released => HostEvent::ButtonRelease {
                button,
                position: self.cursor,
            },
        }
    }

    /// Wheel deltas are in steps; pixel deltas are scaled down.
    pub fn mouse_wheel(&mut self, delta: MouseScrollDelta) -> HostEvent {
        let delta = match delta {
            MouseScrollDelta::LineDelta(x, y) => Point::new(f64::from(x), f64::from(y)),
            MouseScrollDelta::PixelDelta(pos) => {
                Point::new(pos.x / PIXELS_PER_WHEEL_STEP, pos.y / PIXELS_PER_WHEEL_STEP)
            }
        };
        HostEvent::Scroll {
            position: self.cursor,
            delta,
        }
    }

    pub fn resized(&mut self, size: PhysicalSize<u32>) -> HostEvent {
        self.size = Point::new(f64::from(size.width), f64::from(size.height));
        HostEvent::Configure {
            area: Area::from_position(Point::ZERO, self.size),
        }
    }

    /// Keys become raw key events; produced text additionally becomes text
    /// events, one per character.
    pub fn keyboard_input(&mut self, event: &KeyEvent) -> Vec<HostEvent> {
        let mut out = Vec::new();
        let position = self.cursor;
        let code = from_winit_key(&event.logical_key, event.location);
        match event.state {
            ElementState::Pressed => {
                if let Some(key) = code {
                    out.push(HostEvent::KeyPress { key, position });
                }
                if let Some(text) = &event.text {
                    out.extend(text.chars().map(|c| HostEvent::Text {
                        code: u32::from(c),
                        position,
                    }));
                }
            }
            ElementState::Released => {
                if let Some(key) = code {
                    out.push(HostEvent::KeyRelease { key, position });
                }
            }
        }
        out
    }
}
