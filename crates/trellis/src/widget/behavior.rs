//! Widget-specific drawing and input handling.
//!
//! Concrete widgets (buttons, sliders, dials...) implement [`Behavior`].
//! Every hook has a default, so an implementation only overrides what it
//! needs. The dispatcher runs a hook only when the widget has the matching
//! capability, and always runs the behavior before the user callback for the
//! same event type, so a slider can update its value before the
//! application's callback observes it.

use std::time::Duration;

use trellis_core::{Area, Point, Urid};
use trellis_render::{DrawContext, RenderResult};
use trellis_style::{keys, Border, Fill, Status, Style, StyleProperty, Theme};

use crate::capability::value::{ValueModel, ValueState};
use crate::event::{
    KeyEvent, MessageEvent, PointerEvent, PointerFocusEvent, ValueChangedEvent, WheelEvent,
    WidgetEvent,
};
use crate::widget::WidgetId;
use crate::window::Window;

/// Everything a widget may read while drawing itself.
pub struct DrawInfo<'a> {
    pub id: WidgetId,
    pub urid: Urid,
    /// The widget's area in its own coordinates.
    pub area: Area,
    pub status: Status,
    pub theme: &'a Theme,
    pub style: &'a Style,
    pub value: Option<&'a dyn ValueModel>,
}

impl<'a> DrawInfo<'a> {
    /// Look up a style property: local style, theme entry, theme defaults.
    pub fn resolve<T: StyleProperty>(&self, key: Urid) -> Option<&'a T> {
        self.theme.resolve_as::<T>(self.style, self.urid, key)
    }

    /// The widget's value, if it has type `T`.
    pub fn value<T: Clone + PartialEq + 'static>(&self) -> Option<&'a T> {
        self.value
            .and_then(|v| v.as_any().downcast_ref::<ValueState<T>>())
            .map(ValueState::value)
    }

    /// The area inside the border.
    pub fn inner_area(&self) -> Area {
        let inset = self.resolve::<Border>(keys::border()).map_or(0.0, Border::total_width);
        let extends = self.area.extends();
        Area::new(
            inset,
            inset,
            (extends.x - 2.0 * inset).max(0.0),
            (extends.y - 2.0 * inset).max(0.0),
        )
    }
}

/// Paint the background fill and the border from the widget's style.
pub fn draw_frame(cx: &mut DrawContext<'_>, info: &DrawInfo<'_>) -> RenderResult<()> {
    let extends = info.area.extends();
    if extends.x <= 0.0 || extends.y <= 0.0 {
        return Ok(());
    }
    let border = info.resolve::<Border>(keys::border()).copied().unwrap_or_default();
    let fill = info.resolve::<Fill>(keys::background()).copied().unwrap_or_default();

    let m = border.margin.max(0.0);
    let w = (extends.x - 2.0 * m).max(0.0);
    let h = (extends.y - 2.0 * m).max(0.0);

    if let Some(color) = fill.color() {
        cx.rounded_rectangle(m, m, w, h, border.radius);
        cx.set_source_color(color);
        cx.fill()?;
    }

    let lw = border.line.width;
    if lw > 0.0 && w > lw && h > lw {
        cx.rounded_rectangle(m + lw / 2.0, m + lw / 2.0, w - lw, h - lw, border.radius);
        cx.set_line_width(lw);
        cx.set_source_color(border.line.color);
        cx.stroke()?;
    }
    Ok(())
}

/// Widget-specific drawing and event handling.
///
/// Hooks receive the window so they can change values, post redisplays or
/// move other widgets; `id` is the widget the behavior belongs to. While a
/// hook runs, the behavior is detached from its widget, so hooks never
/// re-enter themselves.
#[allow(unused_variables)]
pub trait Behavior {
    /// Draw the widget into its own surface. `cx` covers exactly the
    /// widget's extends and starts transparent.
    fn draw(&self, cx: &mut DrawContext<'_>, info: &DrawInfo<'_>) -> RenderResult<()> {
        draw_frame(cx, info)
    }

    /// Size the content needs, used by `Window::resize_to_fit`.
    fn content_extends(&self) -> Option<Point> {
        None
    }

    fn on_button_pressed(&mut self, window: &mut Window, id: WidgetId, event: &PointerEvent) {}

    fn on_button_released(&mut self, window: &mut Window, id: WidgetId, event: &PointerEvent) {}

    fn on_button_clicked(&mut self, window: &mut Window, id: WidgetId, event: &PointerEvent) {}

    fn on_pointer_dragged(&mut self, window: &mut Window, id: WidgetId, event: &PointerEvent) {}

    fn on_pointer_motion(&mut self, window: &mut Window, id: WidgetId, event: &PointerEvent) {}

    fn on_wheel_scrolled(&mut self, window: &mut Window, id: WidgetId, event: &WheelEvent) {}

    fn on_key_pressed(&mut self, window: &mut Window, id: WidgetId, event: &KeyEvent) {}

    fn on_key_released(&mut self, window: &mut Window, id: WidgetId, event: &KeyEvent) {}

    fn on_close_request(&mut self, window: &mut Window, id: WidgetId, event: &WidgetEvent) {}

    fn on_value_changed(&mut self, window: &mut Window, id: WidgetId, event: &ValueChangedEvent) {}

    /// Whether the pointer has rested long enough to focus the widget.
    fn is_focus_active(&self, elapsed: Duration, delay: Duration) -> bool {
        elapsed >= delay
    }

    fn on_focus_in(&mut self, window: &mut Window, id: WidgetId, event: &PointerFocusEvent) {}

    fn on_focus_out(&mut self, window: &mut Window, id: WidgetId, event: &PointerFocusEvent) {}

    fn on_message(&mut self, window: &mut Window, id: WidgetId, event: &MessageEvent) {}
}
