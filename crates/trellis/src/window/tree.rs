//! Tree mutation: parenting, geometry, layering, visibility and styling.
//!
//! Every operation here keeps the tree, the queue, the grabs and the screen
//! consistent: released widgets lose their queued events and grabs, and any
//! change to what is on screen posts a redisplay of the affected area.

use trellis_core::logging::targets;
use trellis_core::{Area, Point};
use trellis_style::{Status, Style, Theme};

use super::Window;
use crate::capability::Capability;
use crate::error::{WidgetError, WidgetResult};
use crate::event::{Event, EventType};
use crate::grab::{Device, DeviceState};
use crate::widget::{Callback, WidgetId};

impl Window {
    fn check(&self, id: WidgetId) -> WidgetResult<()> {
        if self.tree.contains(id) {
            Ok(())
        } else {
            tracing::warn!(target: targets::TREE, ?id, "invalid widget");
            Err(WidgetError::InvalidWidget(id))
        }
    }

    /// Whether the widget is shown, linked to the root, and every ancestor
    /// is shown.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.tree.is_visible(id)
    }

    /// Make `child` a child of `parent`, on top of its siblings of the same
    /// layer. A child that already has another parent is released from it
    /// first.
    pub fn add(&mut self, parent: WidgetId, child: WidgetId) -> WidgetResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if child == self.tree.root() {
            tracing::warn!(target: targets::TREE, "the root cannot become a child");
            return Err(WidgetError::RootWidget);
        }
        if child == parent || self.tree.is_ancestor(child, parent) {
            tracing::warn!(target: targets::TREE, ?parent, ?child, "refusing circular parentage");
            return Err(WidgetError::CircularParentage { parent, child });
        }
        let old_parent = self.tree.get(child).and_then(|w| w.parent);
        if old_parent == Some(parent) {
            tracing::warn!(target: targets::TREE, ?parent, ?child, "widget already added");
            return Err(WidgetError::AlreadyParented { parent, child });
        }
        if let Some(old) = old_parent {
            self.release(old, child)?;
        }

        let attached = self.tree.get(parent).is_some_and(|w| w.attached);
        if let Some(p) = self.tree.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.tree.get_mut(child) {
            c.parent = Some(parent);
        }
        for id in self.tree.subtree(child) {
            if let Some(w) = self.tree.get_mut(id) {
                w.attached = attached;
                w.schedule_draw = true;
            }
        }
        tracing::debug!(target: targets::TREE, ?parent, ?child, attached, "added widget");
        self.post_redisplay(child);
        Ok(())
    }

    /// Unlink `child` from `parent` without destroying it.
    ///
    /// Events targeting the subtree (or naming it as request widget) are
    /// purged, its grabs are dropped, and it loses pointer focus.
    pub fn release(&mut self, parent: WidgetId, child: WidgetId) -> WidgetResult<()> {
        self.check(parent)?;
        let is_child = self.tree.get(child).is_some_and(|w| w.parent == Some(parent));
        if !is_child {
            tracing::warn!(target: targets::TREE, ?parent, ?child, "release of a non-child");
            return Err(WidgetError::NotAChild { parent, child });
        }

        let was_attached = self.tree.get(child).is_some_and(|w| w.attached);
        let area = self.tree.visible_area(child);

        if let Some(p) = self.tree.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.tree.get_mut(child) {
            c.parent = None;
        }
        let subtree = self.tree.subtree(child);
        for &id in &subtree {
            if let Some(w) = self.tree.get_mut(id) {
                w.attached = false;
            }
            self.queue.purge(id);
            self.grabs.remove_widget(id);
        }
        if self.focused.is_some_and(|f| subtree.contains(&f)) {
            self.focused = None;
        }
        tracing::debug!(target: targets::TREE, ?parent, ?child, "released widget");

        // Requested by the parent: the child's own requests were purged.
        if was_attached && !area.is_empty() {
            let root = self.tree.root();
            self.add_event(Event::expose_request(root, parent, area));
        }
        Ok(())
    }

    /// Release `id` and free it and all of its descendants.
    pub fn destroy(&mut self, id: WidgetId) -> WidgetResult<()> {
        if id == self.tree.root() {
            tracing::warn!(target: targets::TREE, "the root cannot be destroyed");
            return Err(WidgetError::RootWidget);
        }
        self.check(id)?;
        if let Some(parent) = self.tree.get(id).and_then(|w| w.parent) {
            self.release(parent, id)?;
        }
        let subtree = self.tree.subtree(id);
        for &w in &subtree {
            self.queue.purge(w);
            self.grabs.remove_widget(w);
            self.tree.remove(w);
        }
        if self.focused.is_some_and(|f| subtree.contains(&f)) {
            self.focused = None;
        }
        tracing::debug!(target: targets::TREE, ?id, count = subtree.len(), "destroyed widgets");
        Ok(())
    }

    /// Move the widget to `position` (parent coordinates).
    pub fn move_to(&mut self, id: WidgetId, position: Point) -> WidgetResult<()> {
        self.check(id)?;
        let position = position.finite("move_to")?;
        if self.tree.get(id).is_some_and(|w| w.area.position() == position) {
            return Ok(());
        }
        self.post_redisplay(id);
        if let Some(w) = self.tree.get_mut(id) {
            w.area.move_to(position);
        }
        self.post_redisplay(id);
        Ok(())
    }

    /// Resize the widget. Negative extends are clamped to zero.
    ///
    /// The widget's surface is reallocated on its next draw. Resizing the
    /// root also resizes the host view.
    pub fn resize(&mut self, id: WidgetId, extends: Point) -> WidgetResult<()> {
        self.check(id)?;
        let extends = extends.finite("resize")?;
        let extends = Point::new(extends.x.max(0.0), extends.y.max(0.0));
        if self.tree.get(id).is_some_and(|w| w.area.extends() == extends) {
            return Ok(());
        }
        if id == self.tree.root() {
            self.resize_view(extends)?;
        }

        self.post_redisplay(id);
        if let Some(w) = self.tree.get_mut(id) {
            w.area.resize(extends);
            w.surface = None;
            w.schedule_draw = true;
        }
        self.post_redisplay(id);
        tracing::trace!(target: targets::TREE, ?id, width = extends.x, height = extends.y, "resized");
        Ok(())
    }

    /// Resize the widget to the bounding box of its visible children and
    /// the content size its behavior reports.
    pub fn resize_to_fit(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.check(id)?;
        let mut extends = Point::ZERO;
        if let Some(widget) = self.tree.get(id) {
            if let Some(content) = widget.behavior.as_ref().and_then(|b| b.content_extends()) {
                extends = content;
            }
            for child in widget.children.iter().filter_map(|c| self.tree.get(*c)) {
                if child.visible {
                    let end = child.area.end();
                    extends.x = extends.x.max(end.x);
                    extends.y = extends.y.max(end.y);
                }
            }
        }
        self.resize(id, extends)
    }

    /// Resize the host view for root extends `extends` at the current zoom.
    pub(crate) fn resize_view(&mut self, extends: Point) -> WidgetResult<()> {
        let width = (extends.x * self.zoom).ceil().max(1.0) as u32;
        let height = (extends.y * self.zoom).ceil().max(1.0) as u32;
        self.host.resize(width, height)?;
        self.compositor.set_viewport(Area::from_position(Point::ZERO, extends));
        Ok(())
    }

    /// Set the z-layer. Higher layers are drawn above lower ones and win
    /// hit-tests.
    pub fn set_layer(&mut self, id: WidgetId, layer: i32) -> WidgetResult<()> {
        self.check(id)?;
        if self.tree.get(id).is_some_and(|w| w.layer == layer) {
            return Ok(());
        }
        if let Some(w) = self.tree.get_mut(id) {
            w.layer = layer;
        }
        self.post_redisplay(id);
        Ok(())
    }

    /// Put the widget above all of its siblings.
    pub fn raise_to_top(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.reorder(id, |order, i| {
            let id = order.remove(i);
            order.push(id);
        })
    }

    /// Put the widget below all of its siblings.
    pub fn drop_to_bottom(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.reorder(id, |order, i| {
            let id = order.remove(i);
            order.insert(0, id);
        })
    }

    /// Swap the widget with the sibling directly above it.
    pub fn raise_frontwards(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.reorder(id, |order, i| {
            if i + 1 < order.len() {
                order.swap(i, i + 1);
            }
        })
    }

    /// Swap the widget with the sibling directly below it.
    pub fn drop_backwards(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.reorder(id, |order, i| {
            if i > 0 {
                order.swap(i - 1, i);
            }
        })
    }

    /// Rearrange the paint order of `id`'s siblings with `f`, then adopt
    /// the layer of the new neighbor so that the stored child order and the
    /// paint order agree again.
    fn reorder(&mut self, id: WidgetId, f: impl FnOnce(&mut Vec<WidgetId>, usize)) -> WidgetResult<()> {
        self.check(id)?;
        let Some(parent) = self.tree.get(id).and_then(|w| w.parent) else {
            return Ok(());
        };
        let mut order = self.tree.paint_order(parent);
        let Some(index) = order.iter().position(|c| *c == id) else {
            return Ok(());
        };
        f(&mut order, index);
        let Some(index) = order.iter().position(|c| *c == id) else {
            return Ok(());
        };

        let layer_of = |c: &WidgetId| self.tree.get(*c).map_or(0, |w| w.layer);
        let own = layer_of(&id);
        let below = index.checked_sub(1).and_then(|i| order.get(i)).map(layer_of);
        let above = order.get(index + 1).map(layer_of);
        let mut layer = own;
        if let Some(below) = below {
            layer = layer.max(below);
        }
        if let Some(above) = above {
            layer = layer.min(above);
        }

        if let Some(w) = self.tree.get_mut(id) {
            w.layer = layer;
        }
        if let Some(p) = self.tree.get_mut(parent) {
            p.children = order;
        }
        self.post_redisplay(id);
        Ok(())
    }

    pub fn show(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.set_shown(id, true)
    }

    /// Hide the widget and its subtree. A focused widget in the subtree
    /// loses focus.
    pub fn hide(&mut self, id: WidgetId) -> WidgetResult<()> {
        self.set_shown(id, false)
    }

    fn set_shown(&mut self, id: WidgetId, shown: bool) -> WidgetResult<()> {
        self.check(id)?;
        if self.tree.get(id).is_some_and(|w| w.visible == shown) {
            return Ok(());
        }
        if !shown {
            let subtree = self.tree.subtree(id);
            if self.focused.is_some_and(|f| subtree.contains(&f)) {
                self.unfocus();
            }
        }
        if let Some(w) = self.tree.get_mut(id) {
            w.visible = shown;
        }
        self.post_redisplay(id);
        Ok(())
    }

    /// Position of the widget in root coordinates.
    pub fn absolute_position(&self, id: WidgetId) -> Point {
        self.tree.absolute_position(id)
    }

    /// Area of the widget in root coordinates.
    pub fn absolute_area(&self, id: WidgetId) -> Area {
        self.tree.absolute_area(id)
    }

    /// Map a point from root coordinates into `id`'s coordinates.
    pub fn map_to_local(&self, id: WidgetId, point: Point) -> Point {
        point - self.tree.absolute_position(id)
    }

    /// Topmost visible widget at `point` (root coordinates) that has `cap`,
    /// passing through widgets whose passable mask contains `kind`.
    pub fn widget_at(&self, point: Point, cap: Capability, kind: EventType) -> Option<WidgetId> {
        self.tree.widget_at(point, &|w| w.has(cap), Some(kind))
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the host-pixels-per-unit factor of the root.
    pub fn set_zoom(&mut self, zoom: f64) -> WidgetResult<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            tracing::warn!(target: targets::TREE, zoom, "invalid zoom factor");
            return Err(WidgetError::InvalidZoom(zoom));
        }
        if zoom == self.zoom {
            return Ok(());
        }
        let previous = self.zoom;
        self.zoom = zoom;
        let extends = self.tree.get(self.tree.root()).map_or(Point::ZERO, |w| w.extends());
        if let Err(err) = self.resize_view(extends) {
            self.zoom = previous;
            return Err(err);
        }
        self.compositor.invalidate_all();
        let root = self.tree.root();
        self.post_redisplay(root);
        Ok(())
    }

    /// Replace the widget's local style.
    pub fn set_style(&mut self, id: WidgetId, style: Style) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.style = style;
        }
        self.update(id);
        Ok(())
    }

    /// Replace the theme; every widget is redrawn.
    pub fn set_theme(&mut self, theme: Theme) {
        tracing::debug!(target: targets::STYLE, name = theme.name(), "theme changed");
        self.theme = theme;
        let ids: Vec<_> = self.tree.ids().collect();
        for id in ids {
            if let Some(w) = self.tree.get_mut(id) {
                w.schedule_draw = true;
            }
        }
        let root = self.tree.root();
        self.post_redisplay(root);
    }

    pub fn set_status(&mut self, id: WidgetId, status: Status) -> WidgetResult<()> {
        self.check(id)?;
        if self.tree.get(id).is_some_and(|w| w.status == status) {
            return Ok(());
        }
        if let Some(w) = self.tree.get_mut(id) {
            w.status = status;
        }
        self.update(id);
        Ok(())
    }

    pub fn set_title(&mut self, id: WidgetId, title: impl Into<String>) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.title = title.into();
        }
        Ok(())
    }

    /// Register a callback for `kind`, replacing any previous one.
    pub fn set_callback(
        &mut self,
        id: WidgetId,
        kind: EventType,
        callback: impl FnMut(&mut Window, &Event) + 'static,
    ) -> WidgetResult<()> {
        self.check(id)?;
        let callback: Callback = Box::new(callback);
        if let Some(w) = self.tree.get_mut(id) {
            w.callbacks.insert(kind, callback);
        }
        Ok(())
    }

    pub fn remove_callback(&mut self, id: WidgetId, kind: EventType) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.callbacks.remove(&kind);
        }
        Ok(())
    }

    /// Let events of `mask` pass through the widget during hit-testing.
    pub fn set_passable(&mut self, id: WidgetId, mask: EventType) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.passable = mask;
        }
        Ok(())
    }

    /// Override the merge mask for events targeting the widget.
    pub fn set_mergeable(&mut self, id: WidgetId, mask: EventType) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.mergeable = Some(mask);
        }
        Ok(())
    }

    /// Add support for `cap`.
    pub fn support_capability(&mut self, id: WidgetId, cap: Capability) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.capabilities.support(cap);
        }
        Ok(())
    }

    /// Enable or disable a supported capability.
    pub fn set_capability_enabled(
        &mut self,
        id: WidgetId,
        cap: Capability,
        enabled: bool,
    ) -> WidgetResult<()> {
        self.check(id)?;
        if let Some(w) = self.tree.get_mut(id) {
            w.capabilities.set_enabled(cap, enabled);
        }
        if !enabled && cap.contains(Capability::POINTER_FOCUSABLE) && self.focused == Some(id) {
            self.unfocus();
        }
        Ok(())
    }

    /// Route key `key` (or every key, with `keys::ANY`) to the widget.
    pub fn grab_keyboard(&mut self, id: WidgetId, key: u32) -> WidgetResult<()> {
        self.check(id)?;
        let position = self.pointer;
        let origin = self.map_to_local(id, position);
        self.grabs.add(
            id,
            Device::Keyboard(key),
            DeviceState::new(position, origin, std::time::Instant::now()),
        );
        Ok(())
    }

    pub fn release_keyboard(&mut self, id: WidgetId, key: u32) {
        self.grabs.remove(id, Device::Keyboard(key));
    }
}
