//! The redraw engine.
//!
//! A redraw pass runs in three steps:
//!
//! 1. Every visible widget scheduled for drawing repaints its own surface.
//! 2. The damaged region is recomposed from the widget surfaces into a
//!    root-sized surface, parents before children and children in paint
//!    order, each clipped to its ancestors.
//! 3. The region is scaled by the zoom factor onto the host surface.

use trellis_core::logging::targets;
use trellis_core::{Area, PerfSpan, Point};
use trellis_render::{DamageTracker, DrawContext, ImageSurface, RenderResult};

use super::Window;
use crate::widget::{draw_frame, DrawInfo, WidgetId};

/// Damage bookkeeping and the composition surface.
#[derive(Debug)]
pub(crate) struct Compositor {
    surface: Option<ImageSurface>,
    damage: DamageTracker,
}

impl Compositor {
    pub(crate) fn new(viewport: Area) -> Self {
        let mut damage = DamageTracker::with_viewport(viewport);
        damage.invalidate_all();
        Self {
            surface: None,
            damage,
        }
    }

    /// The root was resized: the composition surface is reallocated and
    /// everything recomposed.
    pub(crate) fn set_viewport(&mut self, viewport: Area) {
        self.damage.set_viewport(viewport);
        self.damage.invalidate_all();
        self.surface = None;
    }

    pub(crate) fn add_damage(&mut self, area: Area) {
        self.damage.add_damage(area);
    }

    pub(crate) fn invalidate_all(&mut self) {
        self.damage.invalidate_all();
    }

    fn surface_for(&mut self, viewport: Area) -> RenderResult<ImageSurface> {
        let (w, h) = (viewport.width().ceil() as u32, viewport.height().ceil() as u32);
        match self.surface.take() {
            Some(surface) if surface.width() == w && surface.height() == h => Ok(surface),
            _ => ImageSurface::for_extends(viewport.width(), viewport.height()),
        }
    }
}

impl Window {
    /// Run a redraw pass over the accumulated damage.
    ///
    /// Called when the host exposes the view. Widgets that fail to draw stay
    /// scheduled and are skipped; their siblings are unaffected.
    pub fn redraw(&mut self) {
        let _span = PerfSpan::new("redraw");
        self.draw_scheduled();

        let Some(region) = self.compositor.damage.take() else {
            return;
        };
        if let Err(err) = self.compose(region) {
            tracing::warn!(target: targets::REDRAW, %err, "composition failed");
            self.compositor.add_damage(region);
            return;
        }
        self.present(region);
    }

    /// Whether the compositor holds damage not yet redrawn.
    pub fn has_damage(&self) -> bool {
        self.compositor.damage.has_damage()
    }

    /// The last composed frame in toolkit units.
    pub fn composed(&self) -> Option<&ImageSurface> {
        self.compositor.surface.as_ref()
    }

    fn draw_scheduled(&mut self) {
        let root = self.tree.root();
        for id in self.tree.subtree(root) {
            let scheduled = self.tree.get(id).is_some_and(|w| w.schedule_draw);
            if !scheduled || !self.tree.is_visible(id) {
                continue;
            }
            if let Err(err) = self.draw_widget(id) {
                tracing::warn!(target: targets::REDRAW, ?id, %err, "widget draw failed");
            }
        }
    }

    /// Repaint one widget's surface from its style and behavior.
    fn draw_widget(&mut self, id: WidgetId) -> RenderResult<()> {
        let Some(widget) = self.tree.get_mut(id) else {
            return Ok(());
        };
        let extends = widget.area.extends();
        if extends.x <= 0.0 || extends.y <= 0.0 {
            widget.surface = None;
            widget.schedule_draw = false;
            return Ok(());
        }

        // The previous surface stays in place until the new one is complete.
        let mut surface = ImageSurface::for_extends(extends.x, extends.y)?;

        let result = match self.tree.get(id) {
            Some(widget) => {
                let info = DrawInfo {
                    id,
                    urid: widget.urid,
                    area: widget.local_area(),
                    status: widget.status,
                    theme: &self.theme,
                    style: &widget.style,
                    value: widget.value_model(),
                };
                let mut cx = DrawContext::new(&mut surface);
                match &widget.behavior {
                    Some(behavior) => behavior.draw(&mut cx, &info),
                    None => draw_frame(&mut cx, &info),
                }
            }
            None => Ok(()),
        };

        result?;
        if let Some(widget) = self.tree.get_mut(id) {
            widget.surface = Some(surface);
            widget.schedule_draw = false;
        }
        tracing::trace!(target: targets::REDRAW, ?id, w = extends.x, h = extends.y, "drew widget");
        Ok(())
    }

    fn compose(&mut self, region: Area) -> RenderResult<()> {
        let root = self.tree.root();
        let viewport = self.tree.get(root).map_or(Area::default(), |w| w.local_area());
        let mut surface = self.compositor.surface_for(viewport)?;
        {
            let mut cx = DrawContext::new(&mut surface);
            cx.clear_rect(region);
            self.compose_widget(&mut cx, root, region);
        }
        self.compositor.surface = Some(surface);
        Ok(())
    }

    fn compose_widget(&self, cx: &mut DrawContext<'_>, id: WidgetId, region: Area) {
        let Some(widget) = self.tree.get(id) else {
            return;
        };
        if !widget.visible {
            return;
        }
        if let Some(surface) = &widget.surface {
            let clip = region.intersection(&self.tree.visible_area(id));
            if !clip.is_empty() {
                cx.blit(surface, self.tree.absolute_position(id), clip);
            }
        }
        for child in self.tree.paint_order(id) {
            self.compose_widget(cx, child, region);
        }
    }

    /// Scale the composed region onto the host surface.
    fn present(&mut self, region: Area) {
        let zoom = self.zoom;
        let Some(composed) = self.compositor.surface.as_ref() else {
            return;
        };
        let Some(target) = self.host.surface_mut() else {
            tracing::trace!(target: targets::REDRAW, "host has no surface");
            return;
        };
        let mut cx = DrawContext::new(target);
        cx.clear_rect(region.scaled(zoom));
        cx.scale(zoom, zoom);
        cx.blit(composed, Point::ZERO, region);
    }
}
