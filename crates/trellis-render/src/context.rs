//! A stateful drawing context over an [`ImageSurface`].
//!
//! The API follows the familiar Cairo model: build a path, pick a source,
//! then `fill` or `stroke`. Graphics state (transform, clip, source, line
//! width) is pushed and popped with `save`/`restore`.
//!
//! Path coordinates are mapped through the current transform as they are
//! added, so changing the transform mid-path only affects later segments.
//!
//! ```
//! use trellis_render::{Color, DrawContext, ImageSurface};
//!
//! let mut surface = ImageSurface::new(20, 20).unwrap();
//! {
//!     let mut cr = DrawContext::new(&mut surface);
//!     cr.rectangle(5.0, 5.0, 10.0, 10.0);
//!     cr.set_source_color(Color::RED);
//!     cr.fill().unwrap();
//! }
//! assert_eq!(surface.pixel(10, 10), Some(Color::RED));
//! assert_eq!(surface.pixel(1, 1), Some(Color::TRANSPARENT));
//! ```

use std::f64::consts::{FRAC_PI_2, PI};

use tiny_skia::{
    FillRule, Mask, Paint, Path, PathBuilder, Pattern, Pixmap, Rect, Shader, SpreadMode, Stroke,
    Transform,
};
use trellis_core::logging::targets;
use trellis_core::{Area, Point};

use crate::error::RenderResult;
use crate::paint::{to_skia_point, LinearGradient, Source};
use crate::surface::ImageSurface;
use crate::types::Color;

#[derive(Clone)]
struct GraphicsState {
    transform: Transform,
    clip: Option<Mask>,
    source: Source,
    line_width: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            clip: None,
            source: Source::default(),
            line_width: 2.0,
        }
    }
}

/// Cairo-style drawing context borrowing its target surface.
pub struct DrawContext<'a> {
    target: &'a mut Pixmap,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: PathBuilder,
    current: Option<tiny_skia::Point>,
    subpath_start: Option<tiny_skia::Point>,
}

impl<'a> DrawContext<'a> {
    pub fn new(surface: &'a mut ImageSurface) -> Self {
        Self {
            target: surface.pixmap_mut(),
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: PathBuilder::new(),
            current: None,
            subpath_start: None,
        }
    }

    /// Target width in device pixels.
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    /// Target height in device pixels.
    pub fn height(&self) -> u32 {
        self.target.height()
    }

    // =========================================================================
    // Graphics state
    // =========================================================================

    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the last saved state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => tracing::warn!(target: targets::RENDER, "restore without matching save"),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pre_translate(dx as f32, dy as f32);
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx as f32, sy as f32);
    }

    /// Rotate user space by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_rotate(angle.to_degrees() as f32));
    }

    pub fn identity_matrix(&mut self) {
        self.state.transform = Transform::identity();
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width.max(0.0);
    }

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    // =========================================================================
    // Sources
    // =========================================================================

    pub fn set_source_color(&mut self, color: Color) {
        self.state.source = Source::Color(color);
    }

    pub fn set_source_rgba(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.set_source_color(Color::new(r as f32, g as f32, b as f32, a as f32));
    }

    /// Use `surface` as the source with its origin at user-space `(x, y)`.
    pub fn set_source_surface(&mut self, surface: &ImageSurface, x: f64, y: f64) {
        self.state.source = Source::Surface {
            surface: surface.clone(),
            transform: self.state.transform.pre_translate(x as f32, y as f32),
        };
    }

    pub fn set_source_linear(&mut self, gradient: LinearGradient) {
        self.state.source = Source::Linear {
            gradient,
            transform: self.state.transform,
        };
    }

    // =========================================================================
    // Path construction
    // =========================================================================

    fn to_device(&self, x: f64, y: f64) -> tiny_skia::Point {
        let mut pts = [to_skia_point(Point::new(x, y))];
        self.state.transform.map_points(&mut pts);
        pts[0]
    }

    /// Discard the current path.
    pub fn new_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        let p = self.to_device(x, y);
        self.path.move_to(p.x, p.y);
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    /// Line to `(x, y)`; acts as `move_to` when there is no current point.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        let p = self.to_device(x, y);
        self.path.line_to(p.x, p.y);
        self.current = Some(p);
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        if self.current.is_none() {
            self.move_to(x1, y1);
        }
        let p1 = self.to_device(x1, y1);
        let p2 = self.to_device(x2, y2);
        let p3 = self.to_device(x3, y3);
        self.path.cubic_to(p1.x, p1.y, p2.x, p2.y, p3.x, p3.y);
        self.current = Some(p3);
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.path.close();
            self.current = self.subpath_start;
        }
    }

    /// Add a closed rectangle subpath.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }

    /// Add a closed rectangle subpath with circular corners. The radius is
    /// clamped to half the shorter side.
    pub fn rounded_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) {
        let r = radius.clamp(0.0, width.abs().min(height.abs()) / 2.0);
        if r == 0.0 {
            self.rectangle(x, y, width, height);
            return;
        }
        self.move_to(x + r, y);
        self.arc(x + width - r, y + r, r, -FRAC_PI_2, 0.0);
        self.arc(x + width - r, y + height - r, r, 0.0, FRAC_PI_2);
        self.arc(x + r, y + height - r, r, FRAC_PI_2, PI);
        self.arc(x + r, y + r, r, PI, 3.0 * FRAC_PI_2);
        self.close_path();
    }

    /// Add a circular arc in the direction of increasing angle.
    ///
    /// A line is added from the current point to the arc start, if there is
    /// one.
    pub fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
        let mut end = angle2;
        while end < angle1 {
            end += 2.0 * PI;
        }
        self.arc_segments(xc, yc, radius, angle1, end);
    }

    /// Add a circular arc in the direction of decreasing angle.
    pub fn arc_negative(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
        let mut end = angle2;
        while end > angle1 {
            end -= 2.0 * PI;
        }
        self.arc_segments(xc, yc, radius, angle1, end);
    }

    fn arc_segments(&mut self, xc: f64, yc: f64, radius: f64, from: f64, to: f64) {
        let start = (xc + radius * from.cos(), yc + radius * from.sin());
        self.line_to(start.0, start.1);

        let sweep = to - from;
        let count = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / count as f64;
        // Control point distance for a cubic approximating `step` radians.
        let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;

        let mut a = from;
        for _ in 0..count {
            let b = a + step;
            let (sa, ca) = a.sin_cos();
            let (sb, cb) = b.sin_cos();
            self.curve_to(
                xc + radius * ca - k * sa,
                yc + radius * sa + k * ca,
                xc + radius * cb + k * sb,
                yc + radius * sb - k * cb,
                xc + radius * cb,
                yc + radius * sb,
            );
            a = b;
        }
    }

    fn take_path(&mut self, preserve: bool) -> Option<Path> {
        let path = if preserve {
            self.path.clone().finish()
        } else {
            let path = std::mem::take(&mut self.path).finish();
            self.current = None;
            self.subpath_start = None;
            path
        };
        if path.is_none() {
            tracing::trace!(target: targets::RENDER, "drawing with an empty path");
        }
        path
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Fill the current path with the source, then clear the path.
    pub fn fill(&mut self) -> RenderResult<()> {
        self.fill_path(false)
    }

    /// Fill the current path, keeping it for further operations.
    pub fn fill_preserve(&mut self) -> RenderResult<()> {
        self.fill_path(true)
    }

    fn fill_path(&mut self, preserve: bool) -> RenderResult<()> {
        let Some(path) = self.take_path(preserve) else {
            return Ok(());
        };
        let paint = make_paint(self.state.source.shader()?);
        self.target.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
        Ok(())
    }

    /// Stroke the current path with the source, then clear the path.
    pub fn stroke(&mut self) -> RenderResult<()> {
        self.stroke_path(false)
    }

    pub fn stroke_preserve(&mut self) -> RenderResult<()> {
        self.stroke_path(true)
    }

    fn stroke_path(&mut self, preserve: bool) -> RenderResult<()> {
        let Some(path) = self.take_path(preserve) else {
            return Ok(());
        };
        let ts = self.state.transform;
        let scale = ((ts.sx * ts.sy - ts.kx * ts.ky).abs() as f64).sqrt();
        let stroke = Stroke {
            width: (self.state.line_width * scale) as f32,
            ..Stroke::default()
        };
        let paint = make_paint(self.state.source.shader()?);
        self.target.stroke_path(
            &path,
            &paint,
            &stroke,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
        Ok(())
    }

    /// Intersect the clip with the current path, then clear the path.
    pub fn clip(&mut self) {
        self.clip_path(false);
    }

    pub fn clip_preserve(&mut self) {
        self.clip_path(true);
    }

    fn clip_path(&mut self, preserve: bool) {
        let (w, h) = (self.target.width(), self.target.height());
        let Some(path) = self.take_path(preserve) else {
            // Clipping to nothing hides everything.
            self.state.clip = Mask::new(w, h);
            return;
        };
        match &mut self.state.clip {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, Transform::identity()),
            None => {
                if let Some(mut mask) = Mask::new(w, h) {
                    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                    self.state.clip = Some(mask);
                }
            }
        }
    }

    pub fn reset_clip(&mut self) {
        self.state.clip = None;
    }

    /// Paint the source everywhere inside the clip.
    ///
    /// Surface sources cover only their own extent.
    pub fn paint(&mut self) -> RenderResult<()> {
        let paint = make_paint(self.state.source.shader()?);
        let (rect, ts) = match &self.state.source {
            Source::Surface { surface, transform } => (
                Rect::from_xywh(0.0, 0.0, surface.width() as f32, surface.height() as f32),
                *transform,
            ),
            _ => (
                Rect::from_xywh(0.0, 0.0, self.target.width() as f32, self.target.height() as f32),
                Transform::identity(),
            ),
        };
        if let Some(rect) = rect {
            // The shader is already in device space.
            let mut paint = paint;
            if let Some(inv) = ts.invert() {
                paint.shader.transform(inv);
            }
            self.target.fill_rect(rect, &paint, ts, self.state.clip.as_ref());
        }
        Ok(())
    }

    /// Fill `area` (user space) with `surface` placed at user-space `origin`.
    ///
    /// Borrowing variant of `set_source_surface` + `rectangle` + `fill` used
    /// by the compositor.
    pub fn blit(&mut self, surface: &ImageSurface, origin: Point, area: Area) {
        let Some(rect) = Rect::from_xywh(
            area.x() as f32,
            area.y() as f32,
            area.width() as f32,
            area.height() as f32,
        ) else {
            return;
        };
        let shader = Pattern::new(
            surface.pixmap().as_ref(),
            SpreadMode::Pad,
            tiny_skia::FilterQuality::Nearest,
            1.0,
            Transform::from_translate(origin.x as f32, origin.y as f32),
        );
        let paint = make_paint(shader);
        self.target
            .fill_rect(rect, &paint, self.state.transform, self.state.clip.as_ref());
    }

    /// Reset `area` (user space) to transparent, ignoring the clip.
    pub fn clear_rect(&mut self, area: Area) {
        let Some(rect) = Rect::from_xywh(
            area.x() as f32,
            area.y() as f32,
            area.width() as f32,
            area.height() as f32,
        ) else {
            return;
        };
        let paint = Paint {
            shader: Shader::SolidColor(tiny_skia::Color::TRANSPARENT),
            blend_mode: tiny_skia::BlendMode::Clear,
            anti_alias: false,
            ..Paint::default()
        };
        self.target.fill_rect(rect, &paint, self.state.transform, None);
    }
}

fn make_paint(shader: Shader<'_>) -> Paint<'_> {
    Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    }
}
