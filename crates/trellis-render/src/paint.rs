//! Paint sources: what a fill, stroke or paint operation draws with.

use tiny_skia::{FilterQuality, GradientStop, Pattern, Shader, SpreadMode, Transform};
use trellis_core::Point;

use crate::error::{RenderError, RenderResult};
use crate::surface::ImageSurface;
use crate::types::Color;

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient (0.0 - 1.0).
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// A linear gradient between two points in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Add a color stop. Stops are kept sorted by offset.
    pub fn add_color_stop(&mut self, offset: f32, color: Color) {
        let stop = ColorStop::new(offset, color);
        let idx = self.stops.partition_point(|s| s.offset <= stop.offset);
        self.stops.insert(idx, stop);
    }

    /// Builder form of [`add_color_stop`](Self::add_color_stop).
    pub fn with_stop(mut self, offset: f32, color: Color) -> Self {
        self.add_color_stop(offset, color);
        self
    }
}

/// The current source of a [`DrawContext`](crate::DrawContext).
#[derive(Debug, Clone)]
pub enum Source {
    Color(Color),
    Linear {
        gradient: LinearGradient,
        transform: Transform,
    },
    /// A surface placed in device space by `transform`.
    Surface {
        surface: ImageSurface,
        transform: Transform,
    },
}

impl Default for Source {
    fn default() -> Self {
        Source::Color(Color::BLACK)
    }
}

impl Source {
    pub(crate) fn shader(&self) -> RenderResult<Shader<'_>> {
        match self {
            Source::Color(color) => Ok(Shader::SolidColor(color.to_skia())),
            Source::Linear { gradient, transform } => {
                let stops: Vec<GradientStop> = gradient
                    .stops
                    .iter()
                    .map(|s| GradientStop::new(s.offset, s.color.to_skia()))
                    .collect();
                match stops.len() {
                    0 => Err(RenderError::InvalidGradient),
                    1 => Ok(Shader::SolidColor(gradient.stops[0].color.to_skia())),
                    _ => tiny_skia::LinearGradient::new(
                        to_skia_point(gradient.start),
                        to_skia_point(gradient.end),
                        stops,
                        SpreadMode::Pad,
                        *transform,
                    )
                    .ok_or(RenderError::InvalidGradient),
                }
            }
            Source::Surface { surface, transform } => Ok(Pattern::new(
                surface.pixmap().as_ref(),
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                1.0,
                *transform,
            )),
        }
    }
}

pub(crate) fn to_skia_point(p: Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(p.x as f32, p.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_stay_sorted() {
        let g = LinearGradient::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
            .with_stop(1.0, Color::WHITE)
            .with_stop(0.0, Color::BLACK)
            .with_stop(0.5, Color::GRAY);
        let offsets: Vec<f32> = g.stops.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_empty_gradient_rejected() {
        let source = Source::Linear {
            gradient: LinearGradient::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
            transform: Transform::identity(),
        };
        assert!(matches!(source.shader(), Err(RenderError::InvalidGradient)));
    }
}
