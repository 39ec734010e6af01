//! Offscreen raster surfaces.

use std::path::Path;

use tiny_skia::{ColorU8, IntSize, Pixmap};
use trellis_core::logging::targets;

use crate::error::{RenderError, RenderResult};
use crate::types::Color;

/// An ARGB raster surface owned by a widget or a window.
///
/// Pixels are stored premultiplied, as the raster backend expects. Reads
/// through [`ImageSurface::pixel`] return straight alpha.
#[derive(Clone)]
pub struct ImageSurface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for ImageSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl ImageSurface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })?;
        Ok(Self { pixmap })
    }

    /// Allocate a surface covering `width` x `height` logical units, rounded
    /// up to whole pixels.
    pub fn for_extends(width: f64, height: f64) -> RenderResult<Self> {
        let w = width.max(0.0).ceil() as u32;
        let h = height.max(0.0).ceil() as u32;
        Self::new(w, h)
    }

    /// Load a PNG (or any format the `image` crate was built with).
    pub fn from_png_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let rgba = image::open(path)
            .map_err(|source| RenderError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut data = rgba.into_raw();
        for px in data.chunks_exact_mut(4) {
            let p = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            px.copy_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
        }

        let size = IntSize::from_wh(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        let pixmap = Pixmap::from_vec(data, size).ok_or(RenderError::Allocation { width, height })?;
        tracing::debug!(target: targets::RENDER, path = %path.display(), width, height, "loaded image surface");
        Ok(Self { pixmap })
    }

    /// Write the surface as PNG.
    pub fn write_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let width = self.width();
        let height = self.height();
        let img = image::RgbaImage::from_raw(width, height, data)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        img.save(path).map_err(|source| RenderError::ImageSave {
            path: path.to_path_buf(),
            source,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Read one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::from_rgba8(c.red(), c.green(), c.blue(), c.alpha()))
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            ImageSurface::new(0, 10),
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = ImageSurface::new(4, 3).unwrap();
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.pixel(3, 2), Some(Color::TRANSPARENT));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_fill_and_read_back() {
        let mut surface = ImageSurface::new(2, 2).unwrap();
        surface.fill(Color::RED);
        assert_eq!(surface.pixel(1, 1), Some(Color::RED));
        surface.clear();
        assert_eq!(surface.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_for_extends_rounds_up() {
        let surface = ImageSurface::for_extends(10.2, 3.0).unwrap();
        assert_eq!((surface.width(), surface.height()), (11, 3));
    }
}
